use std::path::PathBuf;

use clap::Parser;

use auszug::pdf;

/// A simple wrapper around the fragment extractor, to inspect how a PDF's
/// positioned text actually comes out, and to generate test fixtures for
/// the layout parser.
///
/// Default output is JSON (pages of fragments), which auszug accepts in
/// place of the original PDF. Contributors should manually sanitize
/// sensitive information before committing a dump as a test file.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// Input PDF
    #[arg(required = true)]
    pub input: PathBuf,

    /// Print a human-readable listing instead of JSON
    #[arg(short = 'p', long)]
    pub pretty: bool,

    /// Can be provided multiple times
    #[arg(short = 'P', long = "page", value_name = "PAGE")]
    pub pages: Option<Vec<u32>>,
}

fn main() -> Result<(), ()> {
    let args = Args::parse();
    auszug::tracing::setup_tracing();

    let mut pages = pdf::extract_fragments_from_path(&args.input)
        .map_err(|e| eprintln!("Error: {e}"))?;

    if let Some(pages_to_show) = &args.pages {
        pages = pages
            .into_iter()
            .enumerate()
            .filter(|(i, _)| pages_to_show.contains(&(*i as u32 + 1)))
            .map(|(_, pg)| pg)
            .collect();
    }

    if args.pretty {
        for (i, page) in pages.iter().enumerate() {
            println!("---------- Page {} ----------", i + 1);
            for frag in page {
                println!(
                    "  x={:7.2} y={:7.2} w={:6.2} h={:5.2}  {:?}",
                    frag.x, frag.y, frag.width, frag.height, frag.text
                );
            }
        }
    } else {
        let dump = serde_json::to_string_pretty(&pages)
            .map_err(|e| eprintln!("Error: {e}"))?;
        println!("{dump}");
    }

    Ok(())
}
