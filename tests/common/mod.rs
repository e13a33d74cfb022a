use std::{fs, path::PathBuf};

use auszug::statement::fragment::TextFragment;

#[allow(dead_code)]
pub fn frag(text: &str, x: f64, y: f64) -> TextFragment {
    TextFragment::new(text, x, y, 40.0, 10.0)
}

/// A page carrying the cash section marker, the German header row at
/// y=700, and no content. Tests append rows below.
#[allow(dead_code)]
pub fn cash_header_page() -> Vec<TextFragment> {
    vec![
        frag("UMSATZÜBERSICHT", 40.0, 760.0),
        frag("DATUM", 40.0, 700.0),
        frag("TYP", 120.0, 700.0),
        frag("BESCHREIBUNG", 180.0, 700.0),
        frag("ZAHLUNGSEINGANG", 330.0, 700.0),
        frag("ZAHLUNGSAUSGANG", 430.0, 700.0),
        frag("SALDO", 530.0, 700.0),
    ]
}

/// A cash content row at the given y, shaped for the header from
/// cash_header_page().
#[allow(dead_code)]
pub fn cash_row(
    y: f64,
    datum: &str,
    typ: &str,
    desc: &str,
    eingang: Option<&str>,
    ausgang: Option<&str>,
    saldo: &str,
) -> Vec<TextFragment> {
    let mut frags = vec![
        frag(datum, 40.0, y),
        frag(typ, 120.0, y),
        frag(desc, 180.0, y),
    ];
    if let Some(e) = eingang {
        frags.push(frag(e, 380.0, y));
    }
    if let Some(a) = ausgang {
        frags.push(frag(a, 480.0, y));
    }
    frags.push(frag(saldo, 560.0, y));
    frags
}

fn test_temp_dir_path() -> PathBuf {
    let tmpdir = std::env::temp_dir();

    let make_file_path = |val| {
        let fname = format!("auszug-test-{}", val);
        tmpdir.join(fname)
    };

    for val in 1..1000000 {
        let path = make_file_path(val);
        if !path.exists() {
            return path;
        }
    }
    panic!("Could not create temp directory path that does not already exist");
}

#[allow(dead_code)]
pub struct NonAutoCreatingTestDir {
    pub path: PathBuf,
}

impl NonAutoCreatingTestDir {
    #[allow(dead_code)]
    pub fn new() -> NonAutoCreatingTestDir {
        NonAutoCreatingTestDir { path: test_temp_dir_path() }
    }
}

fn cleanup_test_dir(path: &PathBuf) {
    if path.exists() {
        let skip_env_var = "SKIP_TEMP_DIR_CLEANUP_ON_FAIL";
        let skip_del_on_fail = std::env::var(skip_env_var)
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        if std::thread::panicking() && skip_del_on_fail {
            println!(
                "cleanup_test_dir: panicking. Skipping remove of {}",
                path.to_str().unwrap()
            );
        } else {
            let _ = fs::remove_dir_all(path);
        }
    }
}

impl Drop for NonAutoCreatingTestDir {
    fn drop(&mut self) {
        cleanup_test_dir(&self.path);
    }
}
