use crate::render::RenderTable;

pub type Error = String;

pub trait TableWriter {
    fn print_render_table(
        &mut self,
        name: &str,
        table_model: &RenderTable,
    ) -> Result<(), Error>;

    fn finish(self: Box<Self>) -> Result<(), Error> {
        Ok(())
    }
}
