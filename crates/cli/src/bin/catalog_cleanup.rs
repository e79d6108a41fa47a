use anyhow::Result;

fn main() -> Result<()> {
    catalog_cli::main_entry()
}
