fn main() -> anyhow::Result<()> {
    let config = bookdocs_app::bootstrap()?;
    bookdocs_app::run_scaffold(&config)
}
