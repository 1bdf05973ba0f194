fn main() -> anyhow::Result<()> {
    ff7rtext::cli::run_cli()
}
