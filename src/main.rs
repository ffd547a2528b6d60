fn main() -> anyhow::Result<()> {
    wpaint::run()
}
