fn main() -> anyhow::Result<()> {
    machmeter::run()
}
