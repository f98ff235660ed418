fn main() -> std::io::Result<()> {
    frogger::run()
}
