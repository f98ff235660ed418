fn main() -> std::io::Result<()> {
    invaders::run()
}
