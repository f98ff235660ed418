fn main() -> std::io::Result<()> {
    snake::run()
}
