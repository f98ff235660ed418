fn main() -> std::io::Result<()> {
    breakout::run()
}
