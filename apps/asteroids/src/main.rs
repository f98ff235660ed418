fn main() -> std::io::Result<()> {
    asteroids::run()
}
