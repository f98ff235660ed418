fn main() -> std::io::Result<()> {
    blocks::run()
}
