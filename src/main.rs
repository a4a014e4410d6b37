fn main() {
    cardlay::cli::Cli::run()
}
