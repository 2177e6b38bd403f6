fn main() {
    fitch::cli::bin::cli()
}
