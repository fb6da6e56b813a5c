fn main() {
    if let Err(e) = taxon_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
