fn main() {
    if let Err(e) = dissolved_gas::adapters::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
