fn main() {
    if let Err(err) = mapping_ledger::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
