fn main() {
    if let Err(err) = zet_rename::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
