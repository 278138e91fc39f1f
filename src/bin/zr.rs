//! Short binary name (`zr`) that forwards to the `zet_rename` library.
//! Keeping the alias as a real binary avoids shell alias requirements.

fn main() {
    if let Err(err) = zet_rename::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
