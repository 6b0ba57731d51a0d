fn main() {
    if let Err(err) = teapoio::cli::run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
