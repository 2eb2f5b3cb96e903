fn main() {
    if let Err(err) = sarif_alerts::cli::run() {
        sarif_alerts::ui::eprintln_error(&err);
        std::process::exit(sarif_alerts::exit::status_of(&err).code());
    }
}
