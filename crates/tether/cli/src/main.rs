use std::process::ExitCode;

fn main() -> ExitCode {
    match tether_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tether_cli::print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
