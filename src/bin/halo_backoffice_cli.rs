use std::process::ExitCode;

fn main() -> ExitCode {
    halo_backoffice::init();
    match halo_backoffice::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
