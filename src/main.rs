use std::process::ExitCode;

fn main() -> ExitCode {
    match selma::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            selma::ui::output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
