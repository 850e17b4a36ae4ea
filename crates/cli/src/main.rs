use std::process::ExitCode;

fn main() -> ExitCode {
    microhabit_cli::run()
}
