use std::process::ExitCode;

fn main() -> ExitCode {
    contech_cli::run()
}
