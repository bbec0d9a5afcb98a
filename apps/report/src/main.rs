use campus_logger::{ConsoleTarget, LevelFilter, Logger};
use campus_report::{Cli, execute, requested_output, write_error_page};
use clap::Parser;
use clap::error::ErrorKind;

const USAGE: &str = "Usage: report -s <student_id> | -c <course_id>";

fn main() {
    // Reports are still written when no log sink can be installed.
    let _log = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .target(ConsoleTarget::Stderr)
        .level(LevelFilter::WARN)
        .init()
        .ok();

    match Cli::try_parse() {
        Ok(cli) => execute(&cli),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            if let Err(print) = err.print() {
                tracing::error!(error = %print, "Failed to print help");
            }
        },
        Err(err) => {
            tracing::warn!(kind = ?err.kind(), "Invalid arguments");
            let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
            write_error_page(&requested_output(args), Some(USAGE));
        },
    }
}
