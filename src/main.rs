//! inkgrid - command-line tool for resolving product gallery colors and inks

use std::process::ExitCode;

use inkgrid::cli;

fn main() -> ExitCode {
    cli::run()
}
