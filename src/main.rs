use clap::Parser;
use crossback::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
