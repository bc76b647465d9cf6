use clap::Parser;
use salecast::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
