use clap::Parser;
use snaptrader::cli::{run, Cli};
use snaptrader::logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run(cli)
}
