use brrtkernel::cli::{run_cli, Cli};
use brrtkernel::logging::{init_logging_with_config, LogConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging_with_config(&LogConfig::from_env())?;
    run_cli(cli)
}
