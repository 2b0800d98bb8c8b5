use std::process::ExitCode;

use clap::Parser;

use upsell_cli::args::Cli;
use upsell_infra::PaywallConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    if cli.verbose {
        upsell_observability::tracing::init_with_default("debug");
    } else {
        upsell_observability::init();
    }

    let config = PaywallConfig::from_env()?;
    tracing::debug!(entitlement = %config.entitlement, "paywall configured");

    let mut stdout = std::io::stdout().lock();
    let exit = upsell_cli::run(cli, config, &mut stdout).await?;
    Ok(ExitCode::from(exit.code()))
}
