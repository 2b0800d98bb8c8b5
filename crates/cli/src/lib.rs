//! Command-line driver for the paywall flow.
//!
//! Loads a store fixture, resolves the configured offerings, and runs
//! purchases the way the mobile paywall screen would, printing what that
//! screen would show.

pub mod args;
pub mod fixture;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use upsell_infra::{NextStep, Paywall, PaywallConfig};
use upsell_purchasing::PurchaseResult;

use crate::args::{Cli, Command};
use crate::fixture::StoreFixture;

/// How a command ended, for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Offerings shown, purchase unlocked content, or skip.
    Ok,
    /// Offerings could not be resolved or the offering does not exist.
    Unavailable,
    /// The purchase ended without unlocking the entitlement.
    NotPurchased,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Ok => 0,
            Exit::Unavailable => 2,
            Exit::NotPurchased => 3,
        }
    }
}

pub async fn run(cli: Cli, config: PaywallConfig, out: &mut impl Write) -> anyhow::Result<Exit> {
    let fixture = StoreFixture::load(&cli.fixture)?;
    let provider = Arc::new(fixture.into_provider());
    let mut paywall = Paywall::new(provider, config);

    match cli.command {
        Command::Skip => {
            show_next_step(&paywall, paywall.skip(), out)?;
            Ok(Exit::Ok)
        }
        Command::Offerings => {
            paywall.load().await;
            if !print_offerings(&paywall, out)? {
                return Ok(Exit::Unavailable);
            }
            Ok(Exit::Ok)
        }
        Command::Buy { offering } => {
            paywall.load().await;
            if !print_offerings(&paywall, out)? {
                return Ok(Exit::Unavailable);
            }

            let Some(result) = paywall.purchase_offering(&offering).await else {
                writeln!(out, "no offering named {offering}")?;
                return Ok(Exit::Unavailable);
            };

            let entitlement = &paywall.config().entitlement;
            match &result {
                PurchaseResult::Success(_) => writeln!(out, "purchased {entitlement}")?,
                PurchaseResult::Failure(err) => writeln!(out, "purchase failed: {err}")?,
                PurchaseResult::Cancelled => writeln!(out, "purchase cancelled")?,
                PurchaseResult::NotGranted => {
                    writeln!(out, "purchase completed but {entitlement} was not granted")?
                }
            }

            let next = NextStep::from(&result);
            show_next_step(&paywall, next, out)?;
            Ok(match next {
                NextStep::ShowContent => Exit::Ok,
                NextStep::StayOnPaywall => Exit::NotPurchased,
            })
        }
    }
}

/// Print one line per button; returns whether the paywall is ready.
fn print_offerings<P>(paywall: &Paywall<P>, out: &mut impl Write) -> anyhow::Result<bool>
where
    P: upsell_infra::PurchaseProvider + Clone,
{
    if let Some(err) = paywall.state().error() {
        writeln!(out, "offerings unavailable: {err}").context("writing output")?;
        return Ok(false);
    }

    for button in paywall.buttons() {
        let label = button.label.as_deref().unwrap_or("(loading)");
        writeln!(out, "{}\t{}", button.key, label).context("writing output")?;
    }
    Ok(paywall.is_ready())
}

fn show_next_step<P>(paywall: &Paywall<P>, next: NextStep, out: &mut impl Write) -> anyhow::Result<()>
where
    P: upsell_infra::PurchaseProvider + Clone,
{
    if next == NextStep::ShowContent {
        writeln!(out, "showing {} content", paywall.config().entitlement)
            .context("writing output")?;
    }
    Ok(())
}
