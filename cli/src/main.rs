//! Subscriptly terminal client
//!
//! Runs the entitlement provider against a scripted purchase service so the
//! paywall and restore flows can be exercised without a device:
//! 1. Load a fixture describing the customer ledger and offerings
//! 2. Start the provider and run one action
//! 3. Print the resulting subscription state
//!
//! Usage:
//!   subscriptly --fixture fixtures/default.json status
//!   subscriptly --fixture fixtures/default.json purchase '$rc_monthly'

use std::{path::{Path, PathBuf}, sync::Arc};
use anyhow::{bail, Context, Result};
use clap::Parser;
use subscriptly_cli::{
    Command, ConsoleAlerts, CredentialFile, Fixture, StoreCommand, SubscriptionSummary,
};
use subscriptly_identity::{FileStore, IdentitySession, KeyValueStore};
use subscriptly_purchases::{EntitlementProvider, PurchaseResult, RestoreResult};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "subscriptly")]
#[command(about = "Subscriptly paywall and sign-in client")]
struct Args {
    /// Path to the purchase service fixture
    #[arg(short, long, default_value = "fixtures/default.json")]
    fixture: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::SignIn { credential, profile } => sign_in(credential, profile).await,
        Command::Store(command) => with_provider(&args.fixture, &command).await,
    }
}

async fn with_provider(fixture_path: &Path, command: &StoreCommand) -> Result<()> {
    let fixture = Fixture::load(fixture_path)?;
    debug!("Loaded fixture {}", fixture_path.display());
    let provider = fixture.provider(Arc::new(ConsoleAlerts));
    provider.start().await;

    let outcome = run(&provider, command).await;
    print_summary(&provider, &fixture)?;
    provider.stop().await;
    outcome
}

async fn run(provider: &EntitlementProvider, command: &StoreCommand) -> Result<()> {
    match command {
        StoreCommand::Status => {
            provider.check_subscription().await;
        }
        StoreCommand::Offerings => {
            let offering = provider
                .current_offering()
                .context("no current offering")?;
            println!("Offering {}", offering.identifier);
            for package in &offering.available_packages {
                println!(
                    "  {:<16} {:<24} {}",
                    package.identifier,
                    package.title(),
                    package.price_string()
                );
            }
        }
        StoreCommand::Purchase { package } => {
            let offering = provider
                .current_offering()
                .context("no current offering")?;
            let Some(package) = offering.package(package) else {
                bail!("package {package} is not in offering {}", offering.identifier);
            };
            match provider.purchase_package(package).await {
                PurchaseResult::Purchased(_) => info!("Purchased {}", package.identifier),
                PurchaseResult::Cancelled => info!("Purchase cancelled"),
                PurchaseResult::Failed(e) => bail!("purchase failed: {e}"),
            }
        }
        StoreCommand::Restore => match provider.restore_purchases().await {
            RestoreResult::Restored(_) => info!("Restored"),
            RestoreResult::NothingToRestore(_) => info!("Nothing to restore"),
            RestoreResult::Failed(e) => bail!("restore failed: {e}"),
        },
    }
    Ok(())
}

fn print_summary(provider: &EntitlementProvider, fixture: &Fixture) -> Result<()> {
    let summary = SubscriptionSummary::from_state(
        &provider.state(),
        provider.entitlement_id(),
        &fixture.platform(),
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn sign_in(credential: PathBuf, profile: Option<PathBuf>) -> Result<()> {
    let store = match profile {
        Some(path) => FileStore::new(path),
        None => FileStore::open_default()?,
    };
    info!("Profile store: {}", store.path().display());
    let store: Arc<dyn KeyValueStore> = Arc::new(store);
    let session = IdentitySession::new(Arc::new(CredentialFile::new(credential)), store);

    let user = session.sign_in().await?;
    println!("Welcome, {}", user.display_name_or_default());
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}
