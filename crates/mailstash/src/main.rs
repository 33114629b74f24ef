//! `mailstash` - command-line front end for the local message store.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod settings;

use anyhow::Context;
use clap::Parser;
use mailstash_core::{JsonMessageStore, RecoveryPolicy};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use settings::{Settings, default_settings_path};

fn main() -> anyhow::Result<()> {
    // Log to stderr so command output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailstash=info,mailstash_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings_path = cli.config.clone().unwrap_or_else(default_settings_path);
    let settings = Settings::load(&settings_path)?;

    let mut stdout = std::io::stdout().lock();
    let open = || open_store(&cli, &settings);

    match &cli.command {
        Command::List => commands::list(&open()?, &mut stdout),
        Command::Show { id } => commands::show(&open()?, id, &mut stdout),
        Command::Filter(args) => commands::filter(&open()?, &args.criteria(), &mut stdout),
        Command::Delete { id, strict } => commands::delete(&open()?, id, *strict, &mut stdout),
        Command::Import { file } => commands::import(&open()?, file, &mut stdout),
        Command::Stats => commands::stats(&open()?, &mut stdout),
        Command::Account => commands::account(settings.account.as_ref(), &mut stdout),
    }
}

/// Open the store named on the command line or in the settings file.
fn open_store(cli: &Cli, settings: &Settings) -> anyhow::Result<JsonMessageStore> {
    let path = cli
        .store
        .clone()
        .unwrap_or_else(|| settings.store_path.clone());
    let policy = if cli.recover_corrupt || settings.recover_corrupt {
        RecoveryPolicy::DiscardCorrupt
    } else {
        RecoveryPolicy::Strict
    };

    let store = JsonMessageStore::open_with(&path, policy)
        .with_context(|| format!("Failed to open message store {}", path.display()))?;

    if store.recovered_from_corrupt() {
        warn!(
            "Store {:?} was corrupt; starting empty. The file is replaced on the next change.",
            path
        );
    }
    debug!("Opened {:?} with {} messages", path, store.len());
    Ok(store)
}
