//! imposit: batch deposition publisher for conference proceedings
//!
//! `check` maps a .bib file and prints the resulting metadata without
//! contacting anything; `upload` maps and publishes every entry against
//! the sandbox service, or against production after an interactive
//! confirmation.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use imposit_core::bibtex;
use imposit_core::config::{ConferenceProfile, Credentials, Environment};
use imposit_core::deposit::ZenodoService;
use imposit_core::docroot::DocumentRoot;
use imposit_core::ledger::Ledger;
use imposit_core::mapping::Mapper;
use imposit_core::run;

#[derive(Parser)]
#[command(
    name = "imposit",
    about = "Batch publisher for conference proceedings depositions",
    version
)]
struct Cli {
    /// Conference profile (TOML).
    #[arg(long, global = true, default_value = "imposit.toml")]
    config: PathBuf,

    /// Token store (TOML).
    #[arg(long, global = true, default_value = "secrets.toml")]
    secrets: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a .bib file and print the metadata that would be published.
    Check {
        bibfile: PathBuf,
        /// Print only the cleaned author names.
        #[arg(long)]
        authors: bool,
    },

    /// Map and publish every entry of a .bib file.
    Upload {
        bibfile: PathBuf,
        /// Publish to the production service instead of the sandbox.
        #[arg(long)]
        production: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let profile = ConferenceProfile::load(&cli.config)
        .with_context(|| format!("loading conference profile {}", cli.config.display()))?;

    match cli.command {
        Commands::Check { bibfile, authors } => check(&bibfile, authors, &profile),
        Commands::Upload {
            bibfile,
            production,
        } => upload(&bibfile, production, &profile, &cli.secrets).await,
    }
}

fn check(bibfile: &Path, authors_only: bool, profile: &ConferenceProfile) -> Result<()> {
    let entries = bibtex::parse_file(bibfile)?;
    let root = DocumentRoot::new(&profile.document_root);
    let mapper = Mapper::new(profile, &root);

    let mapped = run::check_entries(&entries, &mapper)?;
    for document in &mapped {
        if authors_only {
            for creator in &document.metadata.creators {
                println!("{}", creator.name);
            }
        } else {
            println!("{}", serde_json::to_string_pretty(&document.metadata)?);
        }
    }
    tracing::info!(entries = mapped.len(), "check complete");
    Ok(())
}

async fn upload(
    bibfile: &Path,
    production: bool,
    profile: &ConferenceProfile,
    secrets: &Path,
) -> Result<()> {
    let environment = if production {
        Environment::Production
    } else {
        Environment::Sandbox
    };

    if environment == Environment::Production {
        eprintln!(
            "WARNING: you are uploading to the PRODUCTION service. \
             Press Enter to continue or Ctrl-C to abort."
        );
        wait_for_enter()?;
    } else {
        tracing::info!("uploading to the sandbox service");
    }

    let credentials = Credentials::load(secrets)
        .with_context(|| format!("loading token store {}", secrets.display()))?;
    let entries = bibtex::parse_file(bibfile)?;
    let root = DocumentRoot::new(&profile.document_root);
    let mapper = Mapper::new(profile, &root);
    let service = ZenodoService::new(environment, &credentials);
    let ledger = Ledger::open(&profile.ledger_path)?;

    let outcome = run::publish_entries(&entries, &mapper, &service, &ledger).await?;
    tracing::info!(
        environment = environment.label(),
        published = outcome.receipts.len(),
        rejected = outcome.rejected.len(),
        "batch finished"
    );
    Ok(())
}

fn wait_for_enter() -> Result<()> {
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}
