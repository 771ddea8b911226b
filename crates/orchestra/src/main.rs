// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestra - multi-tenant provider credential vault and generation
//! dispatch.
//!
//! This is the operator CLI.

mod credential;
mod generate;
mod prompt;
mod providers;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use orchestra_config::OrchestraConfig;
use orchestra_core::{GenerationRequest, OrchestraError, TenantId};
use orchestra_dispatch::Orchestrator;
use orchestra_providers::AdapterRegistry;
use orchestra_storage::SqliteCredentialStore;
use orchestra_vault::CredentialVault;
use tracing::debug;

/// Orchestra - multi-tenant AI provider credentials and dispatch.
#[derive(Parser, Debug)]
#[command(name = "orchestra", version, about, long_about = None)]
struct Cli {
    /// Load this config file instead of the standard search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage stored provider credentials.
    Credential {
        #[command(subcommand)]
        action: CredentialCommand,
    },
    /// Show supported providers and which ones a tenant has configured.
    Providers {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        json: bool,
    },
    /// Send a prompt to a provider with the tenant's credential.
    Generate {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        prompt: String,
        /// Model override; the provider default is used otherwise.
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CredentialCommand {
    /// Store or rotate a credential. The secret is read from
    /// `ORCHESTRA_CREDENTIAL` or prompted for.
    Add {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List a tenant's credentials (never the secrets).
    List {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete one of a tenant's credentials by id.
    Remove {
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => orchestra_config::load_and_validate_path(path),
        None => orchestra_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            orchestra_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    match run(cli.command, &config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands, config: &OrchestraConfig) -> Result<i32, OrchestraError> {
    let orchestrator = open_orchestrator(config).await?;

    match command {
        Commands::Credential { action } => match action {
            CredentialCommand::Add {
                tenant,
                provider,
                label,
                json,
            } => {
                let provider = credential::parse_provider(&provider)?;
                let secret = prompt::read_credential(provider)?;
                let added = credential::add(
                    orchestrator.vault(),
                    &TenantId::from(tenant),
                    provider,
                    &secret,
                    label.as_deref(),
                )
                .await?;
                credential::print_added(&added, json);
            }
            CredentialCommand::List { tenant, json } => {
                let credentials = orchestrator.vault().list(&TenantId::from(tenant)).await?;
                credential::print_list(&credentials, json);
            }
            CredentialCommand::Remove { tenant, id } => {
                if !credential::remove(orchestrator.vault(), &TenantId::from(tenant), &id).await? {
                    eprintln!("{}: no credential `{id}` for this tenant", "error".red());
                    return Ok(1);
                }
                println!("{} {id}", "removed".green().bold());
            }
        },
        Commands::Providers { tenant, json } => {
            let statuses = providers::list(&orchestrator, &TenantId::from(tenant)).await?;
            providers::print(&statuses, json);
        }
        Commands::Generate {
            tenant,
            provider,
            prompt,
            model,
            json,
        } => {
            let mut request = GenerationRequest::new(prompt);
            if let Some(model) = model {
                request = request.with_model(model);
            }
            let result = orchestrator
                .generate(&TenantId::from(tenant), &provider, &request)
                .await?;
            return Ok(generate::print(&result, json));
        }
    }
    Ok(0)
}

/// Open the SQLite store and build the vault and registry.
///
/// Fails before any command runs if the master secret is missing.
async fn open_orchestrator(config: &OrchestraConfig) -> Result<Orchestrator, OrchestraError> {
    let store = SqliteCredentialStore::new(config.storage.clone());
    store.initialize().await?;
    debug!(path = %config.storage.database_path, "credential store opened");

    let vault = CredentialVault::from_config(Arc::new(store), &config.vault)?;
    let registry = AdapterRegistry::from_config(&config.dispatch, &config.providers)?;
    Ok(Orchestrator::new(Arc::new(vault), registry))
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("orchestra={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_with_model() {
        let cli = Cli::try_parse_from([
            "orchestra", "generate", "--tenant", "t1", "--provider", "gemini", "--prompt", "hi",
            "--model", "gemini-1.5-pro",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                provider, model, json, ..
            } => {
                assert_eq!(provider, "gemini");
                assert_eq!(model.as_deref(), Some("gemini-1.5-pro"));
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_credential_remove() {
        let cli = Cli::try_parse_from([
            "orchestra", "credential", "remove", "--tenant", "t1", "--id", "abc",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Credential {
                action: CredentialCommand::Remove { .. }
            }
        ));
    }
}
