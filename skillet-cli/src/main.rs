//! Skillet CLI - Command line interface for skillet
//!
//! Service-backed skills for coding agents: codex code review with issue
//! context, agentic web search, deep research, and keyword research.

mod commands;

use clap::{Parser, Subcommand};
use skillet_core::{Config, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ContextArgs, KeywordsArgs, ResearchArgs, ReviewArgs, SearchArgs};

/// Skillet: service-backed skills for coding agents
#[derive(Parser, Debug)]
#[command(name = "skillet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to codex executable (overrides config and env)
    #[arg(long, global = true, env = "SKILLET_CODEX_PATH")]
    codex_path: Option<String>,

    /// Review model to use (overrides config and env)
    #[arg(long, global = true, env = "SKILLET_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Run a codex code review over a chosen diff
    #[command(visible_alias = "r")]
    Review(ReviewArgs),

    /// Gather and display review context without reviewing
    Context(ContextArgs),

    /// Agentic web search
    Search(SearchArgs),

    /// Deep research producing a cited report
    Research(ResearchArgs),

    /// Keyword research for SEO
    #[command(visible_alias = "kw")]
    Keywords(KeywordsArgs),

    /// Show current configuration
    Config {
        /// Write a secrets file template at the default location
        #[arg(long)]
        init_secrets: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.codex_path.clone(), cli.model.clone())?;

    if cli.verbose {
        tracing::info!(
            codex_path = %config.review.codex_path,
            model = %config.review.model,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("skillet {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Review(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Context(args)) => {
            args.execute(cli.verbose).await?;
        }
        Some(Commands::Search(args)) => {
            args.execute(cli.verbose).await?;
        }
        Some(Commands::Research(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Keywords(args)) => {
            args.execute(cli.verbose).await?;
        }
        Some(Commands::Config { init_secrets }) => {
            if init_secrets {
                let path = Secrets::create_template()?;
                println!("Wrote secrets template to {}", path.display());
                println!();
            }
            let secrets = Secrets::load()?;
            println!("Skillet Configuration");
            println!("=====================");
            println!();
            println!("Review Settings:");
            println!("  codex_path: {}", config.review.codex_path);
            println!("  model: {}", config.review.model);
            println!("  base_branch: {}", config.review.base_branch);
            println!();
            println!("Research Settings:");
            println!("  processor: {}", config.research.processor);
            println!("  timeout: {}s", config.research.timeout.as_secs());
            println!();
            println!("Secrets:");
            for (service, present) in secrets_presence(&secrets) {
                let state = if present { "set" } else { "missing" };
                println!("  {}: {}", service, state);
            }
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
            if let Some(path) = Secrets::default_secrets_path() {
                println!("Secrets file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using env vars only)");
                }
            }
        }
        None => {
            println!("Skillet - service-backed skills for coding agents");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Which service credentials resolve, from env or the secrets file
///
/// Carries presence only, never the values.
fn secrets_presence(secrets: &Secrets) -> Vec<(&'static str, bool)> {
    vec![
        ("linear", secrets.linear_api_key().is_some()),
        ("sentry", secrets.sentry_auth_token().is_some()),
        ("parallel", secrets.parallel_api_key().is_some()),
        ("dataforseo", secrets.dataforseo_credentials().is_some()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillet_core::secrets::{DataForSeoSecrets, LinearSecrets};

    #[test]
    fn test_secrets_presence_covers_each_service() {
        for var in [
            "LINEAR_API_KEY",
            "SENTRY_AUTH_TOKEN",
            "PARALLEL_API_KEY",
            "DATAFORSEO_USERNAME",
            "DATAFORSEO_PASSWORD",
        ] {
            std::env::remove_var(var);
        }

        let secrets = Secrets {
            linear: LinearSecrets {
                api_key: Some("lin_api_test".to_string()),
            },
            dataforseo: DataForSeoSecrets {
                username: Some("user@example.com".to_string()),
                password: None,
            },
            ..Default::default()
        };

        assert_eq!(
            secrets_presence(&secrets),
            vec![
                ("linear", true),
                ("sentry", false),
                ("parallel", false),
                // Half a credential pair does not count as present
                ("dataforseo", false),
            ]
        );
    }
}
