//! Style Scout CLI entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use style_scout::Analyzer;
use style_scout_cli::config::{load_overrides, resolve_config, ConfigFlags};
use style_scout_cli::output::AnalyzeResponse;

#[derive(Parser)]
#[command(
    name = "style-scout",
    about = "Extract a web page's palette and typography and classify its colors into roles",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a page and print the profile as JSON.
    ///
    /// Examples:
    ///   style-scout analyze https://example.com --kit
    ///   style-scout analyze https://example.com --overrides fixes.json --compact
    Analyze {
        /// Page URL (http or https).
        url: String,

        /// Include the kit settings preview.
        #[arg(long)]
        kit: bool,

        /// JSON file with labeledColors / fontSizes / fonts overrides.
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,

        /// Page fetch timeout in milliseconds.
        /// Also reads from STYLE_SCOUT_PAGE_TIMEOUT_MS.
        #[arg(long)]
        page_timeout_ms: Option<u64>,

        /// Per-stylesheet fetch timeout in milliseconds.
        /// Also reads from STYLE_SCOUT_STYLESHEET_TIMEOUT_MS.
        #[arg(long)]
        stylesheet_timeout_ms: Option<u64>,

        /// Maximum linked stylesheets to fetch.
        /// Also reads from STYLE_SCOUT_MAX_STYLESHEETS.
        #[arg(long)]
        max_stylesheets: Option<usize>,

        /// User-Agent header sent with every request.
        /// Also reads from STYLE_SCOUT_USER_AGENT.
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   style-scout completions bash > ~/.local/share/bash-completion/completions/style-scout
    ///   style-scout completions zsh > ~/.zfunc/_style-scout
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            url,
            kit,
            overrides,
            compact,
            page_timeout_ms,
            stylesheet_timeout_ms,
            max_stylesheets,
            user_agent,
        } => {
            let overrides = overrides.as_deref().map(load_overrides).transpose()?;
            let config = resolve_config(&ConfigFlags {
                page_timeout_ms,
                stylesheet_timeout_ms,
                max_stylesheets,
                user_agent,
            });

            let analyzer = Analyzer::with_http(config);
            let mut profile = analyzer.analyze(&url).await;
            if let Some(overrides) = overrides {
                profile = overrides.apply(profile);
            }

            let response = AnalyzeResponse::from_profile(profile, kit);
            let json = response
                .to_json(compact)
                .context("serializing analysis")?;
            println!("{json}");

            if !response.ok {
                std::process::exit(1);
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "style-scout", &mut std::io::stdout());
        }
    }

    Ok(())
}
