use anyhow::{Context, Result};
use catalog::remote::{build_client, DEFAULT_AUTH_URL, DEFAULT_SKILLS_URL};
use catalog::{load_catalog, save_snapshot, ClientCredentials, CredentialProvider, RemoteCatalog, SnapshotPaths, StaticToken};
use clap::{Parser, Subcommand};
use reqwest::Url;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Fetch, import and inspect skill catalogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the skills directory into a snapshot
    Fetch {
        /// Output snapshot directory
        #[arg(long, default_value = "./catalog")]
        output: String,
        /// Skills service base URL
        #[arg(long, default_value = DEFAULT_SKILLS_URL)]
        skills_url: String,
        /// OAuth token endpoint
        #[arg(long, default_value = DEFAULT_AUTH_URL)]
        auth_url: String,
        /// Request timeout seconds
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },
    /// Convert a JSON, JSONL or text catalog file into a snapshot
    Import {
        /// Input catalog file
        #[arg(long)]
        input: String,
        /// Output snapshot directory
        #[arg(long, default_value = "./catalog")]
        output: String,
    },
    /// Print the size and first names of a catalog
    Show {
        /// Snapshot directory or catalog file
        #[arg(long, default_value = "./catalog")]
        catalog: String,
        /// How many names to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { output, skills_url, auth_url, timeout_secs } => {
            fetch(&output, &skills_url, &auth_url, timeout_secs).await
        }
        Commands::Import { input, output } => {
            let catalog = load_catalog(&input)?;
            let meta = save_snapshot(&SnapshotPaths::new(&output), &catalog, &input)?;
            tracing::info!(output = %output, num_skills = meta.num_skills, "snapshot written");
            Ok(())
        }
        Commands::Show { catalog, limit } => {
            let loaded = load_catalog(&catalog)?;
            println!("{} skills", loaded.len());
            for name in loaded.iter().take(limit) {
                println!("  {name}");
            }
            Ok(())
        }
    }
}

async fn fetch(output: &str, skills_url: &str, auth_url: &str, timeout_secs: u64) -> Result<()> {
    let client = build_client(timeout_secs)?;
    let credentials = credentials_from_env(&client, auth_url)?;
    let remote = RemoteCatalog::new(client, skills_url, credentials)?;
    let catalog = remote.fetch().await?;
    let meta = save_snapshot(&SnapshotPaths::new(output), &catalog, remote.skills_url().as_str())?;
    tracing::info!(output, num_skills = meta.num_skills, "snapshot written");
    Ok(())
}

/// SKILLS_TOKEN wins when set; otherwise the client-credentials triple is required.
fn credentials_from_env(client: &reqwest::Client, auth_url: &str) -> Result<Arc<dyn CredentialProvider>> {
    if let Ok(token) = std::env::var("SKILLS_TOKEN") {
        return Ok(Arc::new(StaticToken(token)));
    }
    let token_url = Url::parse(auth_url).with_context(|| format!("invalid auth url {auth_url:?}"))?;
    Ok(Arc::new(ClientCredentials::new(
        client.clone(),
        token_url,
        require_env("SKILLS_CLIENT_ID")?,
        require_env("SKILLS_CLIENT_SECRET")?,
        require_env("SKILLS_SCOPE")?,
    )))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
