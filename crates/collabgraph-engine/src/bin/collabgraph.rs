use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use collabgraph_cache::SubjectStorage;
use collabgraph_core::{CollabGraphError, EngineConfig, SubjectIdentity, SubjectStore};
use collabgraph_engine::Synthesizer;
use collabgraph_sources::clients::{
    MusicBrainzClient, OpenAiClient, SpotifyClient, WikipediaClient,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "collabgraph", version, about = "Collaboration graph synthesis engine")]
struct Cli {
    /// Path to the subject store database.
    #[arg(long, env = "COLLABGRAPH_DB", default_value = "collabgraph.db")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a subject in the registry.
    Seed {
        /// Canonical display name.
        name: String,
        /// Registry id; defaults to a slug of the name.
        #[arg(long)]
        id: Option<String>,
    },
    /// Synthesize (and cache) the collaboration graph for a subject.
    Synthesize { name: String },
    /// Print the cached graph for a subject, if any.
    Show { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let storage = Arc::new(SubjectStorage::open(&cli.db).context("opening subject store")?);

    match cli.command {
        Command::Seed { name, id } => {
            let id = id.unwrap_or_else(|| name.to_lowercase().replace(' ', "-"));
            storage
                .upsert_subject(&SubjectIdentity {
                    id,
                    canonical_name: name.clone(),
                })
                .await?;
            println!("registered {name}");
        }
        Command::Synthesize { name } => {
            let synthesizer = Synthesizer::with_default_sources(
                Arc::clone(&storage) as Arc<dyn SubjectStore>,
                Arc::new(OpenAiClient::from_env().context("configuring generation client")?),
                Arc::new(MusicBrainzClient::from_env()?),
                Arc::new(WikipediaClient::from_env()?),
                Arc::new(SpotifyClient::from_env()?),
                EngineConfig::default(),
            );
            match synthesizer.synthesize(&name).await {
                Ok(graph) => println!("{}", serde_json::to_string_pretty(&graph)?),
                Err(CollabGraphError::SubjectNotFound(q)) => {
                    eprintln!("subject {q:?} is not registered; seed it first");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Show { name } => match storage.get_graph(&name).await? {
            Some(graph) => println!("{}", serde_json::to_string_pretty(&graph)?),
            None => {
                eprintln!("no cached graph for {name:?}");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}
