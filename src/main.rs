//! mtg-playerinfo: CLI entrypoint
//! Looks a player up on the requested sites and prints the merged profile as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mtg_playerinfo::{config, PlayerIds, PlayerInfoManager, SourceKey};

#[derive(Parser, Debug)]
#[command(name = "mtg-playerinfo")]
#[command(about = "CLI to pull MTG player data from various sources")]
#[command(version)]
struct Cli {
    /// Unity League player ID
    #[arg(long = "unity-id", value_name = "ID")]
    unity_id: Option<String>,

    /// MTG Elo Project player ID
    #[arg(long = "mtgelo-id", value_name = "ID")]
    mtgelo_id: Option<String>,

    /// Melee username
    #[arg(long = "melee-user", value_name = "USERNAME")]
    melee_user: Option<String>,

    /// Topdeck handle (with or without @)
    #[arg(long = "topdeck-handle", value_name = "HANDLE")]
    topdeck_handle: Option<String>,

    /// Untapped.gg profile as userId/playerCode
    #[arg(long = "untapped-id", value_name = "USER_ID/PLAYER_CODE")]
    untapped_id: Option<String>,

    /// Source priority, earliest wins conflicts (e.g. melee,unity)
    #[arg(long, value_delimiter = ',', value_name = "SOURCES")]
    priority: Vec<SourceKey>,

    /// Log how each field was merged (stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Config file (TOML or JSON); defaults to $PLAYERINFO_CONFIG_PATH or config/playerinfo.*
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn player_ids(&self) -> PlayerIds {
        let mut ids = PlayerIds::new();
        for (key, id) in [
            (SourceKey::Unity, &self.unity_id),
            (SourceKey::MtgElo, &self.mtgelo_id),
            (SourceKey::Melee, &self.melee_user),
            (SourceKey::Topdeck, &self.topdeck_handle),
            (SourceKey::Untapped, &self.untapped_id),
        ] {
            if let Some(id) = id {
                ids.insert(key, id.as_str());
            }
        }
        ids
    }
}

/// Logs go to stderr so stdout stays pure JSON.
/// `RUST_LOG` wins; otherwise warnings only, or info with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "mtg_playerinfo=info,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli, ids: PlayerIds) -> anyhow::Result<()> {
    let cfg = config::load(cli.config.as_deref())?;
    let manager = PlayerInfoManager::from_config(&cfg)?.verbose(cli.verbose);

    let priority = (!cli.priority.is_empty()).then_some(cli.priority.as_slice());
    let profile = manager.get_player_info(&ids, priority).await?;

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ids = cli.player_ids();
    if ids.is_empty() {
        eprintln!("Error: Please provide at least one search option (unity-id, mtgelo-id, melee-user, topdeck-handle or untapped-id).");
        return ExitCode::FAILURE;
    }

    match run(cli, ids).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}
