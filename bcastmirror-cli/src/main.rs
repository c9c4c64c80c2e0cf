mod mirror;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a Lichess broadcast tournament to a local lila instance and push PGN
    Mirror(MirrorArgs),
}

#[derive(Args)]
pub struct MirrorArgs {
    /// Broadcast tournament ID on the source instance (8 chars)
    #[clap(long)]
    tour_id: String,
    /// Local lila base URL
    #[clap(long, env = "LOCAL_LICHESS_BASE", default_value = bcastmirror::config::DEFAULT_LOCAL_BASE)]
    local_lila: String,
    /// Bearer token for the local lila instance
    #[clap(long, env = "LOCAL_LICHESS_TOKEN", hide_env_values = true)]
    local_token: Option<String>,
    /// Base URL of the instance the broadcast is read from
    #[clap(long, env = "LICHESS_BASE", default_value = bcastmirror::config::DEFAULT_SOURCE_BASE)]
    source_base: String,
    /// Optional bearer token for reading private broadcasts
    #[clap(long, env = "LICHESS_TOKEN", hide_env_values = true)]
    source_token: Option<String>,
    /// Minimum delay between PGN fetches, in milliseconds
    #[clap(long, default_value = "1000")]
    pace_ms: u64,
    /// If enabled, nothing is written to the local instance
    #[clap(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Values from .env must be loaded before clap reads its env fallbacks.
    if let Ok(path) = dotenv::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    match &cli.command {
        Commands::Mirror(args) => mirror::start_mirror(args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_mirror_args() {
        let cli = Cli::try_parse_from([
            "bcastmirror",
            "mirror",
            "--tour-id",
            "wEuVhT9c",
            "--local-lila",
            "http://lila.test:8080",
            "--local-token",
            "lip_abc",
            "--pace-ms",
            "0",
            "--dry-run",
        ])
        .unwrap();

        let Commands::Mirror(args) = cli.command;
        assert_eq!(args.tour_id, "wEuVhT9c");
        assert_eq!(args.local_lila, "http://lila.test:8080");
        assert_eq!(args.local_token.as_deref(), Some("lip_abc"));
        assert_eq!(args.pace_ms, 0);
        assert!(args.dry_run);
    }

    #[test]
    fn local_token_from_dotenv_file() {
        let path = std::env::temp_dir().join(format!("bcastmirror-{}.env", std::process::id()));
        std::fs::write(&path, "LOCAL_LICHESS_TOKEN=lip_from_file\n").unwrap();
        std::env::remove_var("LOCAL_LICHESS_TOKEN");

        dotenv::from_path(&path).unwrap();
        let cli = Cli::try_parse_from(["bcastmirror", "mirror", "--tour-id", "wEuVhT9c"]).unwrap();
        std::fs::remove_file(&path).unwrap();

        let Commands::Mirror(args) = cli.command;
        assert_eq!(args.local_token.as_deref(), Some("lip_from_file"));
    }

    #[test]
    fn tour_id_is_required() {
        assert!(Cli::try_parse_from(["bcastmirror", "mirror"]).is_err());
    }
}
