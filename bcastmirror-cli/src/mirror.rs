use std::time::Duration;

use anyhow::{Context, Result};
use bcastmirror::{LocalClient, Mirror, MirrorConfig, SourceClient};
use reqwest::ClientBuilder;
use tracing::{debug, info};

use crate::MirrorArgs;

impl MirrorArgs {
    /// Validates arguments into a run config. Fails without touching the
    /// network when the local token is missing.
    fn config(&self) -> Result<MirrorConfig> {
        let cfg = MirrorConfig::new(&self.tour_id, self.local_token.clone())?
            .with_local_base(&self.local_lila)
            .with_source(&self.source_base, self.source_token.clone())
            .with_pace(Duration::from_millis(self.pace_ms))
            .with_dry_run(self.dry_run);
        Ok(cfg)
    }
}

pub async fn start_mirror(args: &MirrorArgs) -> Result<()> {
    let cfg = args.config()?;
    debug!(
        "mirror config: tour={}, source={}, local={}",
        cfg.tour_id, cfg.source_base, cfg.local_base
    );

    let source = SourceClient::new(
        ClientBuilder::new(),
        &cfg.source_base,
        cfg.source_token.clone(),
    )?;
    let sink = LocalClient::new(ClientBuilder::new(), &cfg.local_base, cfg.local_token.clone())?;
    let mirror = Mirror::new(source, sink, cfg.pace).dry_run(cfg.dry_run);

    let summary = mirror
        .run(&cfg.tour_id)
        .await
        .with_context(|| format!("mirroring broadcast {}", cfg.tour_id))?;

    info!("Done. Summary:");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
