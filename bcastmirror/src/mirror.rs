use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{debug, info, warn};

use crate::{
    common::{
        LocalRound, LocalTournament, PgnPayload, PushResult, RoundStatus, SourceRound,
        SourceTournament,
    },
    error::{MirrorError, Result},
    summary::{RoundOutcome, RoundRecord, RunSummary},
};

/// Where broadcasts are read from.
#[async_trait]
pub trait BroadcastSource {
    async fn fetch_tournament(&self, tour_id: &str) -> Result<SourceTournament>;
    async fn fetch_round_pgn(&self, round_id: &str) -> Result<PgnPayload>;
}

/// Where broadcasts are recreated.
#[async_trait]
pub trait BroadcastSink {
    async fn create_tournament(&self, tour: &SourceTournament) -> Result<LocalTournament>;
    async fn create_round(
        &self,
        tour_id: &str,
        round: &SourceRound,
        tiebreaks: &[String],
    ) -> Result<LocalRound>;
    async fn push_pgn(&self, round_id: &str, pgn: PgnPayload) -> Result<PushResult>;
}

/// Copies one broadcast tournament from a source to a sink.
///
/// Rounds are processed one at a time in source order. Only finished rounds
/// get their PGN copied, and PGN fetches are spaced out by the pacing
/// limiter. The first failing remote call aborts the run; anything already
/// created on the sink is left in place.
pub struct Mirror<S, D> {
    source: S,
    sink: D,
    limiter: Option<DefaultDirectRateLimiter>,
    dry_run: bool,
}

impl<S, D> Mirror<S, D>
where
    S: BroadcastSource,
    D: BroadcastSink,
{
    /// A zero `pace` disables pacing.
    pub fn new(source: S, sink: D, pace: Duration) -> Self {
        let limiter = Quota::with_period(pace).map(RateLimiter::direct);
        Mirror {
            source,
            sink,
            limiter,
            dry_run: false,
        }
    }

    /// In a dry run the source is read but nothing is fetched for rounds and
    /// nothing is written to the sink.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self, tour_id: &str) -> Result<RunSummary> {
        let tour = self.source.fetch_tournament(tour_id).await?;
        if tour.rounds.is_empty() {
            info!("No rounds found in source tournament {}", tour_id);
        }

        if self.dry_run {
            return Ok(self.plan(tour_id, &tour));
        }

        let local = self.sink.create_tournament(&tour).await?;
        let local_tour_id = local
            .id
            .ok_or(MirrorError::IdentifierResolution("local tournament id"))?;
        info!("Local tournament created: {}", local_tour_id);

        let mut summary = RunSummary::new(tour_id, Some(local_tour_id.clone()));
        for (idx, round) in tour.rounds.iter().enumerate() {
            info!("Creating round {} ({}) on local", idx + 1, round.name);
            let local_round = self
                .sink
                .create_round(&local_tour_id, round, &tour.tiebreaks)
                .await?;
            let record = self.mirror_round(round, local_round).await?;
            summary.record(record);
        }

        info!(
            "Mirrored {} of {} rounds into {}",
            summary.count(RoundOutcome::Pushed),
            summary.rounds.len(),
            local_tour_id
        );
        Ok(summary)
    }

    async fn mirror_round(&self, round: &SourceRound, local: LocalRound) -> Result<RoundRecord> {
        let local_round_id = match local.id {
            Some(id) => id,
            None => {
                warn!(
                    "Could not determine local round id for source round {}; skipping PGN push",
                    round.id
                );
                return Ok(RoundRecord {
                    source_round_id: round.id.clone(),
                    local_round_id: None,
                    outcome: RoundOutcome::SkippedNoId,
                    push_result: None,
                });
            }
        };

        if !round.status.is_final() {
            info!(
                "Source round {} is {}; skipping PGN push",
                round.id, round.status
            );
            return Ok(RoundRecord {
                source_round_id: round.id.clone(),
                local_round_id: Some(local_round_id),
                outcome: RoundOutcome::SkippedNotFinished,
                push_result: None,
            });
        }

        self.pace().await;
        info!("Fetching PGN for source round {}", round.id);
        let pgn = self.source.fetch_round_pgn(&round.id).await?;

        info!("Pushing PGN to local round {}", local_round_id);
        let push_result = self.sink.push_pgn(&local_round_id, pgn).await?;

        Ok(RoundRecord {
            source_round_id: round.id.clone(),
            local_round_id: Some(local_round_id),
            outcome: RoundOutcome::Pushed,
            push_result: Some(push_result),
        })
    }

    async fn pace(&self) {
        if let Some(lim) = &self.limiter {
            lim.until_ready().await;
        }
    }

    fn plan(&self, tour_id: &str, tour: &SourceTournament) -> RunSummary {
        info!("Dry run: would create tournament {:?}", tour.name);
        let mut summary = RunSummary::new(tour_id, None);
        summary.dry_run = true;

        for round in &tour.rounds {
            let outcome = match round.status {
                RoundStatus::Finished => RoundOutcome::Planned,
                RoundStatus::Ongoing | RoundStatus::NotStarted => RoundOutcome::SkippedNotFinished,
            };
            debug!("Dry run: round {} ({}) -> {}", round.id, round.status, outcome);
            summary.record(RoundRecord {
                source_round_id: round.id.clone(),
                local_round_id: None,
                outcome,
                push_result: None,
            });
        }
        summary
    }
}
