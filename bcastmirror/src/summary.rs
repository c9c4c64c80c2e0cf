use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;

use crate::common::PushResult;

/// What happened to one source round during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RoundOutcome {
    /// PGN fetched from the source and pushed to the mirror round.
    Pushed,
    /// Round not finished at fetch time, nothing pushed.
    SkippedNotFinished,
    /// The destination did not return a round id, nothing pushed.
    SkippedNoId,
    /// Dry run only: the round would have been pushed.
    Planned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRecord {
    pub source_round_id: String,
    pub local_round_id: Option<String>,
    pub outcome: RoundOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_result: Option<PushResult>,
}

/// Append-only record of a mirror run, printed when the run ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub source_tournament_id: String,
    pub local_tournament_id: Option<String>,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub rounds: Vec<RoundRecord>,
}

impl RunSummary {
    pub fn new(source_tournament_id: &str, local_tournament_id: Option<String>) -> Self {
        RunSummary {
            source_tournament_id: source_tournament_id.to_owned(),
            local_tournament_id,
            dry_run: false,
            started_at: Utc::now(),
            rounds: Vec::new(),
        }
    }

    pub fn record(&mut self, record: RoundRecord) {
        self.rounds.push(record);
    }

    /// Rounds whose games were pushed to the mirror.
    pub fn pushed(&self) -> impl Iterator<Item = &RoundRecord> {
        self.rounds
            .iter()
            .filter(|r| r.outcome == RoundOutcome::Pushed)
    }

    pub fn count(&self, outcome: RoundOutcome) -> usize {
        self.rounds.iter().filter(|r| r.outcome == outcome).count()
    }
}
