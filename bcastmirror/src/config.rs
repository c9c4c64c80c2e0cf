use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{MirrorError, Result};

pub const DEFAULT_SOURCE_BASE: &str = "https://lichess.org";
pub const DEFAULT_LOCAL_BASE: &str = "http://localhost:9663";
pub const USER_AGENT: &str = "lichess-broadcast-clone-lila/1.0";
pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

lazy_static! {
    static ref TOUR_ID: Regex = Regex::new(r"^[A-Za-z0-9]{8}$").unwrap();
}

/// Everything a mirror run needs, validated before any request is sent.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub tour_id: String,
    pub source_base: String,
    pub source_token: Option<String>,
    pub local_base: String,
    pub local_token: String,
    /// Minimum spacing between PGN fetches. Zero disables pacing.
    pub pace: Duration,
    pub dry_run: bool,
}

impl MirrorConfig {
    /// Creates a config with default endpoints. Fails if the destination
    /// token is missing or blank.
    ///
    /// The tournament id must look like a lichess id (8 alphanumerics). This
    /// is deliberately stricter than the server requires: a pasted URL or
    /// slug is rejected here instead of turning into a 404 mid-run.
    pub fn new(tour_id: &str, local_token: Option<String>) -> Result<Self> {
        let local_token = match local_token.map(|t| t.trim().to_owned()) {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(MirrorError::Configuration(
                    "local token is required (set LOCAL_LICHESS_TOKEN)".to_owned(),
                ))
            }
        };
        let tour_id = tour_id.trim();
        if !TOUR_ID.is_match(tour_id) {
            return Err(MirrorError::Configuration(format!(
                "invalid broadcast tournament id {:?}, expected 8 alphanumeric characters",
                tour_id
            )));
        }

        Ok(MirrorConfig {
            tour_id: tour_id.to_owned(),
            source_base: DEFAULT_SOURCE_BASE.to_owned(),
            source_token: None,
            local_base: DEFAULT_LOCAL_BASE.to_owned(),
            local_token,
            pace: DEFAULT_PACE,
            dry_run: false,
        })
    }

    pub fn with_source(mut self, base: &str, token: Option<String>) -> Self {
        self.source_base = normalize_base(base);
        self.source_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_local_base(mut self, base: &str) -> Self {
        self.local_base = normalize_base(base);
        self
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

pub(crate) fn normalize_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_owned()
}
