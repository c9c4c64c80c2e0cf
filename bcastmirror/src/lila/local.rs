use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, ClientBuilder, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    common::{LocalRound, LocalTournament, PgnPayload, PushResult, SourceRound, SourceTournament},
    config::{normalize_base, USER_AGENT},
    error::{MirrorError, Result},
    lila::form::{round_form, tournament_form},
    mirror::BroadcastSink,
};

/// Write client for the lila instance receiving the mirror. Every request
/// is authorized with the bearer token given at construction.
#[derive(Debug, Clone)]
pub struct LocalClient {
    client: Client,
    base: String,
    token: String,
}

impl LocalClient {
    pub fn new(builder: ClientBuilder, base: &str, token: String) -> Result<Self> {
        let client = builder
            .user_agent(USER_AGENT)
            .build()
            .map_err(MirrorError::ClientBuild)?;
        Ok(LocalClient {
            client,
            base: normalize_base(base),
            token,
        })
    }

    pub fn new_tournament_url(&self) -> String {
        format!("{}/broadcast/new", self.base)
    }

    pub fn new_round_url(&self, tour_id: &str) -> String {
        format!("{}/broadcast/{}/new", self.base, tour_id)
    }

    pub fn push_url(&self, round_id: &str) -> String {
        format!("{}/api/broadcast/round/{}/push", self.base, round_id)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url).bearer_auth(&self.token)
    }

    pub fn tournament_request(&self, tour: &SourceTournament) -> RequestBuilder {
        self.post(&self.new_tournament_url())
            .form(&tournament_form(tour))
    }

    pub fn round_request(
        &self,
        tour_id: &str,
        round: &SourceRound,
        tiebreaks: &[String],
    ) -> RequestBuilder {
        self.post(&self.new_round_url(tour_id))
            .form(&round_form(round, tiebreaks))
    }

    /// The PGN goes out as the raw request body, not form-encoded.
    pub fn push_request(&self, round_id: &str, pgn: PgnPayload) -> RequestBuilder {
        self.post(&self.push_url(round_id))
            .header(CONTENT_TYPE, "text/plain")
            .body(pgn.into_bytes())
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Value> {
        let req = req.build().map_err(|e| {
            let url = e.url().map(|u| u.to_string()).unwrap_or_default();
            MirrorError::write(url, e)
        })?;
        let url = req.url().to_string();

        self.client
            .execute(req)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MirrorError::write(&url, e))?
            .json::<Value>()
            .await
            .map_err(|e| MirrorError::write(&url, e))
    }
}

#[async_trait]
impl BroadcastSink for LocalClient {
    async fn create_tournament(&self, tour: &SourceTournament) -> Result<LocalTournament> {
        info!("Creating tournament {:?} on {}", tour.name, self.base);
        let resp = self.execute(self.tournament_request(tour)).await?;
        Ok(LocalTournament::from(resp))
    }

    async fn create_round(
        &self,
        tour_id: &str,
        round: &SourceRound,
        tiebreaks: &[String],
    ) -> Result<LocalRound> {
        let resp = self
            .execute(self.round_request(tour_id, round, tiebreaks))
            .await?;
        Ok(LocalRound::from(resp))
    }

    async fn push_pgn(&self, round_id: &str, pgn: PgnPayload) -> Result<PushResult> {
        debug!("Pushing {} bytes of PGN to round {}", pgn.len(), round_id);
        self.execute(self.push_request(round_id, pgn)).await
    }
}
