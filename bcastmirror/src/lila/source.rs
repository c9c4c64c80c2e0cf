use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use tracing::{debug, info};

use crate::{
    common::{PgnPayload, SourceTournament},
    config::{normalize_base, USER_AGENT},
    error::{MirrorError, Result},
    mirror::BroadcastSource,
};

/// Read-only client for the service the broadcast is copied from.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
    base: String,
    token: Option<String>,
}

impl SourceClient {
    /// Creates a SourceClient from the provided Reqwest client builder.
    /// Without a token, requests are sent anonymously, which is enough for
    /// public broadcasts.
    pub fn new(builder: ClientBuilder, base: &str, token: Option<String>) -> Result<Self> {
        let client = builder
            .user_agent(USER_AGENT)
            .build()
            .map_err(MirrorError::ClientBuild)?;
        Ok(SourceClient {
            client,
            base: normalize_base(base),
            token,
        })
    }

    pub fn tournament_url(&self, tour_id: &str) -> String {
        format!("{}/api/broadcast/{}", self.base, tour_id)
    }

    pub fn round_pgn_url(&self, round_id: &str) -> String {
        format!("{}/api/broadcast/round/{}.pgn", self.base, round_id)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let req = self.client.get(url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends a read and fails on any non-success status.
    async fn execute(&self, url: &str) -> Result<Response> {
        self.get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MirrorError::fetch(url, e))
    }
}

#[async_trait]
impl BroadcastSource for SourceClient {
    async fn fetch_tournament(&self, tour_id: &str) -> Result<SourceTournament> {
        let url = self.tournament_url(tour_id);
        info!("Fetching source tournament {} from {}", tour_id, self.base);

        let tour = self
            .execute(&url)
            .await?
            .json::<SourceTournament>()
            .await
            .map_err(|e| MirrorError::fetch(&url, e))?;

        debug!("Source tournament {} has {} rounds", tour_id, tour.rounds.len());
        Ok(tour)
    }

    async fn fetch_round_pgn(&self, round_id: &str) -> Result<PgnPayload> {
        let url = self.round_pgn_url(round_id);
        let body = self
            .execute(&url)
            .await?
            .bytes()
            .await
            .map_err(|e| MirrorError::fetch(&url, e))?;

        debug!("Fetched {} bytes of PGN for round {}", body.len(), round_id);
        Ok(PgnPayload(body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lila::test_server;

    #[test]
    fn source_urls() {
        let client = SourceClient::new(Client::builder(), "https://lichess.org/", None).unwrap();

        assert_eq!(
            client.tournament_url("wEuVhT9c"),
            "https://lichess.org/api/broadcast/wEuVhT9c"
        );
        assert_eq!(
            client.round_pgn_url("0ZDpU6Lk"),
            "https://lichess.org/api/broadcast/round/0ZDpU6Lk.pgn"
        );
    }

    #[test]
    fn token_is_optional() {
        let anon = SourceClient::new(Client::builder(), "https://lichess.org", None).unwrap();
        let req = anon.get(&anon.tournament_url("wEuVhT9c")).build().unwrap();
        assert!(req.headers().get("authorization").is_none());

        let authed = SourceClient::new(
            Client::builder(),
            "https://lichess.org",
            Some("lip_src".to_owned()),
        )
        .unwrap();
        let req = authed.get(&authed.tournament_url("wEuVhT9c")).build().unwrap();
        assert_eq!(req.headers().get("authorization").unwrap(), "Bearer lip_src");
    }

    #[tokio::test]
    async fn server_error_is_a_fetch_error() {
        let base = test_server::serve("500 Internal Server Error", b"").await;
        let client = SourceClient::new(Client::builder(), &base, None).unwrap();

        let err = client.fetch_tournament("wEuVhT9c").await.unwrap_err();
        match err {
            MirrorError::RemoteFetch { url, .. } => {
                assert_eq!(url, format!("{}/api/broadcast/wEuVhT9c", base))
            }
            other => panic!("unexpected error: {}", other),
        }

        let err = client.fetch_round_pgn("0ZDpU6Lk").await.unwrap_err();
        assert!(matches!(err, MirrorError::RemoteFetch { .. }));
    }

    #[tokio::test]
    async fn malformed_tournament_is_a_fetch_error() {
        let base = test_server::serve("200 OK", b"<html>not json</html>").await;
        let client = SourceClient::new(Client::builder(), &base, None).unwrap();

        let err = client.fetch_tournament("wEuVhT9c").await.unwrap_err();
        assert!(matches!(err, MirrorError::RemoteFetch { .. }));
    }

    #[tokio::test]
    async fn pgn_bytes_are_kept_verbatim() {
        let raw: &'static [u8] = b"\xEF\xBB\xBF[Event \"Candidates\"]\r\n\r\n1. d4 \xFF *\n";
        let base = test_server::serve("200 OK", raw).await;
        let client = SourceClient::new(Client::builder(), &base, None).unwrap();

        let pgn = client.fetch_round_pgn("0ZDpU6Lk").await.unwrap();

        assert_eq!(pgn.as_bytes(), raw);
    }

    #[tokio::test]
    async fn unreachable_source_is_a_fetch_error() {
        let client = SourceClient::new(Client::builder(), "http://127.0.0.1:1", None).unwrap();

        let err = client.fetch_tournament("wEuVhT9c").await.unwrap_err();
        assert!(matches!(err, MirrorError::RemoteFetch { .. }));
    }
}
