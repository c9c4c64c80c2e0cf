use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use strum::{Display, EnumString};

/// Status of a source round at fetch time.
///
/// The source reports two independent flags, `finished` and `ongoing`. An
/// ongoing round is treated as live even if it is also flagged finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RoundStatus {
    NotStarted,
    Ongoing,
    Finished,
}

impl RoundStatus {
    pub fn from_flags(finished: bool, ongoing: bool) -> Self {
        match (finished, ongoing) {
            (_, true) => RoundStatus::Ongoing,
            (true, false) => RoundStatus::Finished,
            (false, false) => RoundStatus::NotStarted,
        }
    }

    /// Only finished rounds carry an authoritative game record.
    pub fn is_final(self) -> bool {
        matches!(self, RoundStatus::Finished)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameResult {
    Win,
    Draw,
}

pub const COLORS: [Color; 2] = [Color::White, Color::Black];
pub const RESULTS: [GameResult; 2] = [GameResult::Win, GameResult::Draw];

/// Points awarded to one color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorScoring {
    pub win: Option<Number>,
    pub draw: Option<Number>,
}

/// Per-round scoring override. Numbers are kept as the source wrote them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomScoring {
    pub white: Option<ColorScoring>,
    pub black: Option<ColorScoring>,
}

impl CustomScoring {
    pub fn get(&self, color: Color, result: GameResult) -> Option<&Number> {
        let side = match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }?;
        match result {
            GameResult::Win => side.win.as_ref(),
            GameResult::Draw => side.draw.as_ref(),
        }
    }

    /// An empty table (`{}`) is treated the same as no table at all.
    pub fn is_empty(&self) -> bool {
        self.white.is_none() && self.black.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentInfo {
    pub fide_tc: Option<String>,
    pub format: Option<String>,
    pub location: Option<String>,
    pub players: Option<String>,
    pub tc: Option<String>,
    pub standings: Option<String>,
    #[serde(alias = "timeZone")]
    pub timezone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RoundWire")]
pub struct SourceRound {
    pub id: String,
    pub name: String,
    pub rated: bool,
    pub custom_scoring: Option<CustomScoring>,
    pub status: RoundStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoundWire {
    id: String,
    name: Option<String>,
    rated: Option<bool>,
    custom_scoring: Option<CustomScoring>,
    #[serde(default)]
    finished: bool,
    #[serde(default)]
    ongoing: bool,
}

impl From<RoundWire> for SourceRound {
    fn from(w: RoundWire) -> Self {
        SourceRound {
            id: w.id,
            name: w.name.unwrap_or_else(|| "Round".to_owned()),
            rated: w.rated.unwrap_or(true),
            custom_scoring: w.custom_scoring.filter(|s| !s.is_empty()),
            status: RoundStatus::from_flags(w.finished, w.ongoing),
        }
    }
}

/// A broadcast tournament as returned by `GET /api/broadcast/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "BroadcastWire")]
pub struct SourceTournament {
    pub id: String,
    pub name: String,
    pub description: String,
    pub info: TournamentInfo,
    pub team_table: bool,
    pub tiebreaks: Vec<String>,
    pub rounds: Vec<SourceRound>,
}

#[derive(Deserialize)]
struct BroadcastWire {
    #[serde(default)]
    tour: TourWire,
    #[serde(default)]
    rounds: Vec<SourceRound>,
    tiebreaks: Option<Vec<String>>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TourWire {
    #[serde(default)]
    id: String,
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    info: TournamentInfo,
    #[serde(default)]
    team_table: bool,
    tiebreaks: Option<Vec<String>>,
}

impl From<BroadcastWire> for SourceTournament {
    fn from(w: BroadcastWire) -> Self {
        let tour = w.tour;
        SourceTournament {
            id: tour.id,
            name: tour.name.unwrap_or_else(|| "Broadcast".to_owned()),
            description: tour.description.unwrap_or_default(),
            info: tour.info,
            team_table: tour.team_table,
            tiebreaks: tour.tiebreaks.or(w.tiebreaks).unwrap_or_default(),
            rounds: w.rounds,
        }
    }
}

/// Raw game text for one round, kept as the source sent it. Never decoded
/// or parsed, so the push is byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnPayload(pub Vec<u8>);

impl PgnPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<&str> for PgnPayload {
    fn from(s: &str) -> Self {
        PgnPayload(s.as_bytes().to_vec())
    }
}

/// Response to a PGN push; the destination owns its shape.
pub type PushResult = Value;

/// Tournament created on the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTournament {
    pub id: Option<String>,
    pub response: Value,
}

impl From<Value> for LocalTournament {
    fn from(response: Value) -> Self {
        let id = string_at(&response, "/tour/id");
        LocalTournament { id, response }
    }
}

/// Round created on the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalRound {
    pub id: Option<String>,
    pub response: Value,
}

impl From<Value> for LocalRound {
    fn from(response: Value) -> Self {
        let id = string_at(&response, "/round/id").or_else(|| string_at(&response, "/id"));
        LocalRound { id, response }
    }
}

fn string_at(v: &Value, pointer: &str) -> Option<String> {
    v.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
