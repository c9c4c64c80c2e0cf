use tracing::debug;

use crate::common::{SourceRound, SourceTournament, COLORS, RESULTS};

/// Ordered `application/x-www-form-urlencoded` pairs. Keys may repeat.
pub type Form = Vec<(String, String)>;

fn field(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_owned(), value.into())
}

/// Builds the body for `POST /broadcast/new`. Info fields the source lacks
/// are sent empty rather than dropped. Scores and rating diffs are always
/// shown on the mirror.
pub fn tournament_form(tour: &SourceTournament) -> Form {
    debug!("Building tournament form for {}", tour.id);

    let info = &tour.info;
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();

    vec![
        field("name", tour.name.as_str()),
        field("description", tour.description.as_str()),
        field("visibility", "public"),
        field("info.fideTc", opt(&info.fide_tc)),
        field("info.format", opt(&info.format)),
        field("info.tc", opt(&info.tc)),
        field("info.location", opt(&info.location)),
        field("info.players", opt(&info.players)),
        field("info.standings", opt(&info.standings)),
        field("info.timezone", opt(&info.timezone)),
        field("info.website", opt(&info.website)),
        field("teamTable", tour.team_table.to_string()),
        field("showScores", "true"),
        field("showRatingDiffs", "true"),
    ]
}

/// Builds the body for `POST /broadcast/{tourId}/new`. The mirror round is
/// always in push mode; custom scoring is only sent when the source round
/// defines it.
pub fn round_form(round: &SourceRound, tiebreaks: &[String]) -> Form {
    debug!("Building round form for {}", round.id);

    let mut form = vec![
        field("name", round.name.as_str()),
        field("syncSource", "push"),
        field("rated", round.rated.to_string()),
    ];
    form.extend(tiebreaks.iter().map(|t| field("tiebreaks[]", t.as_str())));

    if let Some(scoring) = &round.custom_scoring {
        for color in COLORS {
            for result in RESULTS {
                let key = format!("customScoring.{}.{}", color, result);
                let value = scoring
                    .get(color, result)
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                form.push((key, value));
            }
        }
    }

    form
}
