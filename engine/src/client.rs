use crate::snapshot::{SnapshotResponse, WireMatch, WireRound, WireSide};
use crate::{BracketShape, LayoutError, Match, MatchStatus, RoundDef, ScheduledAt, Side, Snapshot};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ClientResult<T> = Result<T, ClientError>;

const TBD: &str = "TBD";

/// Loads bracket snapshots from a local JSON file or an HTTP(S) endpoint.
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    client: Client,
    timeout: Duration,
}

impl Default for SnapshotClient {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("knockout/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ClientError {
    Io(std::io::Error, String),
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(String, String),
    InvalidBracket(LayoutError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Io(e, path) => write!(f, "Could not read {path}: {e}"),
            ClientError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ClientError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ClientError::Parsing(e, source) => write!(f, "Parse error for {source}: {e}"),
            ClientError::InvalidBracket(e) => write!(f, "Invalid bracket: {e}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<LayoutError> for ClientError {
    fn from(e: LayoutError) -> Self {
        ClientError::InvalidBracket(e)
    }
}

impl SnapshotClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot. `source` is either an `http://`/`https://` URL or a
    /// path to a JSON file.
    pub async fn fetch(&self, source: &str) -> ClientResult<Snapshot> {
        let raw = if is_url(source) {
            self.get(source).await?
        } else {
            read_file(source)?
        };
        map_snapshot(raw)
    }

    async fn get(&self, url: &str) -> ClientResult<SnapshotResponse> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ClientError::Api(e, url.to_owned()))?
            .json::<SnapshotResponse>()
            .await
            .map_err(|e| ClientError::Parsing(e.to_string(), url.to_owned()))
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn read_file(path: &str) -> ClientResult<SnapshotResponse> {
    let content = std::fs::read_to_string(path).map_err(|e| ClientError::Io(e, path.to_owned()))?;
    serde_json::from_str(&content).map_err(|e| ClientError::Parsing(e.to_string(), path.to_owned()))
}

// ---------------------------------------------------------------------------
// Mapping: snapshot wire types → clean domain types
// ---------------------------------------------------------------------------

/// Map a wire snapshot into the domain model.
///
/// When the document carries no round definitions the conventional ladder is
/// used, sized by the largest conventional round id any match refers to.
pub fn map_snapshot(raw: SnapshotResponse) -> ClientResult<Snapshot> {
    let rounds = if raw.rounds.is_empty() {
        let first = raw
            .matches
            .iter()
            .filter_map(|m| m.round_id.as_deref().and_then(RoundDef::standard_slot_count))
            .max()
            .unwrap_or(1);
        RoundDef::standard(first)
    } else {
        raw.rounds.into_iter().map(map_round).collect()
    };

    Ok(Snapshot {
        title: raw.title.unwrap_or_else(|| "Bracket".into()),
        shape: BracketShape::new(rounds)?,
        matches: raw.matches.iter().map(map_match).collect(),
    })
}

fn map_round(r: WireRound) -> RoundDef {
    let label = r.label.unwrap_or_else(|| r.id.clone());
    RoundDef { id: r.id, label, slot_count: r.slot_count }
}

fn map_match(m: &WireMatch) -> Match {
    Match {
        id: m.id.clone().unwrap_or_default(),
        round_id: m.round_id.clone().unwrap_or_default(),
        scheduled_at: ScheduledAt::parse(m.scheduled_at.as_deref().unwrap_or_default()),
        status: m.status.as_deref().map(parse_status).unwrap_or_default(),
        home: m.home.as_ref().map(map_side).unwrap_or_else(tbd_side),
        away: m.away.as_ref().map(map_side).unwrap_or_else(tbd_side),
    }
}

fn map_side(s: &WireSide) -> Side {
    let team_id = s.team_id.clone().unwrap_or_default();
    let display_name = s
        .display_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| (!team_id.is_empty()).then(|| team_id.clone()))
        .unwrap_or_else(|| TBD.into());
    Side { team_id, display_name, logo_ref: s.logo_ref.clone(), score: s.score }
}

fn tbd_side() -> Side {
    Side { display_name: TBD.into(), ..Side::default() }
}

fn parse_status(s: &str) -> MatchStatus {
    match s.trim().to_ascii_lowercase().as_str() {
        "in_progress" | "inprogress" | "live" => MatchStatus::InProgress,
        "finished" | "final" | "ft" => MatchStatus::Finished,
        _ => MatchStatus::Scheduled,
    }
}
