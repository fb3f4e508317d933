//! Wire types for a bracket snapshot document (JSON, camelCase).
//!
//! Every field is optional on the wire; `client::map_snapshot` turns these
//! into the domain types.

use serde::Deserialize;

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    #[serde(default)]
    pub title: Option<String>,
    /// Empty when the source leaves round sizing to the viewer.
    #[serde(default)]
    pub rounds: Vec<WireRound>,
    #[serde(default)]
    pub matches: Vec<WireMatch>,
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireRound {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub slot_count: usize,
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireMatch {
    pub id: Option<String>,
    pub round_id: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub home: Option<WireSide>,
    pub away: Option<WireSide>,
}

#[derive(Deserialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireSide {
    pub team_id: Option<String>,
    pub display_name: Option<String>,
    pub logo_ref: Option<String>,
    pub score: Option<u32>,
}
