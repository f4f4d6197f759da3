use serde::{Deserialize, Serialize};

/// Entry on the legacy squad sheet. Not linked to any login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
}
