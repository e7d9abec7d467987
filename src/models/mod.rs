use serde::{Deserialize, Serialize};

/// Aggregated playtime for one game, in minutes
///
/// `recent` is the rolling two-week window reported by Steam; games that only
/// appear in the owned-games list default it to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Playtime {
    pub forever: f64,
    pub recent: f64,
}

/// A single personalized recommendation returned to the caller
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub appid: String,
    pub name: String,
    pub score: f64,
}

/// A discovery pick sampled independently of the user profile
///
/// Picks are shuffled before return; their order carries no rank information.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscoveryItem {
    pub appid: String,
    pub name: String,
}

/// Display-name fallback when an appid is missing from the name table
pub fn placeholder_name(appid: &str) -> String {
    format!("Unknown title ({})", appid)
}

// ============================================================================
// Steam Web API Types
// ============================================================================

/// One entry from IPlayerService/GetOwnedGames
#[derive(Debug, Clone, Deserialize)]
pub struct SteamOwnedGame {
    pub appid: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub playtime_forever: f64,
}

/// One entry from IPlayerService/GetRecentlyPlayedGames
#[derive(Debug, Clone, Deserialize)]
pub struct SteamRecentGame {
    pub appid: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub playtime_forever: f64,
    #[serde(default)]
    pub playtime_2weeks: f64,
}

/// Envelope around IPlayerService/GetOwnedGames
#[derive(Debug, Deserialize)]
pub struct OwnedGamesResponse {
    #[serde(default)]
    pub game_count: u64,
    #[serde(default)]
    pub games: Vec<SteamOwnedGame>,
}

/// Envelope around IPlayerService/GetRecentlyPlayedGames
#[derive(Debug, Deserialize)]
pub struct RecentGamesResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub games: Vec<SteamRecentGame>,
}

/// Envelope around ISteamUser/ResolveVanityURL
#[derive(Debug, Deserialize)]
pub struct VanityUrlResponse {
    pub success: i32,
    #[serde(default)]
    pub steamid: Option<String>,
}

/// One player record from ISteamUser/GetPlayerSummaries
#[derive(Debug, Clone, Deserialize)]
pub struct SteamPlayer {
    pub steamid: String,
    #[serde(default)]
    pub personaname: Option<String>,
}

/// Envelope around ISteamUser/GetPlayerSummaries
#[derive(Debug, Deserialize)]
pub struct PlayerSummariesResponse {
    #[serde(default)]
    pub players: Vec<SteamPlayer>,
}
