/// Player-data provider abstraction
///
/// The engine only needs four things from the outside world: resolving a
/// user-supplied profile reference to a stable id, a display name for that
/// user, and the owned/recently-played game lists. Keeping them behind one
/// trait lets tests drive the recommendation flow with a mock instead of the
/// live Steam Web API.
use crate::error::AppResult;
use crate::models::{SteamOwnedGame, SteamRecentGame};

pub mod steam;

/// A user-supplied profile reference, already syntactically validated
///
/// Steam community URLs come in two shapes: `/id/<vanity-name>/`, which needs
/// a resolution call, and `/profiles/<steamid64>/`, which embeds the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRef {
    Vanity(String),
    SteamId(String),
}

/// Trait for player-data providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlayerDataProvider: Send + Sync {
    /// Resolves a profile reference to a SteamID64
    async fn resolve_profile(&self, profile: &ProfileRef) -> AppResult<String>;

    /// Fetches the user's display name; a lookup failure is not fatal and
    /// degrades to `None` at the call site
    async fn persona_name(&self, steamid: &str) -> AppResult<Option<String>>;

    /// Fetches every game the user owns, with lifetime playtime
    async fn owned_games(&self, steamid: &str) -> AppResult<Vec<SteamOwnedGame>>;

    /// Fetches the user's recently played games, with two-week playtime
    async fn recent_games(&self, steamid: &str) -> AppResult<Vec<SteamRecentGame>>;
}
