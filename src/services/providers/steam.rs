/// Steam Web API provider
///
/// Endpoints used:
/// - ISteamUser/ResolveVanityURL/v1 — vanity name → SteamID64
/// - ISteamUser/GetPlayerSummaries/v2 — persona name
/// - IPlayerService/GetOwnedGames/v1 — full library with lifetime playtime
/// - IPlayerService/GetRecentlyPlayedGames/v1 — two-week playtime window
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        OwnedGamesResponse, PlayerSummariesResponse, RecentGamesResponse, SteamOwnedGame,
        SteamRecentGame, VanityUrlResponse,
    },
    services::providers::{PlayerDataProvider, ProfileRef},
};

/// Every Steam Web API payload sits under a top-level "response" key
#[derive(Debug, Deserialize)]
struct SteamEnvelope<T> {
    response: T,
}

#[derive(Clone)]
pub struct SteamProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl SteamProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Steam API returned status {} for {}: {}",
                status, path, body
            )));
        }

        let envelope: SteamEnvelope<T> = response.json().await?;
        Ok(envelope.response)
    }
}

#[async_trait::async_trait]
impl PlayerDataProvider for SteamProvider {
    async fn resolve_profile(&self, profile: &ProfileRef) -> AppResult<String> {
        match profile {
            ProfileRef::SteamId(steamid) => Ok(steamid.clone()),
            ProfileRef::Vanity(vanity) => {
                let response: VanityUrlResponse = self
                    .get(
                        "/ISteamUser/ResolveVanityURL/v1/",
                        &[("vanityurl", vanity.as_str())],
                    )
                    .await?;

                // success == 1 is the API's match indicator; anything else
                // means the vanity name does not exist.
                if response.success != 1 {
                    return Err(AppError::NotFound(format!(
                        "No Steam account for vanity name {:?}",
                        vanity
                    )));
                }
                response.steamid.ok_or_else(|| {
                    AppError::ExternalApi(
                        "ResolveVanityURL succeeded without a steamid".to_string(),
                    )
                })
            }
        }
    }

    async fn persona_name(&self, steamid: &str) -> AppResult<Option<String>> {
        let response: PlayerSummariesResponse = self
            .get(
                "/ISteamUser/GetPlayerSummaries/v2/",
                &[("steamids", steamid)],
            )
            .await?;

        Ok(response
            .players
            .into_iter()
            .next()
            .and_then(|player| player.personaname))
    }

    async fn owned_games(&self, steamid: &str) -> AppResult<Vec<SteamOwnedGame>> {
        let response: OwnedGamesResponse = self
            .get(
                "/IPlayerService/GetOwnedGames/v1/",
                &[
                    ("steamid", steamid),
                    ("include_appinfo", "true"),
                    ("include_played_free_games", "true"),
                ],
            )
            .await?;

        tracing::info!(
            steamid = %steamid,
            games = response.games.len(),
            "Owned games fetched"
        );

        Ok(response.games)
    }

    async fn recent_games(&self, steamid: &str) -> AppResult<Vec<SteamRecentGame>> {
        let response: RecentGamesResponse = self
            .get("/IPlayerService/GetRecentlyPlayedGames/v1/", &[("steamid", steamid)])
            .await?;

        tracing::info!(
            steamid = %steamid,
            games = response.games.len(),
            "Recently played games fetched"
        );

        Ok(response.games)
    }
}

/// Parses a Steam community profile URL into a [`ProfileRef`]
///
/// Accepts `https://steamcommunity.com/id/<vanity>/` and
/// `https://steamcommunity.com/profiles/<steamid64>/` forms, with or without
/// the trailing slash. A `profiles/` id must be numeric.
pub fn parse_profile_url(profile_url: &str) -> AppResult<ProfileRef> {
    if !profile_url.contains('/') {
        return Err(AppError::MalformedInput(format!(
            "Invalid profile URL {:?}",
            profile_url
        )));
    }

    let mut segments: Vec<&str> = profile_url.split('/').collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }

    let Some(&last) = segments.last() else {
        return Err(AppError::MalformedInput(format!(
            "Invalid profile URL {:?}",
            profile_url
        )));
    };

    if segments.contains(&"id") {
        if last.is_empty() || last == "id" {
            return Err(AppError::MalformedInput(format!(
                "Profile URL {:?} has no vanity name",
                profile_url
            )));
        }
        Ok(ProfileRef::Vanity(last.to_string()))
    } else if segments.contains(&"profiles") {
        if last.is_empty() || last.parse::<u64>().is_err() {
            return Err(AppError::MalformedInput(format!(
                "Profile URL {:?} has no numeric SteamID",
                profile_url
            )));
        }
        Ok(ProfileRef::SteamId(last.to_string()))
    } else {
        Err(AppError::MalformedInput(format!(
            "Profile URL {:?} is neither an id/ nor a profiles/ link",
            profile_url
        )))
    }
}
