use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::error::{AppError, AppResult};
use crate::models::Recommendation;
use crate::services::providers::{PlayerDataProvider, ProfileRef};
use crate::services::{profile, ranker, usage};

/// Result of one personalized recommendation pass
#[derive(Debug)]
pub struct PersonalizedResult {
    pub steamid: String,
    pub persona: Option<String>,
    /// Every appid the user owns, also used to filter the Discovery Sampler
    pub owned_appids: HashSet<String>,
    pub recommendations: Vec<Recommendation>,
}

/// Runs the full personalization pipeline for one user
///
/// Resolves the profile reference, fetches the owned and recently-played
/// lists, aggregates them into playtime records, builds the profile vector,
/// and ranks the catalog against it. A fetch failure on either game list is
/// degraded to an empty list (logged, not propagated), so a flaky collaborator
/// surfaces as `InsufficientData` rather than a raw transport error.
pub async fn recommend_for_user(
    provider: &dyn PlayerDataProvider,
    catalog: &Catalog,
    profile_ref: &ProfileRef,
    k: usize,
) -> AppResult<PersonalizedResult> {
    let steamid = provider.resolve_profile(profile_ref).await?;

    let persona = match provider.persona_name(&steamid).await {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!(steamid = %steamid, error = %e, "Persona lookup failed");
            None
        }
    };

    let owned = match provider.owned_games(&steamid).await {
        Ok(games) => games,
        Err(e) => {
            tracing::warn!(steamid = %steamid, error = %e, "Owned-games fetch failed, treating as empty");
            Vec::new()
        }
    };
    let recent = match provider.recent_games(&steamid).await {
        Ok(games) => games,
        Err(e) => {
            tracing::warn!(steamid = %steamid, error = %e, "Recent-games fetch failed, treating as empty");
            Vec::new()
        }
    };

    let usage = usage::aggregate_playtime(&owned, &recent)?;
    let owned_appids: HashSet<String> = usage.keys().cloned().collect();

    let Some(profile_vector) = profile::build_profile(&usage, catalog) else {
        return Err(AppError::InsufficientData(
            "Not enough playtime or catalog overlap to personalize".to_string(),
        ));
    };

    let recommendations = ranker::rank(&profile_vector, catalog, &owned_appids, k)?;

    Ok(PersonalizedResult {
        steamid,
        persona,
        owned_appids,
        recommendations,
    })
}
