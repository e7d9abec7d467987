use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{Playtime, SteamOwnedGame, SteamRecentGame};

/// Merges the owned-games list with the recently-played list
///
/// Owned games seed the map with `recent = 0`; every recently-played entry
/// then overwrites both durations, since the two-week report reflects a
/// tighter window and is authoritative on conflict. A game that only appears
/// in the recent list (should not happen upstream) is still included.
///
/// Negative or non-finite durations are rejected before any weighting runs.
pub fn aggregate_playtime(
    owned: &[SteamOwnedGame],
    recent: &[SteamRecentGame],
) -> AppResult<HashMap<String, Playtime>> {
    let mut usage: HashMap<String, Playtime> = HashMap::with_capacity(owned.len());

    for game in owned {
        validate_duration(game.appid, game.playtime_forever)?;
        usage.insert(
            game.appid.to_string(),
            Playtime {
                forever: game.playtime_forever,
                recent: 0.0,
            },
        );
    }

    for game in recent {
        validate_duration(game.appid, game.playtime_forever)?;
        validate_duration(game.appid, game.playtime_2weeks)?;
        usage.insert(
            game.appid.to_string(),
            Playtime {
                forever: game.playtime_forever,
                recent: game.playtime_2weeks,
            },
        );
    }

    Ok(usage)
}

fn validate_duration(appid: u64, minutes: f64) -> AppResult<()> {
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(AppError::MalformedInput(format!(
            "Invalid playtime {} for appid {}",
            minutes, appid
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(appid: u64, forever: f64) -> SteamOwnedGame {
        SteamOwnedGame {
            appid,
            name: None,
            playtime_forever: forever,
        }
    }

    fn recent(appid: u64, forever: f64, two_weeks: f64) -> SteamRecentGame {
        SteamRecentGame {
            appid,
            name: None,
            playtime_forever: forever,
            playtime_2weeks: two_weeks,
        }
    }

    #[test]
    fn test_owned_only_defaults_recent_to_zero() {
        let usage = aggregate_playtime(&[owned(570, 120.0)], &[]).unwrap();
        assert_eq!(
            usage["570"],
            Playtime {
                forever: 120.0,
                recent: 0.0
            }
        );
    }

    #[test]
    fn test_recent_record_wins_on_conflict() {
        // Steam's recent report can show more lifetime minutes than the owned
        // snapshot; the recent record is authoritative for both fields.
        let usage =
            aggregate_playtime(&[owned(570, 120.0)], &[recent(570, 150.0, 30.0)]).unwrap();
        assert_eq!(
            usage["570"],
            Playtime {
                forever: 150.0,
                recent: 30.0
            }
        );
    }

    #[test]
    fn test_recent_only_game_is_kept() {
        let usage = aggregate_playtime(&[], &[recent(440, 10.0, 10.0)]).unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage["440"].recent, 10.0);
    }

    #[test]
    fn test_empty_inputs_yield_empty_map() {
        let usage = aggregate_playtime(&[], &[]).unwrap();
        assert!(usage.is_empty());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let result = aggregate_playtime(&[owned(570, -5.0)], &[]);
        assert!(matches!(result, Err(AppError::MalformedInput(_))));
    }

    #[test]
    fn test_non_finite_duration_rejected() {
        let result = aggregate_playtime(&[], &[recent(570, f64::NAN, 0.0)]);
        assert!(matches!(result, Err(AppError::MalformedInput(_))));
    }
}
