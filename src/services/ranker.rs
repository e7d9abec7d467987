use std::collections::HashSet;

use crate::catalog::{cosine, Catalog, SparseVec};
use crate::error::AppResult;
use crate::models::{placeholder_name, Recommendation};

/// Ranks the whole catalog against a profile vector
///
/// Scores every catalog row by full cosine similarity (the profile arrives
/// unit-length, but catalog rows are not assumed normalized), partially
/// selects the top `k + |owned|` indices, fully sorts only that subset, then
/// walks it skipping owned games until `k` recommendations are collected.
/// Over-selecting by the owned count guarantees the subset still holds the
/// true top-k non-owned games even if every owned game ranks above them.
///
/// The result can be shorter than `k` only when fewer eligible games exist.
/// No randomness is involved: identical inputs rank identically.
pub fn rank(
    profile: &SparseVec,
    catalog: &Catalog,
    owned: &HashSet<String>,
    k: usize,
) -> AppResult<Vec<Recommendation>> {
    if k == 0 {
        return Ok(Vec::new());
    }

    let n = catalog.len();
    let scores: Vec<f64> = (0..n)
        .map(|i| {
            catalog
                .vector_at(i)
                .map(|row| cosine(profile.as_slice(), row))
                .unwrap_or(0.0)
        })
        .collect();

    // Partial selection: everything before position `take` compares >= the
    // rest under the descending comparator; only this prefix gets sorted.
    let take = (k + owned.len()).min(n);
    let mut order: Vec<usize> = (0..n).collect();
    let descending = |&a: &usize, &b: &usize| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    };
    if take < n {
        order.select_nth_unstable_by(take - 1, descending);
        order.truncate(take);
    }
    order.sort_by(descending);

    let mut recommendations = Vec::with_capacity(k);
    let mut seen: HashSet<&str> = HashSet::with_capacity(take);
    for index in order {
        if recommendations.len() >= k {
            break;
        }
        // A ranker-produced index must resolve; failure here is an
        // internal-consistency fault and aborts the request.
        let appid = catalog.id_of(index)?;
        if owned.contains(appid) || !seen.insert(appid) {
            continue;
        }
        let name = catalog
            .name_of(appid)
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_name(appid));
        recommendations.push(Recommendation {
            appid: appid.to_string(),
            name,
            score: scores[index],
        });
    }

    tracing::info!(
        requested = k,
        returned = recommendations.len(),
        owned = owned.len(),
        catalog = n,
        "Ranked personalized recommendations"
    );

    Ok(recommendations)
}
