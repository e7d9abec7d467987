use std::collections::HashMap;

use crate::catalog::{Catalog, SparseVec};
use crate::models::Playtime;

/// Playtime weight for one game
///
/// `ln(1 + forever)` gives diminishing returns on raw minutes and a weight of
/// exactly 0 for never-played games. Recent activity amplifies the weight by
/// its share of lifetime playtime. Well-formed input cannot have recent > 0
/// with forever == 0; if it does, forever is treated as equal to recent so
/// the amplification stays defined.
pub fn playtime_weight(playtime: Playtime) -> f64 {
    let forever = if playtime.forever == 0.0 && playtime.recent > 0.0 {
        playtime.recent
    } else {
        playtime.forever
    };

    let mut w = forever.ln_1p();
    if playtime.recent > 0.0 {
        w *= 1.0 + playtime.recent / forever;
    }
    w
}

/// Builds the user's profile vector in catalog feature space
///
/// Accumulates the weighted sum of the feature vectors of every usage entry
/// with a catalog match; entries without a catalog vector contribute nothing.
/// Returns `None` when no entry contributed or the accumulated weight is zero,
/// which the caller reports as insufficient data.
///
/// The result is normalized to unit L2 length over its explicit nonzero
/// values, so downstream scoring can compare profiles by cosine alone.
pub fn build_profile(usage: &HashMap<String, Playtime>, catalog: &Catalog) -> Option<SparseVec> {
    let mut acc = vec![0.0; catalog.dim()];
    let mut total_weight = 0.0;
    let mut matched = 0usize;

    for (appid, &playtime) in usage {
        let Some(row) = catalog.vector_of(appid) else {
            continue;
        };
        matched += 1;

        let w = playtime_weight(playtime);
        for (&j, &v) in row.indices.iter().zip(row.values) {
            acc[j as usize] += w * v;
        }
        total_weight += w;
    }

    if matched == 0 || total_weight == 0.0 {
        tracing::debug!(
            usage_entries = usage.len(),
            matched,
            "No usable playtime for profile vector"
        );
        return None;
    }

    let mut profile = SparseVec::from_dense(&acc);
    let norm = profile.norm();
    if norm == 0.0 {
        return None;
    }
    profile.scale_down(norm);

    tracing::debug!(
        usage_entries = usage.len(),
        matched,
        nonzeros = profile.values.len(),
        "Profile vector built"
    );

    Some(profile)
}
