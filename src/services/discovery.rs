use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::{AppError, AppResult};
use crate::models::{placeholder_name, DiscoveryItem};

/// Inner payload of one NDJSON catalog record
#[derive(Debug, Deserialize)]
struct GameRecord {
    #[serde(default)]
    name: Option<String>,
}

/// Samples `n` unplayed games from a power-law rank distribution
///
/// Rank position `r` (1-based over the catalog's stored ordering) is drawn
/// with probability proportional to `r^-power`: low positions dominate, and
/// `power` controls how strongly (0 flattens toward uniform, 1 approaches a
/// Zipf skew). The draw ignores the user profile entirely, so it works for
/// users with no usage history.
///
/// Drawn indices are visited in one pass over the catalog's NDJSON records.
/// A draw landing on an owned game is satisfied by the next non-owned record
/// in the stream instead, so the result is short only when the stream runs
/// out. The result is shuffled before return; its order carries no rank
/// information.
pub fn sample_discovery<R: Rng>(
    catalog: &Catalog,
    owned: &HashSet<String>,
    n: usize,
    power: f64,
    rng: &mut R,
) -> AppResult<Vec<DiscoveryItem>> {
    let total = catalog.len();
    let target = n.min(total);
    if target == 0 {
        return Ok(Vec::new());
    }

    let picks = draw_distinct_indices(total, target, power, rng)?;

    let file = File::open(catalog.records_path())?;
    let mut items = Vec::with_capacity(target);
    let mut cursor = 0usize;
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        if cursor >= picks.len() {
            break;
        }
        let line = line?;
        if line_no < picks[cursor] {
            continue;
        }

        // One bad record skips one line, never the whole request.
        let record: HashMap<String, GameRecord> = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed catalog record");
                continue;
            }
        };
        let Some((appid, game)) = record.into_iter().next() else {
            continue;
        };
        if owned.contains(&appid) {
            continue;
        }

        let name = game.name.unwrap_or_else(|| placeholder_name(&appid));
        items.push(DiscoveryItem { appid, name });
        cursor += 1;
    }

    if items.len() < target {
        tracing::debug!(
            requested = target,
            returned = items.len(),
            "Catalog records exhausted before filling discovery sample"
        );
    }

    items.shuffle(rng);
    Ok(items)
}

/// Draws `target` distinct indices from the `rank^-power` distribution,
/// returned in ascending order
fn draw_distinct_indices<R: Rng>(
    total: usize,
    target: usize,
    power: f64,
    rng: &mut R,
) -> AppResult<Vec<usize>> {
    if target >= total {
        return Ok((0..total).collect());
    }

    let weights: Vec<f64> = (1..=total).map(|rank| (rank as f64).powf(-power)).collect();
    let mut dist = WeightedIndex::new(&weights)
        .map_err(|e| AppError::Internal(format!("Invalid sampling weights: {}", e)))?;

    let mut picks = BTreeSet::new();
    while picks.len() < target {
        let index = dist.sample(rng);
        // Zero out a drawn index so the remaining draws are without
        // replacement.
        if picks.insert(index) && picks.len() < target {
            dist.update_weights(&[(index, &0.0)])
                .map_err(|e| AppError::Internal(format!("Sampling weight update: {}", e)))?;
        }
    }

    Ok(picks.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CsrMatrix;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Write;
    use std::path::Path;

    const CATALOG_SIZE: usize = 40;

    fn write_records(path: &Path, count: usize) {
        let mut file = std::fs::File::create(path).unwrap();
        for i in 0..count {
            writeln!(file, r#"{{"{}": {{"name": "Game {}"}}}}"#, 1000 + i, i).unwrap();
        }
    }

    /// Catalog over `count` games with trivial one-feature vectors
    fn test_catalog(dir: &Path, count: usize) -> Catalog {
        let records_path = dir.join("games_detailed.ndjson");
        write_records(&records_path, count);

        let matrix = CsrMatrix {
            rows: count,
            cols: 1,
            indptr: (0..=count).collect(),
            indices: vec![0; count],
            data: vec![1.0; count],
        };
        let appids: Vec<String> = (0..count).map(|i| (1000 + i).to_string()).collect();
        Catalog::from_parts(
            matrix,
            appids
                .iter()
                .enumerate()
                .map(|(i, id)| (id.clone(), i))
                .collect(),
            appids,
            HashMap::new(),
            records_path,
        )
    }

    #[test]
    fn test_sample_returns_n_distinct_unowned_items() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path(), CATALOG_SIZE);
        let owned = HashSet::from(["1000".to_string(), "1003".to_string()]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let items = sample_discovery(&catalog, &owned, 10, 0.75, &mut rng).unwrap();

        assert_eq!(items.len(), 10);
        let ids: HashSet<&str> = items.iter().map(|i| i.appid.as_str()).collect();
        assert_eq!(ids.len(), 10);
        assert!(ids.iter().all(|id| !owned.contains(*id)));
    }

    #[test]
    fn test_owned_skip_does_not_shorten_result() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path(), CATALOG_SIZE);
        // Own the entire low-rank region the skew favors most.
        let owned: HashSet<String> = (0..20).map(|i| (1000 + i).to_string()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let items = sample_discovery(&catalog, &owned, 10, 0.75, &mut rng).unwrap();

        // 20 non-owned records remain, so skipping owned draws must still
        // fill all 10 slots from later stream positions.
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|i| !owned.contains(&i.appid)));
    }

    #[test]
    fn test_stream_exhaustion_yields_short_result() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path(), 5);
        let owned: HashSet<String> = (0..3).map(|i| (1000 + i).to_string()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // Only 2 non-owned records exist; a request for 5 ends short.
        let items = sample_discovery(&catalog, &owned, 5, 0.75, &mut rng).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_output_order_is_shuffled() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path(), CATALOG_SIZE);

        // Drawing every index forces identical membership across seeds, so
        // any order difference comes from the shuffle alone.
        let mut rng_a = ChaCha8Rng::seed_from_u64(1);
        let mut rng_b = ChaCha8Rng::seed_from_u64(2);
        let a = sample_discovery(&catalog, &HashSet::new(), CATALOG_SIZE, 0.75, &mut rng_a).unwrap();
        let b = sample_discovery(&catalog, &HashSet::new(), CATALOG_SIZE, 0.75, &mut rng_b).unwrap();

        assert_eq!(a.len(), CATALOG_SIZE);
        assert_eq!(b.len(), CATALOG_SIZE);
        let ids_a: Vec<&str> = a.iter().map(|i| i.appid.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|i| i.appid.as_str()).collect();
        assert_ne!(ids_a, ids_b);

        // And neither matches the ascending stream order.
        let stream_order: Vec<String> = (0..CATALOG_SIZE).map(|i| (1000 + i).to_string()).collect();
        assert_ne!(ids_a, stream_order.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_low_ranks_are_favored() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path(), CATALOG_SIZE);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        // With a strong skew, repeated small draws should hit the front half
        // of the catalog far more often than the back half.
        let mut front = 0usize;
        let mut back = 0usize;
        for _ in 0..50 {
            let items = sample_discovery(&catalog, &HashSet::new(), 4, 1.0, &mut rng).unwrap();
            for item in items {
                let index: usize = item.appid.parse::<usize>().unwrap() - 1000;
                if index < CATALOG_SIZE / 2 {
                    front += 1;
                } else {
                    back += 1;
                }
            }
        }
        assert!(front > back);
    }

    #[test]
    fn test_draw_distinct_indices_are_sorted_and_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let picks = draw_distinct_indices(100, 15, 0.75, &mut rng).unwrap();

        assert_eq!(picks.len(), 15);
        assert!(picks.windows(2).all(|w| w[0] < w[1]));
        assert!(picks.iter().all(|&i| i < 100));
    }

    #[test]
    fn test_draw_covers_whole_range_when_target_equals_total() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let picks = draw_distinct_indices(8, 8, 0.75, &mut rng).unwrap();
        assert_eq!(picks, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = test_catalog(dir.path(), 6);
        // Corrupt line 2 of the records file.
        let records_path = dir.path().join("games_detailed.ndjson");
        let mut lines: Vec<String> = std::fs::read_to_string(&records_path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        lines[2] = "not json".to_string();
        std::fs::write(&records_path, lines.join("\n") + "\n").unwrap();

        // Requesting the full catalog makes every line a drawn index: the
        // corrupted record is skipped, the other five all come back.
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let items = sample_discovery(&catalog, &HashSet::new(), 6, 0.75, &mut rng).unwrap();

        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.appid != "1002"));
    }
}
