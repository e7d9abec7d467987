use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::catalog::sparse::{CsrMatrix, SparseSlice};
use crate::error::{AppError, AppResult};

/// Artifact file names, versioned together by the vectorization pipeline
const VECTORS_FILE: &str = "game_vectors.json";
const APPID_TO_INDEX_FILE: &str = "appid_to_index.json";
const INDEX_TO_APPID_FILE: &str = "index_to_appid.json";
const NAME_INDEX_FILE: &str = "name_index.json";
const RECORDS_FILE: &str = "games_detailed.ndjson";

/// Read-only catalog of games with precomputed feature vectors
///
/// Loaded once at startup and shared by reference into every request-scoped
/// computation; all accessors take `&self`, so concurrent reads are safe.
pub struct Catalog {
    matrix: CsrMatrix,
    appid_to_index: HashMap<String, usize>,
    index_to_appid: Vec<String>,
    names: HashMap<String, String>,
    records_path: PathBuf,
}

impl Catalog {
    /// Loads the catalog artifacts from `data_dir`
    ///
    /// The matrix and the two lookup tables must describe the same item
    /// ordering; any disagreement in size or a broken index↔appid bijection
    /// is rejected as MalformedInput rather than silently misaligning lookups.
    pub fn load(data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let data_dir = data_dir.as_ref();

        let matrix: CsrMatrix = read_json(&data_dir.join(VECTORS_FILE))?;
        matrix.validate()?;
        if matrix.rows == 0 {
            return Err(AppError::MalformedInput(
                "Catalog matrix has no rows".to_string(),
            ));
        }

        let appid_to_index: HashMap<String, usize> = read_json(&data_dir.join(APPID_TO_INDEX_FILE))?;
        let raw_index_to_appid: HashMap<String, String> =
            read_json(&data_dir.join(INDEX_TO_APPID_FILE))?;
        let names: HashMap<String, String> = read_json(&data_dir.join(NAME_INDEX_FILE))?;

        if appid_to_index.len() != matrix.rows || raw_index_to_appid.len() != matrix.rows {
            return Err(AppError::MalformedInput(format!(
                "Lookup tables ({} / {} entries) do not match {} matrix rows",
                appid_to_index.len(),
                raw_index_to_appid.len(),
                matrix.rows
            )));
        }

        // The index table is keyed by stringified positions; materialize it as
        // a dense Vec and cross-check the bijection against appid_to_index.
        let mut index_to_appid = vec![String::new(); matrix.rows];
        for (key, appid) in raw_index_to_appid {
            let index: usize = key.parse().map_err(|_| {
                AppError::MalformedInput(format!("Non-numeric index key {:?}", key))
            })?;
            if index >= matrix.rows {
                return Err(AppError::MalformedInput(format!(
                    "Index {} out of range for {} rows",
                    index, matrix.rows
                )));
            }
            index_to_appid[index] = appid;
        }
        for (index, appid) in index_to_appid.iter().enumerate() {
            if appid_to_index.get(appid) != Some(&index) {
                return Err(AppError::MalformedInput(format!(
                    "Lookup tables disagree on appid {:?} at index {}",
                    appid, index
                )));
            }
        }

        let records_path = data_dir.join(RECORDS_FILE);
        if !records_path.is_file() {
            return Err(AppError::MalformedInput(format!(
                "Missing catalog records file {}",
                records_path.display()
            )));
        }

        tracing::info!(
            games = matrix.rows,
            features = matrix.cols,
            names = names.len(),
            data_dir = %data_dir.display(),
            "Catalog loaded"
        );

        Ok(Self {
            matrix,
            appid_to_index,
            index_to_appid,
            names,
            records_path,
        })
    }

    /// Assembles a catalog directly from its parts, bypassing artifact I/O
    #[cfg(test)]
    pub(crate) fn from_parts(
        matrix: CsrMatrix,
        appid_to_index: HashMap<String, usize>,
        index_to_appid: Vec<String>,
        names: HashMap<String, String>,
        records_path: PathBuf,
    ) -> Self {
        Self {
            matrix,
            appid_to_index,
            index_to_appid,
            names,
            records_path,
        }
    }

    /// Number of games in the catalog
    pub fn len(&self) -> usize {
        self.matrix.rows
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.rows == 0
    }

    /// Feature-space dimensionality
    pub fn dim(&self) -> usize {
        self.matrix.cols
    }

    /// Feature vector for an appid; `None` when the id is not in the catalog
    pub fn vector_of(&self, appid: &str) -> Option<SparseSlice<'_>> {
        let &index = self.appid_to_index.get(appid)?;
        self.matrix.row(index)
    }

    /// Feature vector by dense row index
    pub fn vector_at(&self, index: usize) -> Option<SparseSlice<'_>> {
        self.matrix.row(index)
    }

    /// Resolves a dense row index back to its appid
    pub fn id_of(&self, index: usize) -> AppResult<&str> {
        self.index_to_appid
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| AppError::NotFound(format!("No appid at catalog index {}", index)))
    }

    /// Display name for an appid; `None` when absent from the name table
    pub fn name_of(&self, appid: &str) -> Option<&str> {
        self.names.get(appid).map(String::as_str)
    }

    /// Path of the NDJSON record file backing the Discovery Sampler
    pub fn records_path(&self) -> &Path {
        &self.records_path
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let file = File::open(path).map_err(|e| {
        AppError::MalformedInput(format!("Cannot open artifact {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
