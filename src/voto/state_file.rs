use crate::voto::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which the rating state is persisted. The store file is named
/// after it.
pub const STORAGE_KEY: &str = "voto-ratings";

// ********* Stored data structures ***********
//
// The on-disk shape, kept separate from the in-memory model so the file
// format can evolve independently. Version 1 is the current shape.

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredEnvelope {
    version: u32,
    state: JSValue,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredState {
    #[serde(rename = "userRatings")]
    user_ratings: BTreeMap<String, BTreeMap<String, StoredRating>>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredRating {
    value: StoredValue,
    #[serde(rename = "isFavorite")]
    is_favorite: bool,
    #[serde(rename = "ratedAt", skip_serializing_if = "Option::is_none")]
    rated_at: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Number(f64),
    Sentinel(String),
}

fn to_stored(state: &RatingsState) -> StoredState {
    let mut user_ratings: BTreeMap<String, BTreeMap<String, StoredRating>> = BTreeMap::new();
    for (election, ratings) in state.user_ratings.iter() {
        let mut stored: BTreeMap<String, StoredRating> = BTreeMap::new();
        for (thesis, rating) in ratings.iter() {
            let value = match rating.value {
                RatingValue::Unrated => StoredValue::Sentinel("unrated".to_string()),
                RatingValue::Skipped => StoredValue::Sentinel("skipped".to_string()),
                RatingValue::Agreement(x) => StoredValue::Number(x),
            };
            stored.insert(
                thesis.0.to_string(),
                StoredRating {
                    value,
                    is_favorite: rating.is_favorite,
                    rated_at: rating.rated_at,
                },
            );
        }
        user_ratings.insert(election.0.to_string(), stored);
    }
    StoredState { user_ratings }
}

fn parse_key(key: &str) -> Result<u32, RepositoryErrors> {
    key.parse::<u32>()
        .map_err(|_| RepositoryErrors::Unavailable(format!("malformed identifier key {:?}", key)))
}

fn from_stored(stored: StoredState) -> Result<RatingsState, RepositoryErrors> {
    let mut state = RatingsState::default();
    for (election_key, theses) in stored.user_ratings.iter() {
        let election = ElectionId(parse_key(election_key)?);
        let mut ratings = Ratings::new();
        for (thesis_key, r) in theses.iter() {
            let value = match &r.value {
                StoredValue::Sentinel(s) if s == "unrated" => RatingValue::Unrated,
                StoredValue::Sentinel(s) if s == "skipped" => RatingValue::Skipped,
                StoredValue::Sentinel(s) => {
                    return Err(RepositoryErrors::Unavailable(format!(
                        "unknown rating sentinel {:?}",
                        s
                    )))
                }
                // Numbers outside the normalized range are clamped, not
                // rejected.
                StoredValue::Number(x) => RatingValue::Agreement(x.clamp(0.0, 1.0)),
            };
            ratings.insert(
                ThesisId(parse_key(thesis_key)?),
                Rating {
                    value,
                    is_favorite: r.is_favorite,
                    rated_at: r.rated_at,
                },
            );
        }
        state.user_ratings.insert(election, ratings);
    }
    Ok(state)
}

/// Keeps the rating state in a single pretty-printed JSON file under the
/// data directory, named after [`STORAGE_KEY`].
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: &Path) -> FileStore {
        FileStore {
            path: data_dir.join(format!("{}.json", STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RatingsRepository for FileStore {
    fn load(&self) -> Result<RatingsState, RepositoryErrors> {
        if !self.path.exists() {
            debug!("no rating store at {:?}, starting empty", self.path);
            return Ok(RatingsState::default());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| RepositoryErrors::Unavailable(format!("cannot read {:?}: {}", self.path, e)))?;
        let envelope: StoredEnvelope = serde_json::from_str(contents.as_str())
            .map_err(|e| RepositoryErrors::Unavailable(format!("cannot parse {:?}: {}", self.path, e)))?;
        let state = match migrations::run_pending(envelope.version, envelope.state) {
            Some(x) => x,
            None => {
                return Err(RepositoryErrors::Unavailable(format!(
                    "version {} is newer than the supported version {}",
                    envelope.version,
                    migrations::CURRENT_VERSION
                )))
            }
        };
        let stored: StoredState = serde_json::from_value(state).map_err(|e| {
            RepositoryErrors::Unavailable(format!("malformed state in {:?}: {}", self.path, e))
        })?;
        from_stored(stored)
    }

    fn save(&self, state: &RatingsState) -> Result<(), RepositoryErrors> {
        let stored = serde_json::to_value(to_stored(state)).map_err(|e| {
            RepositoryErrors::Unavailable(format!("cannot serialize ratings: {}", e))
        })?;
        let envelope = StoredEnvelope {
            version: migrations::CURRENT_VERSION,
            state: stored,
        };
        let contents = serde_json::to_string_pretty(&envelope).map_err(|e| {
            RepositoryErrors::Unavailable(format!("cannot serialize ratings: {}", e))
        })?;
        fs::write(&self.path, contents)
            .map_err(|e| RepositoryErrors::Unavailable(format!("cannot write {:?}: {}", self.path, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("voto-store-test-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn rating(value: RatingValue, is_favorite: bool, rated_at: Option<f64>) -> Rating {
        Rating {
            value,
            is_favorite,
            rated_at,
        }
    }

    #[test]
    fn save_load_round_trip() {
        let dir = test_dir("round-trip");
        let store = FileStore::new(&dir);

        let mut state = RatingsState::default();
        let ratings = state.user_ratings.entry(ElectionId(1)).or_default();
        ratings.insert(
            ThesisId(10),
            rating(RatingValue::Agreement(0.75), true, Some(1726000000123.0)),
        );
        ratings.insert(ThesisId(11), rating(RatingValue::Skipped, false, Some(2.0)));
        ratings.insert(ThesisId(12), rating(RatingValue::Unrated, true, None));
        state
            .user_ratings
            .entry(ElectionId(2))
            .or_default()
            .insert(ThesisId(1), rating(RatingValue::Agreement(0.0), false, Some(3.0)));

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = test_dir("missing");
        let store = FileStore::new(&dir);
        assert_eq!(store.load().unwrap(), RatingsState::default());
    }

    #[test]
    fn file_named_after_storage_key() {
        let dir = test_dir("name");
        let store = FileStore::new(&dir);
        assert!(store.path().ends_with("voto-ratings.json"));
    }

    #[test]
    fn loads_version_zero_file() {
        let dir = test_dir("v0");
        let store = FileStore::new(&dir);
        let envelope = json!({
            "version": 0,
            "state": {
                "userRatings": {
                    "1": {
                        "10": {"rating": 50, "favorite": true, "timestamp": 123},
                        "11": {"rating": -1, "favorite": false}
                    },
                    "02": {"010": {"rating": 100, "favorite": false}}
                }
            }
        });
        fs::write(store.path(), envelope.to_string()).unwrap();

        let state = store.load().unwrap();
        let ratings = &state.user_ratings[&ElectionId(1)];
        assert_eq!(
            ratings[&ThesisId(10)],
            rating(RatingValue::Agreement(0.5), true, Some(123.0))
        );
        assert_eq!(ratings[&ThesisId(11)], rating(RatingValue::Skipped, false, None));
        // Zero-padded keys from the old shape come out numeric.
        let ratings = &state.user_ratings[&ElectionId(2)];
        assert_eq!(
            ratings[&ThesisId(10)],
            rating(RatingValue::Agreement(1.0), false, None)
        );
    }

    #[test]
    fn garbage_file_is_unavailable() {
        let dir = test_dir("garbage");
        let store = FileStore::new(&dir);
        fs::write(store.path(), "boo]").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn future_version_is_unavailable() {
        let dir = test_dir("future");
        let store = FileStore::new(&dir);
        let envelope = json!({"version": 2, "state": {"userRatings": {}}});
        fs::write(store.path(), envelope.to_string()).unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("newer than the supported version"));
    }

    #[test]
    fn unknown_sentinel_rejected() {
        let dir = test_dir("sentinel");
        let store = FileStore::new(&dir);
        let envelope = json!({
            "version": 1,
            "state": {"userRatings": {"1": {"10": {"value": "maybe", "isFavorite": false}}}}
        });
        fs::write(store.path(), envelope.to_string()).unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("unknown rating sentinel"));
    }

    #[test]
    fn malformed_key_is_unavailable() {
        let dir = test_dir("bad-key");
        let store = FileStore::new(&dir);
        let envelope = json!({
            "version": 1,
            "state": {"userRatings": {"abc": {}}}
        });
        fs::write(store.path(), envelope.to_string()).unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("malformed identifier key"));
    }

    #[test]
    fn out_of_range_numbers_clamp() {
        let dir = test_dir("clamp");
        let store = FileStore::new(&dir);
        let envelope = json!({
            "version": 1,
            "state": {"userRatings": {"1": {
                "10": {"value": 1.5, "isFavorite": false},
                "11": {"value": -0.5, "isFavorite": false}
            }}}
        });
        fs::write(store.path(), envelope.to_string()).unwrap();
        let state = store.load().unwrap();
        let ratings = &state.user_ratings[&ElectionId(1)];
        assert_eq!(ratings[&ThesisId(10)].value, RatingValue::Agreement(1.0));
        assert_eq!(ratings[&ThesisId(11)].value, RatingValue::Agreement(0.0));
    }

    #[test]
    fn unstamped_ratings_serialize_without_a_timestamp() {
        let dir = test_dir("no-stamp");
        let store = FileStore::new(&dir);
        let mut state = RatingsState::default();
        state
            .user_ratings
            .entry(ElectionId(1))
            .or_default()
            .insert(ThesisId(10), rating(RatingValue::Unrated, true, None));
        store.save(&state).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(!contents.contains("ratedAt"));
        assert_eq!(store.load().unwrap(), state);
    }
}
