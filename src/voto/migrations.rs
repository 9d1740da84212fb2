//! Schema migrations for the persisted rating state.

use crate::voto::*;

use serde_json::Map as JSMap;

/// Version written by the current code.
pub const CURRENT_VERSION: u32 = 1;

// Entry i upgrades a state from version i to version i + 1.
const MIGRATIONS: &[fn(JSValue) -> JSValue] = &[migrate_v0_to_v1];

/// Brings a persisted state up to [`CURRENT_VERSION`], applying every
/// pending step in order. `None` when the state was written by a newer
/// version of the program.
pub fn run_pending(version: u32, state: JSValue) -> Option<JSValue> {
    if version > CURRENT_VERSION {
        warn!(
            "state version {} is newer than the supported version {}",
            version, CURRENT_VERSION
        );
        return None;
    }
    let mut state = state;
    for step in MIGRATIONS[version as usize..].iter() {
        state = step(state);
    }
    Some(state)
}

/// Upgrades the unversioned rating state written by early releases.
///
/// The old shape kept percentages: `rating` 0 to 100 with -1 marking a
/// skip, a `favorite` flag and an optional `timestamp`. The migration is
/// total: a payload that does not match that shape in any part yields the
/// empty state, never an error or a partial import.
pub fn migrate_v0_to_v1(old: JSValue) -> JSValue {
    match migrate_v0_state(&old) {
        Some(new) => new,
        None => {
            warn!("persisted ratings did not match the version 0 shape, discarding them");
            json!({ "userRatings": {} })
        }
    }
}

fn migrate_v0_state(old: &JSValue) -> Option<JSValue> {
    let ratings = old.as_object()?.get("userRatings")?.as_object()?;
    let mut new_ratings = JSMap::new();
    for (election_key, theses) in ratings.iter() {
        let theses = theses.as_object()?;
        // An election that exists with no rated theses stays present.
        let mut new_theses = JSMap::new();
        for (thesis_key, record) in theses.iter() {
            new_theses.insert(canonical_key(thesis_key)?, migrate_v0_record(record)?);
        }
        new_ratings.insert(canonical_key(election_key)?, JSValue::Object(new_theses));
    }
    Some(json!({ "userRatings": new_ratings }))
}

fn canonical_key(key: &str) -> Option<String> {
    key.parse::<u32>().ok().map(|n| n.to_string())
}

fn migrate_v0_record(record: &JSValue) -> Option<JSValue> {
    let record = record.as_object()?;
    let value = match record.get("rating") {
        None => json!("unrated"),
        Some(rating) => {
            let rating = rating.as_f64()?;
            if rating == -1.0 {
                json!("skipped")
            } else {
                json!(rating.clamp(0.0, 100.0) / 100.0)
            }
        }
    };
    let is_favorite = record.get("favorite")?.as_bool()?;
    let mut new_record = JSMap::new();
    new_record.insert("value".to_string(), value);
    new_record.insert("isFavorite".to_string(), JSValue::Bool(is_favorite));
    match record.get("timestamp") {
        None => {}
        // The timestamp is copied verbatim, it must survive bit for bit.
        Some(ts) if ts.is_number() => {
            new_record.insert("ratedAt".to_string(), ts.clone());
        }
        Some(_) => return None,
    }
    Some(JSValue::Object(new_record))
}
