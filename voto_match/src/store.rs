//! The rating store: per-election, per-thesis ratings held in memory,
//! written through to an injected persistence backend.

use log::{debug, warn};
use std::cell::RefCell;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{ElectionId, Rating, RatingValue, Ratings, RatingsState, RepositoryErrors, ThesisId};

/// Where rating state is durably kept between sessions.
///
/// `load` returns fully migrated state: a backend with versioned storage
/// runs its migration chain before handing the state out. Backends signal
/// failure through [`RepositoryErrors`]; the store treats every failure as
/// non-fatal.
pub trait RatingsRepository {
    fn load(&self) -> Result<RatingsState, RepositoryErrors>;
    fn save(&self, state: &RatingsState) -> Result<(), RepositoryErrors>;
}

/// A repository keeping state in memory only. Useful for tests and
/// documentation examples.
///
/// Uses `RefCell` since the whole model is single-threaded.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RefCell<RatingsState>,
}

impl RatingsRepository for MemoryRepository {
    fn load(&self) -> Result<RatingsState, RepositoryErrors> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &RatingsState) -> Result<(), RepositoryErrors> {
        *self.state.borrow_mut() = state.clone();
        Ok(())
    }
}

fn system_now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Holds the current user's ratings for every election.
///
/// All mutations run synchronously and write the whole state through to
/// the repository. A failing write is logged and swallowed: the in-memory
/// state stays authoritative for the session.
pub struct RatingStore<R: RatingsRepository> {
    state: RatingsState,
    repository: R,
    clock: fn() -> f64,
}

impl<R: RatingsRepository> RatingStore<R> {
    /// Opens the store over the given repository, loading persisted state.
    ///
    /// A load failure is not fatal: the store starts empty and keeps
    /// working in memory.
    pub fn open(repository: R) -> RatingStore<R> {
        RatingStore::with_clock(repository, system_now_ms)
    }

    /// Opens the store with an explicit clock returning epoch
    /// milliseconds. Tests inject a deterministic clock here.
    pub fn with_clock(repository: R, clock: fn() -> f64) -> RatingStore<R> {
        let state = match repository.load() {
            Ok(state) => state,
            Err(e) => {
                warn!("could not load persisted ratings, starting empty: {}", e);
                RatingsState::default()
            }
        };
        RatingStore {
            state,
            repository,
            clock,
        }
    }

    /// Records the value of an opinion and stamps it with the current
    /// time. Creates the entry if the thesis was never written.
    pub fn set_rating_value(&mut self, election: ElectionId, thesis: ThesisId, value: RatingValue) {
        let now = (self.clock)();
        let ratings = self.state.user_ratings.entry(election).or_default();
        let rating = ratings.entry(thesis).or_insert(Rating::UNRATED);
        rating.value = value;
        rating.rated_at = Some(now);
        debug!("rating set: election {:?} thesis {:?} -> {:?}", election, thesis, value);
        self.persist();
    }

    /// Flips the favorite flag of an opinion. Does not touch the value or
    /// its timestamp. Creates an unrated entry if the thesis was never
    /// written.
    pub fn set_rating_favorite(&mut self, election: ElectionId, thesis: ThesisId, is_favorite: bool) {
        let ratings = self.state.user_ratings.entry(election).or_default();
        let rating = ratings.entry(thesis).or_insert(Rating::UNRATED);
        rating.is_favorite = is_favorite;
        debug!(
            "favorite set: election {:?} thesis {:?} -> {}",
            election, thesis, is_favorite
        );
        self.persist();
    }

    /// The opinion recorded for a thesis. Absent entries read as
    /// [`Rating::UNRATED`]; reading never creates entries.
    pub fn rating(&self, election: ElectionId, thesis: ThesisId) -> Rating {
        self.state
            .user_ratings
            .get(&election)
            .and_then(|ratings| ratings.get(&thesis))
            .copied()
            .unwrap_or(Rating::UNRATED)
    }

    /// All the opinions recorded for one election.
    pub fn ratings(&self, election: ElectionId) -> Ratings {
        self.state
            .user_ratings
            .get(&election)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of theses currently favorited in one election.
    pub fn favorite_count(&self, election: ElectionId) -> u32 {
        self.state
            .user_ratings
            .get(&election)
            .map(|ratings| ratings.values().filter(|r| r.is_favorite).count() as u32)
            .unwrap_or(0)
    }

    pub fn state(&self) -> &RatingsState {
        &self.state
    }

    /// Drops every recorded rating for every election.
    pub fn reset(&mut self) {
        self.state = RatingsState::default();
        debug!("store reset");
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save(&self.state) {
            warn!("could not persist ratings, keeping the in-memory state: {}", e);
        }
    }
}
