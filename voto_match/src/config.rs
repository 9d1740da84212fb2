// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// Identifier of an election, as assigned by the election staff.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct ElectionId(pub u32);

/// Identifier of a thesis (a policy statement voters rate).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct ThesisId(pub u32);

/// All the possible states for an opinion recorded on a thesis.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum RatingValue {
    /// No opinion was ever recorded. This is the initial state.
    Unrated,
    /// The user explicitly declined to rate. This is a terminal user
    /// action, distinct from never having voted.
    Skipped,
    /// A normalized agreement in the closed interval [0, 1]:
    /// 0 is full disagreement, 1 is full agreement.
    Agreement(f64),
}

impl RatingValue {
    /// The numeric agreement, if one was recorded.
    pub fn as_agreement(&self) -> Option<f64> {
        match self {
            RatingValue::Agreement(x) => Some(*x),
            _ => None,
        }
    }
}

/// A user's recorded opinion for a single thesis.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Rating {
    pub value: RatingValue,
    /// The user marked this thesis as weighted. Independent of `value` in
    /// the data model; callers enforce that favoriting implies an opinion.
    pub is_favorite: bool,
    /// Epoch milliseconds of the last write to `value`. Untouched when
    /// only `is_favorite` changes.
    pub rated_at: Option<f64>,
}

impl Rating {
    /// The state of a thesis that was never written. Absent map keys read
    /// as this value.
    pub const UNRATED: Rating = Rating {
        value: RatingValue::Unrated,
        is_favorite: false,
        rated_at: None,
    };
}

/// All the ratings recorded for one election, keyed by thesis.
pub type Ratings = BTreeMap<ThesisId, Rating>;

/// The full per-election rating state. This is the unit of persistence.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RatingsState {
    pub user_ratings: BTreeMap<ElectionId, Ratings>,
}

/// A party or candidate together with its published answers.
#[derive(PartialEq, Debug, Clone)]
pub struct Participant {
    pub name: String,
    pub answers: Ratings,
}

// ******** Output data structures *********

/// The match outcome for a single participant.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParticipantMatch {
    pub name: String,
    /// 0 to 100. None when no thesis was comparable.
    pub match_percentage: Option<u8>,
    /// Number of theses that entered the computation.
    pub compared_theses: u32,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MatchReport {
    /// Best match first. Participants without a percentage sort last.
    pub matches: Vec<ParticipantMatch>,
}

/// Errors that prevent the match computation from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MatchingErrors {
    /// The configured scale size is outside the supported 2..=5 range.
    InvalidScaleSize(u32),
}

impl Error for MatchingErrors {}

impl Display for MatchingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingErrors::InvalidScaleSize(n) => {
                write!(f, "invalid scale size: {} (supported: 2 to 5)", n)
            }
        }
    }
}

/// Errors surfaced by rating persistence backends.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RepositoryErrors {
    /// The backend could not serve the request. The message carries the
    /// backend-specific cause.
    Unavailable(String),
}

impl Error for RepositoryErrors {}

impl Display for RepositoryErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryErrors::Unavailable(msg) => {
                write!(f, "ratings storage unavailable: {}", msg)
            }
        }
    }
}

// ********* Configuration **********

/// Smallest scale size an election may configure. A single-point scale
/// carries no information and is rejected.
pub const MIN_DECISIONS: u32 = 2;
/// Largest scale size an election may configure.
pub const MAX_DECISIONS: u32 = 5;

/// The matching rules configured for one election.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MatchRules {
    /// Number of points on the discrete agreement scale, in 2..=5.
    pub decisions: u32,
    /// Maximum number of theses a user may mark as favorite, if capped.
    pub weighted_votes_limit: Option<u32>,
}

impl MatchRules {
    pub const DEFAULT_RULES: MatchRules = MatchRules {
        decisions: 5,
        weighted_votes_limit: None,
    };
}
