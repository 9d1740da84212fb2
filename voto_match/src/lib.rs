mod config;
pub mod manual;
pub mod quick_start;
mod scale;
mod store;

use log::{debug, info};

pub use crate::config::*;
pub use crate::scale::{normalized_to_scale_value, scale_value_to_normalized};
pub use crate::store::{MemoryRepository, RatingStore, RatingsRepository};

/// Weight applied to theses the user marked as favorite.
pub const FAVORITE_WEIGHT: f64 = 2.0;

/// Runs the match computation for the given participants over the user's
/// ratings.
///
/// Arguments:
/// * `user_ratings` the user's recorded opinions for one election
/// * `participants` the parties and candidates with their published answers
/// * `rules` the matching rules configured for this election
///
/// A thesis counts toward a participant's match only when both sides carry
/// a numeric agreement; theses unrated or skipped on either side are
/// excluded from the computation entirely. Each counted thesis contributes
/// `1 - |user - participant|`, weighted [`FAVORITE_WEIGHT`] when the user
/// favorited it. The percentage is the weighted mean scaled to 0..=100 and
/// rounded half up. A participant with no comparable thesis reports no
/// percentage rather than a misleading zero.
pub fn run_match_stats(
    user_ratings: &Ratings,
    participants: &[Participant],
    rules: &MatchRules,
) -> Result<MatchReport, MatchingErrors> {
    if rules.decisions < MIN_DECISIONS || rules.decisions > MAX_DECISIONS {
        return Err(MatchingErrors::InvalidScaleSize(rules.decisions));
    }
    info!(
        "Processing {:?} rated theses against {:?} participants, rules: {:?}",
        user_ratings.len(),
        participants.len(),
        rules
    );
    let mut matches: Vec<ParticipantMatch> = participants
        .iter()
        .map(|p| participant_match(user_ratings, p))
        .collect();
    // Best match first, participants without a percentage last, ties
    // broken by name.
    matches.sort_by(|a, b| {
        b.match_percentage
            .cmp(&a.match_percentage)
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(MatchReport { matches })
}

fn participant_match(user_ratings: &Ratings, participant: &Participant) -> ParticipantMatch {
    let mut agreement_total: f64 = 0.0;
    let mut weight_total: f64 = 0.0;
    let mut compared: u32 = 0;
    for (thesis, user_rating) in user_ratings.iter() {
        let user_value = match user_rating.value.as_agreement() {
            Some(x) => x,
            None => continue,
        };
        let participant_value = match participant
            .answers
            .get(thesis)
            .and_then(|r| r.value.as_agreement())
        {
            Some(x) => x,
            None => continue,
        };
        let weight = if user_rating.is_favorite {
            FAVORITE_WEIGHT
        } else {
            1.0
        };
        agreement_total += weight * (1.0 - (user_value - participant_value).abs());
        weight_total += weight;
        compared += 1;
    }
    let match_percentage = if weight_total > 0.0 {
        Some((100.0 * agreement_total / weight_total).round() as u8)
    } else {
        None
    };
    debug!(
        "participant_match: {} -> {:?} over {} theses",
        participant.name, match_percentage, compared
    );
    ParticipantMatch {
        name: participant.name.clone(),
        match_percentage,
        compared_theses: compared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(value: f64) -> Rating {
        Rating {
            value: RatingValue::Agreement(value),
            is_favorite: false,
            rated_at: None,
        }
    }

    fn favorite(value: f64) -> Rating {
        Rating {
            is_favorite: true,
            ..rated(value)
        }
    }

    fn ratings(entries: &[(u32, Rating)]) -> Ratings {
        entries.iter().map(|(id, r)| (ThesisId(*id), *r)).collect()
    }

    fn participant(name: &str, entries: &[(u32, Rating)]) -> Participant {
        Participant {
            name: name.to_string(),
            answers: ratings(entries),
        }
    }

    #[test]
    fn identical_answers_match_fully() {
        let _ = env_logger::try_init();
        let user = ratings(&[(10, rated(1.0)), (11, rated(0.0)), (12, rated(0.5))]);
        let participants = vec![participant(
            "Acme Party",
            &[(10, rated(1.0)), (11, rated(0.0)), (12, rated(0.5))],
        )];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.matches[0].match_percentage, Some(100));
        assert_eq!(report.matches[0].compared_theses, 3);
    }

    #[test]
    fn opposite_answers_do_not_match() {
        let user = ratings(&[(10, rated(1.0)), (11, rated(0.0))]);
        let participants = vec![participant("Acme Party", &[(10, rated(0.0)), (11, rated(1.0))])];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.matches[0].match_percentage, Some(0));
    }

    #[test]
    fn halfway_disagreement_scores_fifty() {
        let user = ratings(&[(10, rated(1.0))]);
        let participants = vec![participant("Acme Party", &[(10, rated(0.5))])];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.matches[0].match_percentage, Some(50));
    }

    #[test]
    fn favorites_weigh_double() {
        // Agreement on the favorited thesis, full disagreement on the
        // plain one: (2 * 1 + 1 * 0) / 3 rounds to 67. Unweighted this
        // would be 50.
        let user = ratings(&[(10, favorite(1.0)), (11, rated(1.0))]);
        let participants = vec![participant("Acme Party", &[(10, rated(1.0)), (11, rated(0.0))])];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.matches[0].match_percentage, Some(67));
    }

    #[test]
    fn skipped_and_unrated_excluded_from_both_sides() {
        let user = ratings(&[
            (10, rated(1.0)),
            (11, Rating::UNRATED),
            (12, rated(1.0)),
            (13, {
                let mut r = rated(1.0);
                r.value = RatingValue::Skipped;
                r
            }),
        ]);
        // Thesis 11 is unrated by the user, 12 is skipped by the
        // participant, 13 is skipped by the user. Only thesis 10 counts.
        let participants = vec![participant(
            "Acme Party",
            &[
                (10, rated(1.0)),
                (11, rated(0.0)),
                (12, {
                    let mut r = rated(0.0);
                    r.value = RatingValue::Skipped;
                    r
                }),
                (13, rated(0.0)),
            ],
        )];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.matches[0].match_percentage, Some(100));
        assert_eq!(report.matches[0].compared_theses, 1);
    }

    #[test]
    fn no_comparable_thesis_reports_none() {
        let user = ratings(&[(10, rated(1.0))]);
        let participants = vec![participant("Acme Party", &[(11, rated(1.0))])];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.matches[0].match_percentage, None);
        assert_eq!(report.matches[0].compared_theses, 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1 - |1.0 - 0.125| = 0.875, so 87.5 rounds up to 88.
        let user = ratings(&[(10, rated(1.0))]);
        let participants = vec![participant("Acme Party", &[(10, rated(0.125))])];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.matches[0].match_percentage, Some(88));
    }

    #[test]
    fn report_sorted_best_match_first() {
        let user = ratings(&[(10, rated(1.0))]);
        let participants = vec![
            participant("Average Party", &[(10, rated(0.5))]),
            participant("No Answers Party", &[]),
            participant("Best Party", &[(10, rated(1.0))]),
        ];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        let names: Vec<&str> = report.matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Best Party", "Average Party", "No Answers Party"]);
        assert_eq!(report.matches[2].match_percentage, None);
    }

    #[test]
    fn equal_percentages_sorted_by_name() {
        let user = ratings(&[(10, rated(1.0))]);
        let participants = vec![
            participant("Zeta Party", &[(10, rated(1.0))]),
            participant("Alpha Party", &[(10, rated(1.0))]),
        ];
        let report = run_match_stats(&user, &participants, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(report.matches[0].name, "Alpha Party");
        assert_eq!(report.matches[1].name, "Zeta Party");
    }

    #[test]
    fn invalid_scale_sizes_rejected() {
        let user = ratings(&[(10, rated(1.0))]);
        let rules = MatchRules {
            decisions: 1,
            weighted_votes_limit: None,
        };
        assert_eq!(
            run_match_stats(&user, &[], &rules),
            Err(MatchingErrors::InvalidScaleSize(1))
        );
        let rules = MatchRules {
            decisions: 6,
            weighted_votes_limit: None,
        };
        assert_eq!(
            run_match_stats(&user, &[], &rules),
            Err(MatchingErrors::InvalidScaleSize(6))
        );
    }
}
