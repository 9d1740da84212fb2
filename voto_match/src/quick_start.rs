/*!

# Quick start

This example walks through the whole rating workflow in the library:
opening a store, recording opinions on a few theses and computing the
match percentages against two parties.

The store needs a persistence backend. Here the in-memory backend is
enough; the `voto` command line program plugs in a file-backed one
instead.

```rust
use voto_match::{
    run_match_stats, scale_value_to_normalized, ElectionId, MatchRules, MemoryRepository,
    Participant, Rating, RatingStore, RatingValue, ThesisId,
};

let election = ElectionId(1);
let mut store = RatingStore::open(MemoryRepository::default());

// The election uses a five-point agreement scale. The user fully agrees
// with thesis 10, fully disagrees with thesis 11 and declines thesis 12.
store.set_rating_value(
    election,
    ThesisId(10),
    RatingValue::Agreement(scale_value_to_normalized(5, 5)),
);
store.set_rating_value(
    election,
    ThesisId(11),
    RatingValue::Agreement(scale_value_to_normalized(1, 5)),
);
store.set_rating_value(election, ThesisId(12), RatingValue::Skipped);

// Thesis 10 matters most to the user: it will weigh double in the match.
store.set_rating_favorite(election, ThesisId(10), true);

// The published answers of the participants.
let answer = |value| Rating {
    value: RatingValue::Agreement(value),
    is_favorite: false,
    rated_at: None,
};
let participants = vec![
    Participant {
        name: "Unity Party".to_string(),
        answers: [(ThesisId(10), answer(1.0)), (ThesisId(11), answer(0.0))]
            .into_iter()
            .collect(),
    },
    Participant {
        name: "Reform Party".to_string(),
        answers: [(ThesisId(10), answer(0.0)), (ThesisId(11), answer(1.0))]
            .into_iter()
            .collect(),
    },
];

let rules = MatchRules {
    decisions: 5,
    weighted_votes_limit: Some(3),
};
let report = run_match_stats(&store.ratings(election), &participants, &rules)?;

// The report is sorted best match first. The skipped thesis 12 is not
// part of the computation.
assert_eq!(report.matches[0].name, "Unity Party");
assert_eq!(report.matches[0].match_percentage, Some(100));
assert_eq!(report.matches[1].name, "Reform Party");
assert_eq!(report.matches[1].match_percentage, Some(0));
assert_eq!(report.matches[0].compared_theses, 2);
# Ok::<(), voto_match::MatchingErrors>(())
```

The same flow through the command line program, with the election
described in `election.json`:

```bash
voto --config election.json rate --thesis 10 --decision 5
voto --config election.json rate --thesis 11 --decision 1
voto --config election.json skip --thesis 12
voto --config election.json favorite --thesis 10
voto --config election.json matches
```

The ratings persist in `voto-ratings.json` next to the configuration
file (`--data-dir` overrides the location), so the commands build on each
other across invocations. See the [manual](../manual/index.html) for the
file formats and the exact matching policy.

*/
