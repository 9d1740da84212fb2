/*!

This is the long-form manual for `voto_match` and `voto`.

## Concepts

An election declares a set of *theses* (policy statements) and a set of
*participants* (parties and candidates), each participant publishing an
answer for the theses. A user rates theses on a discrete agreement scale
of N points, where N is configured per election and ranges from 2 to 5.
Decision 1 is full disagreement, decision N is full agreement.

Internally every opinion is stored normalized to the closed interval
[0, 1], so elections with different scale sizes share one representation.
The normalized points are evenly spaced: on a five-point scale the
decisions map to 0, 0.25, 0.5, 0.75 and 1. Two sentinel states exist
besides numbers: `unrated` (no opinion ever recorded) and `skipped` (the
user explicitly declined, which is a recorded action and survives
reloads).

A user may mark theses as *favorites*. Favorites weigh double in the
match computation. Elections can cap the number of favorites through
`weightedVotesLimit`; the cap is enforced when a favorite is added, not
retroactively.

## Matching policy

For each participant, the match percentage is computed as follows:

- A thesis counts only when both the user and the participant carry a
  numeric agreement for it. Theses that are `unrated` or `skipped` on
  either side are excluded from the computation entirely (they affect
  neither the numerator nor the denominator).
- Each counted thesis contributes an agreement of
  `1 - |user - participant|`, so identical answers contribute 1 and
  opposite extremes contribute 0.
- Contributions are weighted: 2 for theses the user favorited, 1
  otherwise.
- The percentage is the weighted mean of the contributions, scaled to
  0..=100 and rounded half up to an integer.
- A participant with no countable thesis gets no percentage at all
  (rendered as `null` in the JSON summary). This is deliberately distinct
  from 0, which means "compared and fully opposed".

The report lists participants best match first; participants without a
percentage come last and ties are ordered by name.

## Election configuration format

The `voto` program takes the election description as a JSON file:

```json
{
  "election": { "id": 1, "name": "State election 2026", "date": "2026-09-27" },
  "algorithm": { "decisions": 5, "weightedVotesLimit": 3 },
  "theses": [
    { "id": 10, "title": "Speed limit on highways" },
    { "id": 11, "title": "Public transport should be free" }
  ],
  "participants": [
    {
      "name": "Unity Party",
      "kind": "party",
      "answers": { "10": 1.0, "11": 0.25 }
    },
    {
      "name": "A. Candidate",
      "kind": "candidate",
      "answers": { "10": 0.0, "11": "skipped" }
    }
  ]
}
```

Notes:
- `algorithm.decisions` is the scale size N and must lie in 2..=5.
- `algorithm.weightedVotesLimit` is optional; omitting it removes the
  favorite cap.
- `kind` is optional and defaults to `party`; the other accepted value is
  `candidate`.
- Participant answers are keyed by thesis id and hold either a normalized
  number in [0, 1] or one of the sentinels `"unrated"` and `"skipped"`.
  Answers for undeclared theses are rejected.

## Rating store format

Ratings persist under the fixed storage key `voto-ratings`; the file
backend materializes it as `voto-ratings.json` in the data directory
(defaulting to the directory of the configuration file). The stored value
is a versioned envelope:

```json
{
  "version": 1,
  "state": {
    "userRatings": {
      "1": {
        "10": { "value": 1.0, "isFavorite": true, "ratedAt": 1726000000000.0 },
        "11": { "value": "skipped", "isFavorite": false }
      }
    }
  }
}
```

`ratedAt` is epoch milliseconds of the last value write; toggling the
favorite flag does not update it. The envelope version is currently 1.

When a file with an older version is loaded, the migration chain upgrades
it in order before the state reaches the application. Version 0 stored
per-thesis records as `{ "rating": <0..100 or -1>, "favorite": <bool>,
"timestamp": <number, optional> }`; the upgrade maps a missing `rating`
to `unrated`, `-1` to `skipped` and anything else to
`clamp(rating, 0, 100) / 100`. A version-0 payload that does not match
that shape anywhere is discarded entirely and the user starts with an
empty (but healthy) store; this is logged and never treated as a fatal
error. Files with a version newer than the current code are not loaded;
the session starts empty and leaves the file untouched until the first
write.

## Error behavior

Nothing in the rating path is allowed to take the session down: load
failures, malformed persisted state and write failures (disk full,
read-only directory) all log a warning and leave the in-memory state
authoritative. Configuration file problems are different: they are
reported as errors to the operator, since there is nothing sensible the
program can do without a valid election description.

*/
