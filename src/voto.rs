use log::{debug, info, warn};

use voto_match::*;

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command};
use crate::voto::config_reader::*;
use crate::voto::state_file::FileStore;

pub mod config_reader;
pub mod migrations;
pub mod state_file;

#[derive(Debug, Snafu)]
pub enum VotoError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(""))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type VotoResult<T> = Result<T, VotoError>;

/// An election description after validation, expressed with the library
/// types.
#[derive(PartialEq, Debug, Clone)]
pub struct Election {
    pub id: ElectionId,
    pub name: String,
    pub date: Option<String>,
    pub rules: MatchRules,
    pub theses: Vec<Thesis>,
    pub participants: Vec<ElectionParticipant>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Thesis {
    pub id: ThesisId,
    pub title: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ElectionParticipant {
    pub name: String,
    pub kind: String,
    pub answers: Ratings,
}

impl Election {
    fn thesis(&self, id: u32) -> VotoResult<&Thesis> {
        match self.theses.iter().find(|t| t.id.0 == id) {
            Some(t) => Ok(t),
            None => {
                let declared: Vec<u32> = self.theses.iter().map(|t| t.id.0).collect();
                whatever!("Unknown thesis {} (this election declares {:?})", id, declared)
            }
        }
    }
}

fn validate_election(config: &VotoConfig) -> VotoResult<Election> {
    let decisions = config.algorithm.decisions;
    if !(MIN_DECISIONS..=MAX_DECISIONS).contains(&decisions) {
        whatever!(
            "The number of scale decisions must lie in {}..={}, got {}",
            MIN_DECISIONS,
            MAX_DECISIONS,
            decisions
        );
    }
    if config.theses.is_empty() {
        whatever!("The election declares no theses");
    }

    let mut theses: Vec<Thesis> = Vec::new();
    for t in config.theses.iter() {
        if theses.iter().any(|seen| seen.id.0 == t.id) {
            whatever!("Duplicate thesis identifier {}", t.id);
        }
        theses.push(Thesis {
            id: ThesisId(t.id),
            title: t.title.clone(),
        });
    }

    let mut participants: Vec<ElectionParticipant> = Vec::new();
    for p in config.participants.iter() {
        if participants.iter().any(|seen| seen.name == p.name) {
            whatever!("Duplicate participant name {:?}", p.name);
        }
        let mut answers = Ratings::new();
        for (key, answer) in p.answers.iter() {
            let thesis_id = match key.parse::<u32>() {
                Result::Ok(x) => x,
                Result::Err(_) => {
                    whatever!("Participant {:?}: answer key {:?} is not a thesis identifier", p.name, key)
                }
            };
            if !theses.iter().any(|t| t.id.0 == thesis_id) {
                whatever!("Participant {:?}: answer for undeclared thesis {}", p.name, thesis_id);
            }
            let value = match answer.rating_value() {
                Result::Ok(x) => x,
                Result::Err(e) => whatever!("Participant {:?}: {}", p.name, e),
            };
            answers.insert(
                ThesisId(thesis_id),
                Rating {
                    value,
                    is_favorite: false,
                    rated_at: None,
                },
            );
        }
        participants.push(ElectionParticipant {
            name: p.name.clone(),
            kind: p.kind()?,
            answers,
        });
    }

    Ok(Election {
        id: ElectionId(config.election.id),
        name: config.election.name.clone(),
        date: config.election.date.clone(),
        rules: MatchRules {
            decisions,
            weighted_votes_limit: config.algorithm.weighted_votes_limit,
        },
        theses,
        participants,
    })
}

fn run_rate<R: RatingsRepository>(
    election: &Election,
    store: &mut RatingStore<R>,
    thesis: u32,
    decision: u32,
) -> VotoResult<()> {
    let thesis = election.thesis(thesis)?;
    let decisions = election.rules.decisions;
    if decision < 1 || decision > decisions {
        whatever!(
            "Decision {} is outside the scale of this election: 1..={}",
            decision,
            decisions
        );
    }
    let value = scale_value_to_normalized(decision, decisions);
    store.set_rating_value(election.id, thesis.id, RatingValue::Agreement(value));
    println!(
        "rated thesis {} at {}/{} ({}): {}",
        thesis.id.0, decision, decisions, value, thesis.title
    );
    Ok(())
}

fn run_skip<R: RatingsRepository>(
    election: &Election,
    store: &mut RatingStore<R>,
    thesis: u32,
) -> VotoResult<()> {
    let thesis = election.thesis(thesis)?;
    store.set_rating_value(election.id, thesis.id, RatingValue::Skipped);
    println!("skipped thesis {}: {}", thesis.id.0, thesis.title);
    Ok(())
}

fn run_favorite<R: RatingsRepository>(
    election: &Election,
    store: &mut RatingStore<R>,
    thesis: u32,
    remove: bool,
) -> VotoResult<()> {
    let thesis = election.thesis(thesis)?;
    if remove {
        store.set_rating_favorite(election.id, thesis.id, false);
        println!("removed the favorite mark from thesis {}", thesis.id.0);
        return Ok(());
    }
    let current = store.rating(election.id, thesis.id);
    if current.value.as_agreement().is_none() {
        whatever!(
            "Thesis {} has no recorded opinion: rate it before marking it as favorite",
            thesis.id.0
        );
    }
    if !current.is_favorite {
        if let Some(limit) = election.rules.weighted_votes_limit {
            let used = store.favorite_count(election.id);
            if used >= limit {
                whatever!(
                    "The favorite limit of this election is reached ({} of {}): remove another favorite first",
                    used,
                    limit
                );
            }
        }
    }
    store.set_rating_favorite(election.id, thesis.id, true);
    println!("marked thesis {} as favorite", thesis.id.0);
    Ok(())
}

fn run_status<R: RatingsRepository>(election: &Election, store: &RatingStore<R>) -> VotoResult<()> {
    println!("election: {} (id {})", election.name, election.id.0);
    for thesis in election.theses.iter() {
        let rating = store.rating(election.id, thesis.id);
        let marker = if rating.is_favorite { "*" } else { " " };
        let state = match rating.value {
            RatingValue::Unrated => "unrated".to_string(),
            RatingValue::Skipped => "skipped".to_string(),
            RatingValue::Agreement(x) => format!(
                "{}/{} ({})",
                normalized_to_scale_value(x, election.rules.decisions),
                election.rules.decisions,
                x
            ),
        };
        println!("{} {:>4} {:<12} {}", marker, thesis.id.0, state, thesis.title);
    }
    match election.rules.weighted_votes_limit {
        Some(limit) => println!(
            "favorites used: {} of {}",
            store.favorite_count(election.id),
            limit
        ),
        None => println!("favorites used: {}", store.favorite_count(election.id)),
    }
    Ok(())
}

fn build_summary_js(election: &Election, report: &MatchReport) -> JSValue {
    let mut results: Vec<JSValue> = Vec::new();
    for m in report.matches.iter() {
        let kind = election
            .participants
            .iter()
            .find(|p| p.name == m.name)
            .map(|p| p.kind.clone())
            .unwrap_or_else(|| "party".to_string());
        results.push(json!({
            "name": m.name.clone(),
            "kind": kind,
            "matchPercentage": m.match_percentage,
            "comparedTheses": m.compared_theses,
        }));
    }
    json!({
        "config": {
            "election": election.name.clone(),
            "date": election.date.clone(),
            "decisions": election.rules.decisions,
            "weightedVotesLimit": election.rules.weighted_votes_limit,
        },
        "results": results,
    })
}

fn run_matches<R: RatingsRepository>(
    election: &Election,
    store: &RatingStore<R>,
    out_path: Option<String>,
    reference_path: Option<String>,
) -> VotoResult<()> {
    let user_ratings = store.ratings(election.id);
    let participants: Vec<Participant> = election
        .participants
        .iter()
        .map(|p| Participant {
            name: p.name.clone(),
            answers: p.answers.clone(),
        })
        .collect();

    let res = run_match_stats(&user_ratings, &participants, &election.rules);
    info!("res {:?}", res);
    let report = match res {
        Result::Ok(x) => x,
        Result::Err(x) => {
            whatever!("Matching error: {:?}", x)
        }
    };

    // Assemble the final json
    let result_js = build_summary_js(election, &report);

    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match out_path {
        Some(path) => {
            fs::write(&path, pretty_js_stats.as_str())
                .context(WritingJsonSnafu { path: path.clone() })?;
            info!("match summary written to {}", path);
        }
        None => println!("matches:{}", pretty_js_stats),
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = reference_path {
        let summary_ref = read_summary(summary_p)?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between computed matches and the reference summary")
        }
    }

    Ok(())
}

fn run_reset<R: RatingsRepository>(store: &mut RatingStore<R>) -> VotoResult<()> {
    store.reset();
    println!("all ratings deleted");
    Ok(())
}

pub fn run(args: &Args) -> VotoResult<()> {
    let config = read_election_config(&args.config)?;
    info!("config: {:?}", config);
    let election = validate_election(&config)?;

    let data_dir = match &args.data_dir {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(args.config.as_str())
            .parent()
            .context(MissingParentDirSnafu {})?
            .to_path_buf(),
    };
    let repository = FileStore::new(&data_dir);
    debug!("rating store file: {:?}", repository.path());
    let mut store = RatingStore::open(repository);

    match &args.command {
        Command::Rate { thesis, decision } => run_rate(&election, &mut store, *thesis, *decision),
        Command::Skip { thesis } => run_skip(&election, &mut store, *thesis),
        Command::Favorite { thesis, remove } => {
            run_favorite(&election, &mut store, *thesis, *remove)
        }
        Command::Status => run_status(&election, &store),
        Command::Matches { out, reference } => {
            run_matches(&election, &store, out.clone(), reference.clone())
        }
        Command::Reset => run_reset(&mut store),
    }
}
