use crate::voto::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::collections::BTreeMap;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VotoElection {
    pub id: u32,
    pub name: String,
    pub date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VotoAlgorithm {
    pub decisions: u32,
    #[serde(rename = "weightedVotesLimit")]
    pub weighted_votes_limit: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VotoThesis {
    pub id: u32,
    pub title: String,
}

/// A participant's published answer to one thesis, as written in the
/// election configuration: a normalized number or a textual sentinel.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VotoAnswer {
    Number(f64),
    Sentinel(String),
}

impl VotoAnswer {
    pub fn rating_value(&self) -> VotoResult<RatingValue> {
        match self {
            VotoAnswer::Number(x) if (0.0..=1.0).contains(x) => Ok(RatingValue::Agreement(*x)),
            VotoAnswer::Number(x) => {
                whatever!("Answer value {} outside the normalized range [0, 1]", x)
            }
            VotoAnswer::Sentinel(s) if s == "unrated" => Ok(RatingValue::Unrated),
            VotoAnswer::Sentinel(s) if s == "skipped" => Ok(RatingValue::Skipped),
            VotoAnswer::Sentinel(s) => {
                whatever!(
                    "Unknown answer sentinel {:?} (supported: \"unrated\" and \"skipped\")",
                    s
                )
            }
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VotoParticipant {
    pub name: String,
    #[serde(rename = "kind")]
    _kind: Option<String>,
    pub answers: BTreeMap<String, VotoAnswer>,
}

impl VotoParticipant {
    /// The participant kind. `"party"` when the configuration does not say
    /// otherwise.
    pub fn kind(&self) -> VotoResult<String> {
        match self._kind.as_deref() {
            None | Some("party") => Ok("party".to_string()),
            Some("candidate") => Ok("candidate".to_string()),
            Some(other) => {
                whatever!(
                    "Unknown participant kind {:?} (supported: \"party\" and \"candidate\")",
                    other
                )
            }
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VotoConfig {
    pub election: VotoElection,
    pub algorithm: VotoAlgorithm,
    pub theses: Vec<VotoThesis>,
    pub participants: Vec<VotoParticipant>,
}

pub fn read_election_config(path: &str) -> VotoResult<VotoConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: VotoConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> VotoResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
