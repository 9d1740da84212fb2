use clap::{Parser, Subcommand};

/// This is a voting advice program: rate the theses of an election and
/// match the answers of parties and candidates.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The file containing the election description in JSON format.
    /// For more information about the file format, read the library documentation.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (directory path, optional) The directory holding the rating store file.
    /// Defaults to the directory of the configuration file.
    #[clap(short, long, value_parser)]
    pub data_dir: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record an opinion on a thesis.
    Rate {
        /// The identifier of the thesis, as declared in the election description.
        #[clap(long, value_parser)]
        thesis: u32,
        /// The decision on the agreement scale, from 1 (fully disagree) to
        /// the number of decisions configured for the election (fully agree).
        #[clap(long, value_parser)]
        decision: u32,
    },
    /// Decline to rate a thesis. This is recorded and distinct from never
    /// having rated.
    Skip {
        #[clap(long, value_parser)]
        thesis: u32,
    },
    /// Mark a thesis as favorite so that it weighs double in the match, or
    /// remove the mark.
    Favorite {
        #[clap(long, value_parser)]
        thesis: u32,
        /// If passed as an argument, removes the favorite mark instead of adding it.
        #[clap(long, takes_value = false)]
        remove: bool,
    },
    /// Print the recorded opinion for every thesis of the election.
    Status,
    /// Compute the match percentages of all parties and candidates.
    Matches {
        /// (file path, optional) If specified, the summary of the matches will be
        /// written in JSON format to the given location instead of the standard output.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// (file path, optional) A reference file containing a match summary in JSON
        /// format. If provided, voto will check that the computed output matches the
        /// reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
    /// Delete every recorded rating, for all elections in the store.
    Reset,
}
