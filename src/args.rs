use clap::{Parser, Subcommand};

/// Voting and grading forms that record their submissions in CSV files.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the location of the record files and the list of candidates.
    /// For more information about the file format, read the documentation of the form_records crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, optional) The directory holding votes.csv and grades.csv. Setting this option overrides
    /// the paths that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub data_dir: Option<String>,

    /// (list of values or not specified) If specified, the names of the candidates offered on the voting
    /// form. Defaults to Jane and John.
    #[clap(long, value_parser)]
    pub candidates: Option<Vec<String>>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Cast votes. Without --id and --candidate, prompts for votes until the input ends.
    Vote {
        /// The 4 digit voter ID.
        #[clap(long, value_parser)]
        id: Option<String>,
        /// The name (or code) of the chosen candidate.
        #[clap(long, value_parser)]
        candidate: Option<String>,
    },
    /// Record grades. Without --name, --attempts and --scores, prompts for students until the input ends.
    Grade {
        /// The name of the student.
        #[clap(long, value_parser)]
        name: Option<String>,
        /// The number of attempts (1 to 4).
        #[clap(long, value_parser)]
        attempts: Option<String>,
        /// The score of each attempt, in order. Repeat the flag for every attempt.
        #[clap(long, value_parser)]
        scores: Option<Vec<String>>,
    },
    /// Count the recorded votes per candidate.
    Tally {
        /// (file path, 'stdout' or empty) Where to write the summary in JSON format.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// (file path) A reference summary in JSON format. If provided, formrec checks that the
        /// tally matches the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
}
