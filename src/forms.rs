use log::{debug, info, warn};

use form_records::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{BufRead, Write};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::forms::config_reader::*;
use crate::forms::io_terminal::*;

pub mod config_reader;
pub mod io_terminal;

#[derive(Debug, Snafu)]
pub enum FormsError {
    #[snafu(display("Error opening file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Store { source: StoreError },
    #[snafu(display("{source}"))]
    Submission { source: SubmitError },
    #[snafu(display("Terminal error"))]
    Terminal { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type FormsResult<T> = Result<T, FormsError>;

/// The values of a vote given on the command line.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoteInput {
    pub id: Option<String>,
    pub candidate: Option<String>,
}

/// The values of a grading submission given on the command line.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct GradeInput {
    pub name: Option<String>,
    pub attempts: Option<String>,
    pub scores: Vec<String>,
}

/// Submits a single vote and fails if it is not recorded.
pub fn submit_vote<R: BufRead, W: Write>(
    settings: &FormSettings,
    input: &VoteInput,
    shell: &mut TerminalShell<R, W>,
) -> FormsResult<VoteRecord> {
    let store: CsvStore<VoteRecord> = CsvStore::new(&settings.votes_path);
    let mut form = VotingForm::open(store, settings.candidates.clone(), shell);
    shell.set_field(Field::VoterId, input.id.as_deref().unwrap_or(""));
    shell.select_candidate(input.candidate.as_deref());
    form.submit(shell).context(SubmissionSnafu {})
}

/// Submits a single grading record and fails if it is not recorded.
pub fn submit_grade<R: BufRead, W: Write>(
    settings: &FormSettings,
    input: &GradeInput,
    shell: &mut TerminalShell<R, W>,
) -> FormsResult<GradeRecord> {
    let store: CsvStore<GradeRecord> = CsvStore::new(&settings.grades_path);
    let mut form = GradingForm::open(store, shell);
    shell.set_field(Field::StudentName, input.name.as_deref().unwrap_or(""));
    shell.set_field(Field::Attempts, input.attempts.as_deref().unwrap_or(""));
    form.attempts_changed(shell);
    let visible = shell.visible_scores();
    for (idx, score) in input.scores.iter().take(visible).enumerate() {
        shell.set_field(Field::Score(idx), score);
    }
    form.submit(shell).context(SubmissionSnafu {})
}

/// Prompts for votes until the input ends. Returns the number of votes
/// recorded.
pub fn run_voting<R: BufRead, W: Write>(
    settings: &FormSettings,
    shell: &mut TerminalShell<R, W>,
) -> FormsResult<usize> {
    let store: CsvStore<VoteRecord> = CsvStore::new(&settings.votes_path);
    let mut form = VotingForm::open(store, settings.candidates.clone(), shell);
    if !form.is_available() {
        whatever!("Could not open {:?}", settings.votes_path)
    }
    let mut recorded = 0;
    while shell.prompt_vote(form.candidates()).context(TerminalSnafu {})? {
        if form.submit(shell).is_ok() {
            recorded += 1;
        }
    }
    info!("run_voting: {} votes recorded", recorded);
    Ok(recorded)
}

/// Prompts for grading submissions until the input ends. Returns the number
/// of records written.
pub fn run_grading<R: BufRead, W: Write>(
    settings: &FormSettings,
    shell: &mut TerminalShell<R, W>,
) -> FormsResult<usize> {
    let store: CsvStore<GradeRecord> = CsvStore::new(&settings.grades_path);
    let mut form = GradingForm::open(store, shell);
    if !form.is_available() {
        whatever!("Could not open {:?}", settings.grades_path)
    }
    let mut recorded = 0;
    while shell.prompt_student().context(TerminalSnafu {})? {
        form.attempts_changed(shell);
        if !shell.prompt_scores().context(TerminalSnafu {})? {
            break;
        }
        if form.submit(shell).is_ok() {
            recorded += 1;
        }
    }
    info!("run_grading: {} records written", recorded);
    Ok(recorded)
}

fn tally_to_json(settings: &FormSettings, t: &Tally) -> JSValue {
    let mut tally: JSMap<String, JSValue> = JSMap::new();
    for (name, count) in t.counts.iter() {
        tally.insert(name.clone(), json!(count.to_string()));
    }
    let candidates: Vec<JSValue> = settings
        .candidates
        .iter()
        .map(|c| json!({"name": c.name, "code": c.code}))
        .collect();
    json!({
        "config": {
            "votesFile": settings.votes_path.display().to_string(),
            "candidates": candidates,
        },
        "results": {
            "tally": tally,
            "total": t.total.to_string(),
        }
    })
}

fn read_reference(path: &str) -> FormsResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    debug!("read_reference: {:?}", contents);
    serde_json::from_str(&contents).context(ParsingJsonSnafu {})
}

/// Counts the recorded votes and writes the summary.
///
/// If a reference summary is given, the differences are printed and reported
/// as an error.
pub fn run_tally(
    settings: &FormSettings,
    out: Option<&str>,
    reference: Option<&str>,
) -> FormsResult<JSValue> {
    let store: CsvStore<VoteRecord> = CsvStore::new(&settings.votes_path);
    let records = store.records().context(StoreSnafu {})?;
    info!("run_tally: {} votes read", records.len());
    let t = tally(&records, &settings.candidates);
    let result_js = tally_to_json(settings, &t);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match out {
        None | Some("stdout") => println!("{}", pretty_js),
        Some(p) => {
            fs::write(p, pretty_js.as_bytes()).context(WritingOutputSnafu { path: p })?;
            info!("run_tally: summary written to {:?}", p);
        }
    }

    if let Some(summary_p) = reference {
        let summary_ref = read_reference(summary_p)?;
        let pretty_js_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_ref != pretty_js {
            warn!("Found differences with the reference summary");
            print_diff(pretty_js_ref.as_str(), pretty_js.as_str(), "\n");
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }
    Ok(result_js)
}
