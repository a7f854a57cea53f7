// The submission workflow shared by the voting and the grading forms.

use log::{debug, info, warn};
use snafu::{prelude::*, Snafu};

use crate::config::*;
use crate::shell::*;
use crate::store::*;
use crate::validation::*;

/// Where a form stands in the handling of one submission.
///
/// A submission goes `Idle -> Validating` and ends in one of the three
/// terminal states. The form is back to `Idle` once the outcome has been
/// reported to the shell.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SubmissionState {
    Idle,
    Validating,
    Rejected,
    PersistenceFailed,
    Committed,
}

/// Why a submission did not produce a record.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SubmitError {
    /// A field was refused. The user can correct it and submit again.
    #[snafu(context(false), display("{source}"))]
    Rejected { source: ValidationError },
    /// The voter ID already has a vote.
    #[snafu(display("You cannot vote twice."))]
    Duplicate { voter_id: String },
    /// The store could not be read or written. Nothing was saved.
    #[snafu(context(false), display("{source}"))]
    Persistence { source: StoreError },
    /// The store could not be created when the form was opened.
    #[snafu(display("Could not create {path}. Submissions are disabled."))]
    StoreUnavailable { path: String },
}

impl SubmitError {
    /// The terminal state this error leaves the submission in.
    pub fn state(&self) -> SubmissionState {
        match self {
            SubmitError::Rejected { .. } | SubmitError::Duplicate { .. } => {
                SubmissionState::Rejected
            }
            SubmitError::Persistence { .. } | SubmitError::StoreUnavailable { .. } => {
                SubmissionState::PersistenceFailed
            }
        }
    }
}

pub type SubmitResult<T> = Result<T, SubmitError>;

// The parts common to both forms: initialization, state tracking and
// reporting to the shell.
struct FormCore {
    kind: &'static str,
    state: SubmissionState,
    // Name of the store if it could not be initialized.
    unavailable: Option<String>,
}

impl FormCore {
    fn open<R: Record, S: RecordStore<R>>(
        kind: &'static str,
        store: &mut S,
        shell: &mut dyn FormShell,
    ) -> FormCore {
        let unavailable = match store.ensure_initialized() {
            Ok(()) => None,
            Err(e) => {
                warn!("{} form: store initialization failed: {:?}", kind, e);
                shell.show_status(Status::Failure, &e.to_string());
                Some(store.name())
            }
        };
        FormCore {
            kind,
            state: SubmissionState::Idle,
            unavailable,
        }
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!("{} form: {:?} -> {:?}", self.kind, self.state, next);
        self.state = next;
    }

    fn run<T>(
        &mut self,
        shell: &mut dyn FormShell,
        attempt: impl FnOnce(&dyn FormShell) -> SubmitResult<T>,
        success_message: impl FnOnce(&T) -> String,
    ) -> SubmitResult<T> {
        if let Some(path) = &self.unavailable {
            let err = SubmitError::StoreUnavailable { path: path.clone() };
            shell.show_status(Status::Failure, &err.to_string());
            return Err(err);
        }

        self.transition(SubmissionState::Validating);
        let res = attempt(&*shell);
        match &res {
            Ok(x) => {
                self.transition(SubmissionState::Committed);
                shell.show_status(Status::Success, &success_message(x));
                shell.reset_inputs();
            }
            Err(e) => {
                self.transition(e.state());
                match e {
                    SubmitError::Persistence { source } => {
                        warn!("{} form: could not persist: {:?}", self.kind, source);
                    }
                    _ => info!("{} form: submission rejected: {}", self.kind, e),
                }
                shell.show_status(Status::Failure, &e.to_string());
            }
        }
        self.transition(SubmissionState::Idle);
        res
    }
}

/// The voting form: one vote per voter ID.
pub struct VotingForm<S> {
    store: S,
    candidates: Vec<Candidate>,
    core: FormCore,
}

impl<S: RecordStore<VoteRecord>> VotingForm<S> {
    /// Opens the form, creating the vote store if needed.
    ///
    /// If the store cannot be created, the shell is told so and the form
    /// refuses every submission.
    pub fn open(mut store: S, candidates: Vec<Candidate>, shell: &mut dyn FormShell) -> Self {
        let core = FormCore::open::<VoteRecord, S>("voting", &mut store, shell);
        VotingForm {
            store,
            candidates,
            core,
        }
    }

    pub fn submit(&mut self, shell: &mut dyn FormShell) -> SubmitResult<VoteRecord> {
        let store = &mut self.store;
        let candidates = &self.candidates;
        self.core.run(
            shell,
            |sh| cast_vote(store, candidates, sh),
            |r| {
                info!("Vote recorded for voter {}", r.voter_id);
                format!(
                    "You voted successfully for candidate: {}.",
                    r.candidate
                )
            },
        )
    }

    pub fn reset(&mut self, shell: &mut dyn FormShell) {
        shell.reset_inputs();
    }

    pub fn state(&self) -> SubmissionState {
        self.core.state
    }

    pub fn is_available(&self) -> bool {
        self.core.unavailable.is_none()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn cast_vote<S: RecordStore<VoteRecord>>(
    store: &mut S,
    candidates: &[Candidate],
    shell: &dyn FormShell,
) -> SubmitResult<VoteRecord> {
    let id_text = shell.field_text(Field::VoterId);
    let voter_id = validate_voter_id(id_text.trim())?;
    let selected = shell.selected_candidate();
    let candidate = validate_candidate_selection(selected.as_deref(), candidates)?;
    if store.exists_with_key(voter_id.as_str())? {
        return DuplicateSnafu {
            voter_id: voter_id.as_str(),
        }
        .fail();
    }
    let record = VoteRecord {
        voter_id,
        candidate,
    };
    store.append(&record)?;
    Ok(record)
}

/// The grading form: any number of submissions per student.
pub struct GradingForm<S> {
    store: S,
    core: FormCore,
}

impl<S: RecordStore<GradeRecord>> GradingForm<S> {
    /// Opens the form, creating the grade store if needed. No score input is
    /// visible until attempts are entered.
    pub fn open(mut store: S, shell: &mut dyn FormShell) -> Self {
        let core = FormCore::open::<GradeRecord, S>("grading", &mut store, shell);
        shell.set_visible_scores(0);
        GradingForm { store, core }
    }

    /// Updates the visible score inputs after the attempts field changed.
    pub fn attempts_changed(&self, shell: &mut dyn FormShell) {
        let count = visible_score_count(&shell.field_text(Field::Attempts));
        debug!("grading form: showing {} score inputs", count);
        shell.set_visible_scores(count);
    }

    /// Validates and records one submission.
    ///
    /// The attempts count is validated again from the text, whatever inputs
    /// are visible. Only the scores of those attempts are read; the other
    /// slots are stored as zero.
    pub fn submit(&mut self, shell: &mut dyn FormShell) -> SubmitResult<GradeRecord> {
        let store = &mut self.store;
        let res = self.core.run(
            shell,
            |sh| record_grade(store, sh),
            |r| {
                info!(
                    "Grades recorded for {}: highest {}",
                    r.student_name, r.highest_score
                );
                let used: Vec<String> = r.used_scores().iter().map(|s| s.to_string()).collect();
                format!(
                    "Highest score: {}\nScores used: [{}]",
                    r.highest_score,
                    used.join(", ")
                )
            },
        );
        if res.is_ok() {
            shell.set_visible_scores(0);
        }
        res
    }

    pub fn reset(&mut self, shell: &mut dyn FormShell) {
        shell.reset_inputs();
        shell.set_visible_scores(0);
    }

    pub fn state(&self) -> SubmissionState {
        self.core.state
    }

    pub fn is_available(&self) -> bool {
        self.core.unavailable.is_none()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn record_grade<S: RecordStore<GradeRecord>>(
    store: &mut S,
    shell: &dyn FormShell,
) -> SubmitResult<GradeRecord> {
    let name = validate_student_name(&shell.field_text(Field::StudentName))?;
    let attempts = validate_attempts(&shell.field_text(Field::Attempts))?;
    let used = (0..attempts)
        .map(|i| validate_score(&shell.field_text(Field::Score(i))))
        .collect::<ValidationResult<Vec<Score>>>()?;
    let record = GradeRecord::new(&name, &used);
    store.append(&record)?;
    Ok(record)
}
