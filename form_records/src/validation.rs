// Field-level checks for both forms.
//
// Every function is pure: it takes the raw text of a field and returns either
// the validated value or the first reason it was refused.

use std::error::Error;
use std::fmt::Display;

use crate::config::*;

/// Reasons a field is refused. The display strings are the messages shown to
/// the user.
#[derive(PartialEq, Debug, Clone)]
pub enum ValidationError {
    VoterIdLength,
    VoterIdNotDigits,
    NoCandidateSelected,
    UnknownCandidate(String),
    EmptyStudentName,
    EmptyAttempts,
    AttemptsNotInteger(String),
    AttemptsOutOfRange(i64),
    ScoreNotANumber(String),
    ScoreOutOfRange(f64),
}

impl Error for ValidationError {}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::VoterIdLength => {
                write!(f, "ID must be a {} digit voter ID.", VOTER_ID_LEN)
            }
            ValidationError::VoterIdNotDigits => write!(f, "ID must contain numbers only."),
            ValidationError::NoCandidateSelected => write!(f, "Select a candidate."),
            ValidationError::UnknownCandidate(s) => write!(f, "Unknown candidate: {}.", s),
            ValidationError::EmptyStudentName => write!(f, "Need a name for record keeping."),
            ValidationError::EmptyAttempts => write!(f, "Enter a No. of Attempts."),
            ValidationError::AttemptsNotInteger(_) => {
                write!(f, "No. of Attempts must be a whole number.")
            }
            ValidationError::AttemptsOutOfRange(_) => write!(
                f,
                "No. of Attempts must be between 1 and {}.",
                MAX_ATTEMPTS
            ),
            ValidationError::ScoreNotANumber(_) => write!(f, "Score must be a number."),
            ValidationError::ScoreOutOfRange(_) => {
                write!(f, "Score must be between {} - {}.", MIN_SCORE, MAX_SCORE)
            }
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks the shape of a voter ID. The length is checked before the content,
/// so `12a45` is refused for its length.
pub fn validate_voter_id(text: &str) -> ValidationResult<VoterId> {
    if text.chars().count() != VOTER_ID_LEN {
        return Err(ValidationError::VoterIdLength);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::VoterIdNotDigits);
    }
    Ok(VoterId(text.to_string()))
}

/// Resolves the selected option to the canonical candidate name.
pub fn validate_candidate_selection(
    selected: Option<&str>,
    candidates: &[Candidate],
) -> ValidationResult<String> {
    let s = match selected.map(str::trim) {
        None => return Err(ValidationError::NoCandidateSelected),
        Some(s) if s.is_empty() => return Err(ValidationError::NoCandidateSelected),
        Some(s) => s,
    };
    candidates
        .iter()
        .find(|c| c.matches(s))
        .map(|c| c.name.clone())
        .ok_or_else(|| ValidationError::UnknownCandidate(s.to_string()))
}

pub fn validate_student_name(text: &str) -> ValidationResult<String> {
    let name = text.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyStudentName);
    }
    Ok(name.to_string())
}

/// Strict check of the number of attempts at submission time.
///
/// Out-of-range values are refused, not clamped. See `visible_score_count`
/// for the lenient variant used while typing.
pub fn validate_attempts(text: &str) -> ValidationResult<usize> {
    let t = text.trim();
    if t.is_empty() {
        return Err(ValidationError::EmptyAttempts);
    }
    let attempts = t
        .parse::<i64>()
        .map_err(|_| ValidationError::AttemptsNotInteger(t.to_string()))?;
    if attempts < 1 || attempts > MAX_ATTEMPTS as i64 {
        return Err(ValidationError::AttemptsOutOfRange(attempts));
    }
    Ok(attempts as usize)
}

/// Parses one score. A blank field is an attempt not taken and counts as 0.
pub fn validate_score(text: &str) -> ValidationResult<Score> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(Score::ZERO);
    }
    let value = match t.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return Err(ValidationError::ScoreNotANumber(t.to_string())),
    };
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(ValidationError::ScoreOutOfRange(value));
    }
    Ok(Score(value))
}

/// Number of score inputs to show for the attempts text as currently typed.
///
/// Presentation only: the value is clamped to [0, MAX_ATTEMPTS] and anything
/// that is not an integer shows no inputs.
pub fn visible_score_count(text: &str) -> usize {
    match text.trim().parse::<i64>() {
        Ok(n) => n.clamp(0, MAX_ATTEMPTS as i64) as usize,
        Err(_) => 0,
    }
}
