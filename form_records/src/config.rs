// ********* Input data structures ***********

use std::fmt::Display;

/// The maximum number of graded attempts a student may record.
pub const MAX_ATTEMPTS: usize = 4;

/// Inclusive bounds of a score.
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Number of characters in a voter ID.
pub const VOTER_ID_LEN: usize = 4;

/// A candidate that can be selected on the voting form.
///
/// The name is the canonical value written to the vote file. The code is an
/// optional short alias (for example `J` for `Jane`) accepted when selecting.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub code: Option<String>,
}

impl Candidate {
    pub fn new(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            code: None,
        }
    }

    /// True if the selection refers to this candidate, by name or by code.
    /// The comparison ignores case and surrounding blanks.
    pub fn matches(&self, selection: &str) -> bool {
        let s = selection.trim();
        self.name.eq_ignore_ascii_case(s)
            || self
                .code
                .as_deref()
                .map(|c| c.eq_ignore_ascii_case(s))
                .unwrap_or(false)
    }

    /// The two candidates offered when nothing else is configured.
    pub fn default_list() -> Vec<Candidate> {
        vec![Candidate::new("Jane"), Candidate::new("John")]
    }
}

/// A voter ID that passed validation: exactly four ASCII digits.
///
/// This is an identifier, not a number: `0042` and `42` are different IDs.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct VoterId(pub(crate) String);

impl VoterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VoterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A score in [0, 100].
///
/// Whole scores render without a fractional part (`80`), others as a plain
/// decimal (`72.5`).
#[derive(PartialEq, PartialOrd, Debug, Clone, Copy)]
pub struct Score(pub(crate) f64);

impl Score {
    pub const ZERO: Score = Score(0.0);

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ******** Records *********

/// One accepted vote.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRecord {
    pub voter_id: VoterId,
    pub candidate: String,
}

/// One grading submission.
///
/// All four score slots are always present. Slots past `attempts` hold zero.
#[derive(PartialEq, Debug, Clone)]
pub struct GradeRecord {
    pub student_name: String,
    pub attempts: usize,
    pub scores: [Score; MAX_ATTEMPTS],
    pub highest_score: Score,
}

impl GradeRecord {
    /// Builds a record from the scores of the attempts actually taken.
    ///
    /// `used` holds one score per attempt. The highest score is taken over
    /// these only; the remaining slots are padded with zeros.
    pub fn new(student_name: &str, used: &[Score]) -> GradeRecord {
        let mut scores = [Score::ZERO; MAX_ATTEMPTS];
        for (slot, score) in scores.iter_mut().zip(used.iter()) {
            *slot = *score;
        }
        let highest_score = used.iter().copied().fold(Score::ZERO, |acc, s| {
            if s > acc {
                s
            } else {
                acc
            }
        });
        GradeRecord {
            student_name: student_name.to_string(),
            attempts: used.len().min(MAX_ATTEMPTS),
            scores,
            highest_score,
        }
    }

    /// The scores of the attempts taken.
    pub fn used_scores(&self) -> &[Score] {
        &self.scores[..self.attempts.min(MAX_ATTEMPTS)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_display() {
        assert_eq!(Score(80.0).to_string(), "80");
        assert_eq!(Score(0.0).to_string(), "0");
        assert_eq!(Score(72.5).to_string(), "72.5");
        assert_eq!(Score(100.0).to_string(), "100");
    }

    #[test]
    fn grade_record_pads_and_takes_max_of_used() {
        let r = GradeRecord::new("Ana", &[Score(40.0), Score(90.0), Score(70.0)]);
        assert_eq!(r.attempts, 3);
        assert_eq!(r.highest_score, Score(90.0));
        assert_eq!(r.scores[3], Score::ZERO);
        assert_eq!(r.used_scores().len(), 3);
        assert_eq!(r.used_scores()[1].value(), 90.0);
    }

    #[test]
    fn used_scores_bounded_by_slots() {
        let mut r = GradeRecord::new("Ana", &[Score(10.0)]);
        r.attempts = 9;
        assert_eq!(r.used_scores().len(), MAX_ATTEMPTS);
    }

    #[test]
    fn candidate_matching() {
        let c = Candidate {
            name: "Jane".to_string(),
            code: Some("J".to_string()),
        };
        assert!(c.matches("jane"));
        assert!(c.matches(" JANE "));
        assert!(c.matches("j"));
        assert!(!c.matches("John"));
        assert!(!Candidate::new("John").matches("J"));
    }
}
