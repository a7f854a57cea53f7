// A form shell over a line-oriented terminal.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use crate::forms::*;

pub struct TerminalShell<R, W> {
    input: R,
    output: W,
    fields: HashMap<Field, String>,
    candidate: Option<String>,
    visible_scores: usize,
}

impl<R: BufRead, W: Write> TerminalShell<R, W> {
    pub fn new(input: R, output: W) -> TerminalShell<R, W> {
        TerminalShell {
            input,
            output,
            fields: HashMap::new(),
            candidate: None,
            visible_scores: 0,
        }
    }

    pub fn set_field(&mut self, field: Field, text: &str) {
        self.fields.insert(field, text.to_string());
    }

    pub fn select_candidate(&mut self, candidate: Option<&str>) {
        self.candidate = candidate.map(|s| s.to_string());
    }

    pub fn visible_scores(&self) -> usize {
        self.visible_scores
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // None at the end of the input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let text = line.trim_end_matches(&['\r', '\n'][..]).to_string();
        debug!("read_line: {:?} -> {:?}", prompt, text);
        Ok(Some(text))
    }

    /// Asks for a voter ID and a candidate. The candidate may be typed by
    /// name, code or menu number. Returns false at the end of the input.
    pub fn prompt_vote(&mut self, candidates: &[Candidate]) -> io::Result<bool> {
        let id = match self.read_line("Voter ID: ")? {
            Some(s) => s,
            None => return Ok(false),
        };
        for (idx, c) in candidates.iter().enumerate() {
            match &c.code {
                Some(code) => writeln!(self.output, "  {}) {} [{}]", idx + 1, c.name, code)?,
                None => writeln!(self.output, "  {}) {}", idx + 1, c.name)?,
            }
        }
        let choice = match self.read_line("Candidate: ")? {
            Some(s) => s,
            None => return Ok(false),
        };
        let choice = choice.trim().to_string();
        let selected = if choice.is_empty() {
            None
        } else {
            match choice.parse::<usize>() {
                Ok(n) if n >= 1 && n <= candidates.len() => Some(candidates[n - 1].name.clone()),
                _ => Some(choice),
            }
        };
        self.set_field(Field::VoterId, &id);
        self.candidate = selected;
        Ok(true)
    }

    /// Asks for the name of a student and the number of attempts. Returns
    /// false at the end of the input.
    pub fn prompt_student(&mut self) -> io::Result<bool> {
        let name = match self.read_line("Student name: ")? {
            Some(s) => s,
            None => return Ok(false),
        };
        let attempts = match self.read_line("No. of attempts: ")? {
            Some(s) => s,
            None => return Ok(false),
        };
        self.set_field(Field::StudentName, &name);
        self.set_field(Field::Attempts, &attempts);
        Ok(true)
    }

    /// Asks for the score of every visible attempt. Returns false at the end
    /// of the input.
    pub fn prompt_scores(&mut self) -> io::Result<bool> {
        for idx in 0..self.visible_scores {
            let score = match self.read_line(&format!("Score {}: ", idx + 1))? {
                Some(s) => s,
                None => return Ok(false),
            };
            self.set_field(Field::Score(idx), &score);
        }
        Ok(true)
    }
}

impl<R: BufRead, W: Write> FormShell for TerminalShell<R, W> {
    fn field_text(&self, field: Field) -> String {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    fn selected_candidate(&self) -> Option<String> {
        self.candidate.clone()
    }

    fn show_status(&mut self, status: Status, message: &str) {
        let label = match status {
            Status::Success => "Success",
            Status::Failure => "Failed",
        };
        if let Err(e) = writeln!(self.output, "[{}] {}", label, message) {
            warn!("show_status: could not write to the terminal: {:?}", e);
        }
    }

    fn reset_inputs(&mut self) {
        self.fields.clear();
        self.candidate = None;
    }

    fn set_visible_scores(&mut self, count: usize) {
        self.visible_scores = count;
        for idx in count..MAX_ATTEMPTS {
            self.fields.remove(&Field::Score(idx));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn shell(input: &str) -> TerminalShell<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalShell::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn vote_prompt_by_number_name_or_blank() {
        let cands = vec![
            Candidate {
                name: "Jane".to_string(),
                code: Some("JD".to_string()),
            },
            Candidate::new("John"),
        ];
        let mut sh = shell("0001\n2\n0002\r\njd\n0003\n\n");
        assert!(sh.prompt_vote(&cands).unwrap());
        assert_eq!(sh.field_text(Field::VoterId), "0001");
        assert_eq!(sh.selected_candidate(), Some("John".to_string()));
        assert!(sh.prompt_vote(&cands).unwrap());
        assert_eq!(sh.field_text(Field::VoterId), "0002");
        assert_eq!(sh.selected_candidate(), Some("jd".to_string()));
        assert!(sh.prompt_vote(&cands).unwrap());
        assert_eq!(sh.selected_candidate(), None);
        assert!(!sh.prompt_vote(&cands).unwrap());
        let out = String::from_utf8(sh.into_output()).unwrap();
        assert!(out.contains("  1) Jane [JD]\n  2) John\n"));
    }

    #[test]
    fn hidden_scores_are_cleared() {
        let mut sh = shell("");
        for i in 0..MAX_ATTEMPTS {
            sh.set_field(Field::Score(i), "50");
        }
        sh.set_visible_scores(1);
        assert_eq!(sh.field_text(Field::Score(0)), "50");
        assert_eq!(sh.field_text(Field::Score(1)), "");
        assert_eq!(sh.field_text(Field::Score(3)), "");
    }

    #[test]
    fn status_lines() {
        let mut sh = shell("");
        sh.show_status(Status::Success, "ok");
        sh.show_status(Status::Failure, "no");
        assert_eq!(
            String::from_utf8(sh.into_output()).unwrap(),
            "[Success] ok\n[Failed] no\n"
        );
    }
}
