/// An input field of one of the forms.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Field {
    VoterId,
    StudentName,
    Attempts,
    /// The score of one attempt, indexed from 0.
    Score(usize),
}

/// Style of a status message.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Status {
    Success,
    Failure,
}

/// The user-facing side of a form: whatever renders the fields and collects
/// the input (a window, a terminal, a test double).
///
/// The workflow only reads fields through this trait and reports back through
/// it. It never manipulates widgets directly.
pub trait FormShell {
    /// Current text of a field. Fields that the shell does not have read as
    /// empty.
    fn field_text(&self, field: Field) -> String;

    /// The candidate option currently selected, if any.
    fn selected_candidate(&self) -> Option<String>;

    fn show_status(&mut self, status: Status, message: &str);

    /// Clears every input and deselects every option.
    fn reset_inputs(&mut self);

    /// Shows the first `count` score inputs and hides and clears the others.
    /// `count` is always in [0, MAX_ATTEMPTS].
    fn set_visible_scores(&mut self, count: usize);
}
