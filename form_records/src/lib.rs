/*!
Validation and persistence for two small classroom forms.

- the **voting form** records one vote per 4-digit voter ID, for one of a
  fixed list of candidates;
- the **grading form** records a student's scores over 1 to 4 attempts,
  together with the highest of them.

Both append rows to a CSV file. The user interface is not part of this
crate: it is plugged in through the [`FormShell`] trait.

```
use form_records::*;
# use std::collections::HashMap;
# #[derive(Default)]
# struct Shell { fields: HashMap<Field, String>, candidate: Option<String>, last: Option<String> }
# impl FormShell for Shell {
#     fn field_text(&self, field: Field) -> String { self.fields.get(&field).cloned().unwrap_or_default() }
#     fn selected_candidate(&self) -> Option<String> { self.candidate.clone() }
#     fn show_status(&mut self, _status: Status, message: &str) { self.last = Some(message.to_string()) }
#     fn reset_inputs(&mut self) { self.fields.clear(); self.candidate = None; }
#     fn set_visible_scores(&mut self, _count: usize) {}
# }
let mut shell = Shell::default();
let mut form = VotingForm::open(MemoryStore::new(), Candidate::default_list(), &mut shell);

shell.fields.insert(Field::VoterId, "0042".to_string());
shell.candidate = Some("Jane".to_string());
let vote = form.submit(&mut shell)?;
assert_eq!(vote.candidate, "Jane");

shell.fields.insert(Field::VoterId, "0042".to_string());
shell.candidate = Some("John".to_string());
assert!(form.submit(&mut shell).is_err());
# Ok::<(), SubmitError>(())
```
*/

mod config;
pub mod manual;
mod shell;
mod store;
mod summary;
mod validation;
mod workflow;

pub use crate::config::*;
pub use crate::shell::*;
pub use crate::store::*;
pub use crate::summary::*;
pub use crate::validation::*;
pub use crate::workflow::*;
