// Primitives for persisting records to CSV files.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, info};
use snafu::{prelude::*, Snafu};

use crate::config::*;
use crate::validation::{validate_attempts, validate_score, validate_voter_id};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("Could not create {path}."))]
    Create {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not read {path}."))]
    Read { source: csv::Error, path: String },
    #[snafu(display("Could not save to {path}."))]
    Write { source: csv::Error, path: String },
    #[snafu(display("{path} has no {column} column."))]
    MissingColumn { column: String, path: String },
    #[snafu(display("{path}: line {lineno} is not a valid record."))]
    MalformedRow { lineno: u64, path: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A row type with a fixed column layout.
pub trait Record: Sized {
    /// Column names, in file order.
    const HEADER: &'static [&'static str];
    /// Name of the column holding the lookup key.
    const KEY_COLUMN: &'static str;

    fn to_row(&self) -> Vec<String>;

    /// Decodes a row. Returns None if the fields do not form a valid record.
    fn from_row(fields: &[&str]) -> Option<Self>;
}

impl Record for VoteRecord {
    const HEADER: &'static [&'static str] = &["voter_id", "candidate"];
    const KEY_COLUMN: &'static str = "voter_id";

    fn to_row(&self) -> Vec<String> {
        vec![self.voter_id.to_string(), self.candidate.clone()]
    }

    fn from_row(fields: &[&str]) -> Option<Self> {
        match fields {
            [id, candidate] => Some(VoteRecord {
                voter_id: validate_voter_id(id).ok()?,
                candidate: candidate.to_string(),
            }),
            _ => None,
        }
    }
}

impl Record for GradeRecord {
    const HEADER: &'static [&'static str] = &[
        "student_name",
        "attempts",
        "score1",
        "score2",
        "score3",
        "score4",
        "highest_score",
    ];
    const KEY_COLUMN: &'static str = "student_name";

    fn to_row(&self) -> Vec<String> {
        let mut row = vec![self.student_name.clone(), self.attempts.to_string()];
        row.extend(self.scores.iter().map(|s| s.to_string()));
        row.push(self.highest_score.to_string());
        row
    }

    fn from_row(fields: &[&str]) -> Option<Self> {
        match fields {
            [name, attempts, s1, s2, s3, s4, highest] => {
                let mut scores = [Score::ZERO; MAX_ATTEMPTS];
                for (slot, text) in scores.iter_mut().zip([s1, s2, s3, s4]) {
                    *slot = validate_score(text).ok()?;
                }
                Some(GradeRecord {
                    student_name: name.to_string(),
                    attempts: validate_attempts(attempts).ok()?,
                    scores,
                    highest_score: validate_score(highest).ok()?,
                })
            }
            _ => None,
        }
    }
}

/// Persistent storage for one kind of record.
///
/// Implementations must not hold resources between calls: every operation
/// acquires and releases whatever it needs.
pub trait RecordStore<R: Record> {
    /// Display name used in user messages, e.g. `votes.csv`.
    fn name(&self) -> String;

    /// Creates the store with its header if it does not exist yet.
    /// Calling it again on an existing store changes nothing.
    fn ensure_initialized(&mut self) -> StoreResult<()>;

    /// True if some record has `key` in its key column.
    fn exists_with_key(&self, key: &str) -> StoreResult<bool>;

    /// Writes one record after the existing ones. No validation happens here.
    fn append(&mut self, record: &R) -> StoreResult<()>;

    /// All the records, in file order.
    fn records(&self) -> StoreResult<Vec<R>>;
}

/// A record store backed by a CSV file with a header row.
pub struct CsvStore<R> {
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R: Record> CsvStore<R> {
    pub fn new(path: impl AsRef<Path>) -> CsvStore<R> {
        CsvStore {
            path: path.as_ref().to_path_buf(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn reader(&self) -> StoreResult<csv::Reader<std::fs::File>> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .context(ReadSnafu { path: self.file_name() })
    }
}

impl<R: Record> RecordStore<R> for CsvStore<R> {
    fn name(&self) -> String {
        self.file_name()
    }

    fn ensure_initialized(&mut self) -> StoreResult<()> {
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let len = fs::metadata(&self.path)
                    .context(CreateSnafu { path: self.file_name() })?
                    .len();
                if len > 0 {
                    debug!("ensure_initialized: {:?} already exists", self.path);
                    return Ok(());
                }
                // An empty file has no header: lookups would fail on it.
                info!("ensure_initialized: {:?} is empty", self.path);
                OpenOptions::new()
                    .append(true)
                    .open(&self.path)
                    .context(CreateSnafu { path: self.file_name() })?
            }
            Err(e) => return Err(e).context(CreateSnafu { path: self.file_name() }),
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(R::HEADER)
            .and_then(|_| writer.flush().map_err(csv::Error::from))
            .map_err(|e| std::io::Error::new(ErrorKind::Other, e))
            .context(CreateSnafu { path: self.file_name() })?;
        info!("Created {:?} with header {:?}", self.path, R::HEADER);
        Ok(())
    }

    fn exists_with_key(&self, key: &str) -> StoreResult<bool> {
        let mut rdr = self.reader()?;
        let headers = rdr
            .headers()
            .context(ReadSnafu { path: self.file_name() })?
            .clone();
        let key_idx = headers
            .iter()
            .position(|h| h == R::KEY_COLUMN)
            .context(MissingColumnSnafu {
                column: R::KEY_COLUMN,
                path: self.file_name(),
            })?;
        for (idx, line_r) in rdr.records().enumerate() {
            let line = line_r.context(ReadSnafu { path: self.file_name() })?;
            if line.get(key_idx) == Some(key) {
                debug!("exists_with_key: {:?} found at row {}", key, idx + 1);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn append(&mut self, record: &R) -> StoreResult<()> {
        // Append only to a store that was initialized: a fresh file would
        // lack its header.
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(csv::Error::from)
            .context(WriteSnafu { path: self.file_name() })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(record.to_row())
            .context(WriteSnafu { path: self.file_name() })?;
        writer
            .flush()
            .map_err(csv::Error::from)
            .context(WriteSnafu { path: self.file_name() })?;
        Ok(())
    }

    fn records(&self) -> StoreResult<Vec<R>> {
        let mut rdr = self.reader()?;
        let mut res: Vec<R> = Vec::new();
        for (idx, line_r) in rdr.records().enumerate() {
            // The header is line 1.
            let lineno = idx as u64 + 2;
            let line = line_r.context(ReadSnafu { path: self.file_name() })?;
            let fields: Vec<&str> = line.iter().collect();
            let r = R::from_row(&fields).context(MalformedRowSnafu {
                lineno,
                path: self.file_name(),
            })?;
            res.push(r);
        }
        Ok(res)
    }
}

/// An in-memory record store, for embedding the forms without a file system
/// and for tests.
pub struct MemoryStore<R> {
    initialized: bool,
    rows: Vec<Vec<String>>,
    _record: PhantomData<R>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> MemoryStore<R> {
        MemoryStore {
            initialized: false,
            rows: Vec::new(),
            _record: PhantomData,
        }
    }

    /// The raw rows, header first once initialized.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl<R: Record> RecordStore<R> for MemoryStore<R> {
    fn name(&self) -> String {
        "memory".to_string()
    }

    fn ensure_initialized(&mut self) -> StoreResult<()> {
        if !self.initialized {
            self.rows
                .insert(0, R::HEADER.iter().map(|h| h.to_string()).collect());
            self.initialized = true;
        }
        Ok(())
    }

    fn exists_with_key(&self, key: &str) -> StoreResult<bool> {
        let key_idx = R::HEADER
            .iter()
            .position(|h| *h == R::KEY_COLUMN)
            .context(MissingColumnSnafu {
                column: R::KEY_COLUMN,
                path: self.name(),
            })?;
        Ok(self
            .rows
            .iter()
            .skip(1)
            .any(|row| row.get(key_idx).map(String::as_str) == Some(key)))
    }

    fn append(&mut self, record: &R) -> StoreResult<()> {
        self.rows.push(record.to_row());
        Ok(())
    }

    fn records(&self) -> StoreResult<Vec<R>> {
        let mut res: Vec<R> = Vec::new();
        for (idx, row) in self.rows.iter().enumerate().skip(1) {
            let fields: Vec<&str> = row.iter().map(String::as_str).collect();
            let r = R::from_row(&fields).context(MalformedRowSnafu {
                lineno: idx as u64 + 1,
                path: self.name(),
            })?;
            res.push(r);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn vote(id: &str, candidate: &str) -> VoteRecord {
        VoteRecord {
            voter_id: validate_voter_id(id).unwrap(),
            candidate: candidate.to_string(),
        }
    }

    #[test]
    fn initialization_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("votes.csv");
        let mut store: CsvStore<VoteRecord> = CsvStore::new(&path);
        store.ensure_initialized().unwrap();
        store.ensure_initialized().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["voter_id,candidate"]);
    }

    #[test]
    fn initialization_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("votes.csv");
        fs::write(&path, "voter_id,candidate\n0042,Jane\n").unwrap();
        let mut store: CsvStore<VoteRecord> = CsvStore::new(&path);
        store.ensure_initialized().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "voter_id,candidate\n0042,Jane\n"
        );
    }

    #[test]
    fn initialization_writes_header_into_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("votes.csv");
        fs::write(&path, "").unwrap();
        let mut store: CsvStore<VoteRecord> = CsvStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        store.ensure_initialized().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "voter_id,candidate\n");
        assert!(!store.exists_with_key("1234").unwrap());
        store.append(&vote("1234", "Jane")).unwrap();
        assert!(store.exists_with_key("1234").unwrap());
    }

    #[test]
    fn initialization_failure_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("votes.csv");
        let mut store: CsvStore<VoteRecord> = CsvStore::new(path);
        let err = store.ensure_initialized().unwrap_err();
        assert!(matches!(err, StoreError::Create { .. }));
        assert_eq!(err.to_string(), "Could not create votes.csv.");
    }

    #[test]
    fn append_and_lookup() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempdir().unwrap();
        let path = dir.path().join("votes.csv");
        let mut store: CsvStore<VoteRecord> = CsvStore::new(&path);
        store.ensure_initialized().unwrap();
        assert!(!store.exists_with_key("1234").unwrap());
        store.append(&vote("1234", "Jane")).unwrap();
        store.append(&vote("0007", "John")).unwrap();
        assert!(store.exists_with_key("1234").unwrap());
        assert!(store.exists_with_key("0007").unwrap());
        assert!(!store.exists_with_key("7").unwrap());
        assert!(!store.exists_with_key("Jane").unwrap());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec!["voter_id,candidate", "1234,Jane", "0007,John"]
        );
        assert_eq!(
            store.records().unwrap(),
            vec![vote("1234", "Jane"), vote("0007", "John")]
        );
    }

    #[test]
    fn append_without_file_fails() {
        let dir = tempdir().unwrap();
        let mut store: CsvStore<VoteRecord> = CsvStore::new(dir.path().join("votes.csv"));
        let err = store.append(&vote("1234", "Jane")).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(err.to_string(), "Could not save to votes.csv.");
    }

    #[test]
    fn lookup_uses_header_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("votes.csv");
        fs::write(&path, "candidate,voter_id\nJane,1234\n").unwrap();
        let store: CsvStore<VoteRecord> = CsvStore::new(&path);
        assert!(store.exists_with_key("1234").unwrap());
        assert!(!store.exists_with_key("Jane").unwrap());
    }

    #[test]
    fn lookup_without_key_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("votes.csv");
        fs::write(&path, "id,name\n1234,Jane\n").unwrap();
        let store: CsvStore<VoteRecord> = CsvStore::new(&path);
        assert!(matches!(
            store.exists_with_key("1234"),
            Err(StoreError::MissingColumn { .. })
        ));
    }

    #[test]
    fn grade_rows_render_whole_scores_as_integers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        let mut store: CsvStore<GradeRecord> = CsvStore::new(&path);
        store.ensure_initialized().unwrap();
        let r = GradeRecord::new("Doe, Jane", &[Score(72.5), Score(80.0)]);
        store.append(&r).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec![
                "student_name,attempts,score1,score2,score3,score4,highest_score",
                "\"Doe, Jane\",2,72.5,80,0,0,80",
            ]
        );
        assert_eq!(store.records().unwrap(), vec![r]);
    }

    #[test]
    fn malformed_rows_are_located() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("votes.csv");
        fs::write(&path, "voter_id,candidate\n1234,Jane\n12,John\n").unwrap();
        let store: CsvStore<VoteRecord> = CsvStore::new(&path);
        match store.records() {
            Err(StoreError::MalformedRow { lineno, .. }) => assert_eq!(lineno, 3),
            x => panic!("unexpected result {:?}", x.map(|v| v.len())),
        }
    }

    #[test]
    fn grade_rows_with_impossible_attempts_are_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        fs::write(
            &path,
            "student_name,attempts,score1,score2,score3,score4,highest_score\n\
             Bo,1,50,0,0,0,50\n\
             Ana,9,1,2,3,4,4\n",
        )
        .unwrap();
        let store: CsvStore<GradeRecord> = CsvStore::new(&path);
        match store.records() {
            Err(StoreError::MalformedRow { lineno, .. }) => assert_eq!(lineno, 3),
            x => panic!("unexpected result {:?}", x.map(|v| v.len())),
        }
        fs::write(
            &path,
            "student_name,attempts,score1,score2,score3,score4,highest_score\n\
             Cy,0,0,0,0,0,0\n",
        )
        .unwrap();
        assert!(matches!(
            store.records(),
            Err(StoreError::MalformedRow { lineno: 2, .. })
        ));
    }

    #[test]
    fn memory_store_behaves_like_file() {
        let mut store: MemoryStore<VoteRecord> = MemoryStore::new();
        store.ensure_initialized().unwrap();
        store.ensure_initialized().unwrap();
        assert_eq!(store.rows().len(), 1);
        store.append(&vote("1234", "Jane")).unwrap();
        assert!(store.exists_with_key("1234").unwrap());
        assert!(!store.exists_with_key("voter_id").unwrap());
        assert_eq!(store.records().unwrap(), vec![vote("1234", "Jane")]);
    }
}
