use crate::forms::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FormCandidate {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormsConfig {
    #[serde(rename = "votesFile")]
    pub votes_file: Option<String>,
    #[serde(rename = "gradesFile")]
    pub grades_file: Option<String>,
    pub candidates: Option<Vec<FormCandidate>>,
}

/// The settings of a run, once the configuration file and the command line
/// have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FormSettings {
    pub votes_path: PathBuf,
    pub grades_path: PathBuf,
    pub candidates: Vec<Candidate>,
}

pub const DEFAULT_VOTES_FILE: &str = "votes.csv";
pub const DEFAULT_GRADES_FILE: &str = "grades.csv";

pub fn read_config(path: &str) -> FormsResult<FormsConfig> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: FormsConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Merges the configuration file (if any) with the command line.
///
/// Relative paths of the configuration file are resolved against its own
/// directory. A data directory on the command line takes precedence over the
/// paths of the file.
pub fn resolve_settings(
    config_path: Option<&str>,
    data_dir: Option<&str>,
    candidate_names: Option<&[String]>,
) -> FormsResult<FormSettings> {
    let (config, root): (FormsConfig, PathBuf) = match config_path {
        Some(p) => {
            let config = read_config(p)?;
            let root = Path::new(p)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => (FormsConfig::default(), PathBuf::new()),
    };
    info!("config: {:?}", config);

    let in_root = |file: &Option<String>, default: &str| -> PathBuf {
        match (data_dir, file) {
            (Some(d), _) => Path::new(d).join(default),
            (None, Some(f)) => root.join(f),
            (None, None) => root.join(default),
        }
    };
    let votes_path = in_root(&config.votes_file, DEFAULT_VOTES_FILE);
    let grades_path = in_root(&config.grades_file, DEFAULT_GRADES_FILE);

    let candidates: Vec<Candidate> = match (candidate_names, &config.candidates) {
        (Some(names), _) => names.iter().map(|n| Candidate::new(n.trim())).collect(),
        (None, Some(cs)) => cs
            .iter()
            .map(|c| Candidate {
                name: c.name.clone(),
                code: match c.code.clone() {
                    Some(x) if x.is_empty() => None,
                    x => x,
                },
            })
            .collect(),
        (None, None) => Candidate::default_list(),
    };
    if candidates.is_empty() || candidates.iter().any(|c| c.name.trim().is_empty()) {
        whatever!("The list of candidates must contain non-empty names")
    }

    Ok(FormSettings {
        votes_path,
        grades_path,
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let s = resolve_settings(None, None, None).unwrap();
        assert_eq!(s.votes_path, PathBuf::from("votes.csv"));
        assert_eq!(s.grades_path, PathBuf::from("grades.csv"));
        assert_eq!(s.candidates, Candidate::default_list());
    }

    #[test]
    fn config_paths_are_relative_to_the_file() {
        let dir = tempdir().unwrap();
        let config_p = dir.path().join("forms.json");
        fs::write(
            &config_p,
            r#"{"votesFile": "data/v.csv",
                "candidates": [{"name": "Alice", "code": "A"}, {"name": "Bob", "code": ""}]}"#,
        )
        .unwrap();
        let s = resolve_settings(config_p.to_str(), None, None).unwrap();
        assert_eq!(s.votes_path, dir.path().join("data/v.csv"));
        assert_eq!(s.grades_path, dir.path().join("grades.csv"));
        assert_eq!(
            s.candidates,
            vec![
                Candidate {
                    name: "Alice".to_string(),
                    code: Some("A".to_string())
                },
                Candidate::new("Bob")
            ]
        );
    }

    #[test]
    fn command_line_overrides() {
        let dir = tempdir().unwrap();
        let config_p = dir.path().join("forms.json");
        fs::write(&config_p, r#"{"votesFile": "v.csv", "gradesFile": "g.csv"}"#).unwrap();
        let names = vec!["Zoe".to_string()];
        let s = resolve_settings(config_p.to_str(), Some("/srv/class"), Some(names.as_slice())).unwrap();
        assert_eq!(s.votes_path, PathBuf::from("/srv/class/votes.csv"));
        assert_eq!(s.grades_path, PathBuf::from("/srv/class/grades.csv"));
        assert_eq!(s.candidates, vec![Candidate::new("Zoe")]);
    }

    #[test]
    fn bad_config() {
        let dir = tempdir().unwrap();
        let config_p = dir.path().join("forms.json");
        fs::write(&config_p, "{not json").unwrap();
        assert!(matches!(
            resolve_settings(config_p.to_str(), None, None),
            Err(FormsError::ParsingJson { .. })
        ));
        assert!(matches!(
            resolve_settings(Some("/nonexistent/forms.json"), None, None),
            Err(FormsError::OpeningConfig { .. })
        ));
        let empty: Vec<String> = vec![];
        assert!(resolve_settings(None, None, Some(empty.as_slice())).is_err());
    }
}
