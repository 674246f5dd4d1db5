//! Result file lookup by municipality name.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::ReportError;
use crate::normalize::normalize_name;
use crate::similarity::close_match;

const RESULT_SUFFIX: &str = "_data_links.csv";

/// How a result file was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub file_name: String,
    pub kind: MatchKind,
}

/// Result files keyed by the normalized municipality part of their name.
#[derive(Debug, Default)]
pub struct DataLinksIndex {
    by_key: BTreeMap<String, Vec<String>>,
    cutoff: f64,
}

impl DataLinksIndex {
    pub fn from_file_names<I, S>(names: I, cutoff: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .filter(|n| n.ends_with(RESULT_SUFFIX))
            .collect();
        names.sort();

        let mut by_key: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in names {
            let key = normalize_name(&name[..name.len() - RESULT_SUFFIX.len()]);
            by_key.entry(key).or_default().push(name);
        }
        Self { by_key, cutoff }
    }

    /// Index the result files in `dir`; a missing directory is an empty index.
    pub fn from_dir(dir: &Path, cutoff: f64) -> Result<Self, ReportError> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No result directory at {:?}", dir);
                return Ok(Self {
                    cutoff,
                    ..Default::default()
                });
            }
            Err(e) => return Err(ReportError::io(dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReportError::io(dir, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(Self::from_file_names(names, cutoff))
    }

    pub fn len(&self) -> usize {
        self.by_key.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Exact key, else the closest containing or contained key, else the most
    /// similar key above the cutoff.
    pub fn lookup(&self, name: &str) -> Option<LinkMatch> {
        let norm = normalize_name(name);

        let first = |key: &str, kind: MatchKind| {
            self.by_key.get(key).and_then(|files| files.first()).map(|f| LinkMatch {
                file_name: f.clone(),
                kind,
            })
        };

        if self.by_key.contains_key(&norm) {
            return first(norm.as_str(), MatchKind::Exact);
        }

        let substring = self
            .by_key
            .keys()
            .filter(|k| k.contains(norm.as_str()) || norm.contains(k.as_str()))
            .min_by_key(|k| (k.len().abs_diff(norm.len()), k.len()));
        if let Some(key) = substring {
            return first(key.as_str(), MatchKind::Substring);
        }

        close_match(&norm, self.by_key.keys().map(String::as_str), self.cutoff)
            .and_then(|key| first(key, MatchKind::Fuzzy))
    }
}
