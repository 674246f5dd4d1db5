//! Per-municipality summary of ledger entries.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use wahlscrape_ledger::LedgerRecord;

fn first_attempt() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"attempt[_\s-]*0").expect("valid regex"))
}

fn attempt_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^attempt[_\s-]*\d+").expect("valid regex"))
}

fn message_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^message\s*:\s*").expect("valid regex"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSummary {
    /// `started,attempt_0` when a first attempt was recorded.
    pub attempt: String,
    /// Last entry with the bookkeeping tokens removed.
    pub result: String,
}

/// Ledger bodies grouped by index, in file order.
pub fn group_entries(records: &[LedgerRecord]) -> HashMap<u32, Vec<String>> {
    let mut entries: HashMap<u32, Vec<String>> = HashMap::new();
    for record in records {
        entries
            .entry(record.index)
            .or_default()
            .push(record.body.clone());
    }
    entries
}

pub fn summarize_entries(entries: &[String]) -> LogSummary {
    let attempt = entries
        .iter()
        .any(|e| e.contains("started") && first_attempt().is_match(e))
        .then(|| "started,attempt_0".to_string())
        .unwrap_or_default();

    let result = entries
        .iter()
        .rev()
        .find_map(|entry| {
            let tokens: Vec<&str> = entry
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .filter(|t| {
                    let lower = t.to_lowercase();
                    lower != "started" && !attempt_token().is_match(&lower)
                })
                .collect();
            (!tokens.is_empty()).then(|| tokens.join(", "))
        })
        .map(|joined| message_prefix().replace(&joined, "").into_owned())
        .unwrap_or_default();

    LogSummary { attempt, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wahlscrape_ledger::parse_ledger;

    fn entries(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_success_after_retry() {
        let summary = summarize_entries(&entries(&[
            "started,attempt_0",
            "failed,attempt_0,[RowLocated] Timed out",
            "started,attempt_1",
            "success",
        ]));
        assert_eq!(summary.attempt, "started,attempt_0");
        assert_eq!(summary.result, "success");
    }

    #[test]
    fn test_last_entry_wins() {
        let summary = summarize_entries(&entries(&[
            "started,attempt_1",
            "failed,attempt_1,Message: element, not clickable",
            "exhausted,attempts_2",
        ]));
        assert_eq!(summary.attempt, "");
        // "attempts_2" is not an attempt_<n> token and stays.
        assert_eq!(summary.result, "exhausted, attempts_2");
    }

    #[test]
    fn test_failure_detail_rejoined() {
        let summary = summarize_entries(&entries(&["failed,attempt_1,element , not clickable"]));
        assert_eq!(summary.result, "failed, element, not clickable");
    }

    #[test]
    fn test_message_prefix_stripped() {
        let summary = summarize_entries(&entries(&["started,attempt_0", "Message: no such element"]));
        assert_eq!(summary.result, "no such element");
    }

    #[test]
    fn test_only_started_entries() {
        let summary = summarize_entries(&entries(&["started,attempt_0", "started, attempt_1"]));
        assert_eq!(summary.attempt, "started,attempt_0");
        assert_eq!(summary.result, "");
    }

    #[test]
    fn test_group_entries_continuation_aware() {
        let records = parse_ledger("5,started,attempt_0\ncontinuation text\n6,bayern_skip\n5,success\n");
        let grouped = group_entries(&records);
        assert_eq!(
            grouped[&5],
            vec!["started,attempt_0 continuation text".to_string(), "success".to_string()]
        );
        assert_eq!(grouped[&6], vec!["bayern_skip".to_string()]);
    }
}
