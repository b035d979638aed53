//! Summary statistics of a dispatch run.
//!
//! A [`Report`] is built once from the outcomes of every send and the events
//! that were sent. Its [`Display`](fmt::Display) rendering is what the binary
//! prints at the end of a run.

use std::{collections::BTreeMap, fmt};

use cdp_loadgen_payload::{EventType, ProfileEvent};
use rustc_hash::FxHashMap;

use crate::dispatch::Outcome;

/// Number of merge candidates listed by a report.
pub const TOP_IDENTITIES: usize = 10;
/// Number of failed outcomes listed by a report.
pub const LISTED_FAILURES: usize = 10;
const IDCARD_PREFIX_CHARS: usize = 10;
const RULE_WIDTH: usize = 60;

/// Counts derived from one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Number of outcomes
    pub total: usize,
    /// Outcomes with status 200 or 201
    pub succeeded: usize,
    /// All other outcomes
    pub failed: usize,
    /// Outcome count per status code, 0 meaning no response
    pub status_codes: BTreeMap<u16, usize>,
    /// Event count per type, most frequent first
    pub event_types: Vec<(EventType, usize)>,
    /// Number of distinct identity keys across the events
    pub unique_identities: usize,
    /// Identity keys carried by more than one event
    pub merge_candidates: usize,
    /// Number of events whose identity key is a merge candidate
    pub merge_total: usize,
    /// The most frequent merge candidates with their event counts
    pub top_identities: Vec<(String, usize)>,
    /// The first failed outcomes, in outcome order
    pub failures: Vec<Outcome>,
}

impl Report {
    /// Summarize `outcomes` and the `events` they were produced from.
    #[must_use]
    pub fn summarize(outcomes: &[Outcome], events: &[ProfileEvent]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();

        let mut status_codes = BTreeMap::new();
        for outcome in outcomes {
            *status_codes.entry(outcome.status_code).or_insert(0) += 1;
        }

        let mut types: BTreeMap<EventType, usize> = BTreeMap::new();
        let mut identities: FxHashMap<&str, usize> = FxHashMap::default();
        for event in events {
            *types.entry(event.kind).or_insert(0) += 1;
            *identities.entry(event.idcard()).or_insert(0) += 1;
        }

        let mut event_types: Vec<(EventType, usize)> = types.into_iter().collect();
        event_types.sort_by(|(a_kind, a), (b_kind, b)| {
            b.cmp(a).then_with(|| a_kind.as_str().cmp(b_kind.as_str()))
        });

        let mut duplicated: Vec<(&str, usize)> = identities
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(idcard, count)| (*idcard, *count))
            .collect();
        duplicated.sort_unstable_by(|(a_id, a), (b_id, b)| b.cmp(a).then_with(|| a_id.cmp(b_id)));

        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            status_codes,
            event_types,
            unique_identities: identities.len(),
            merge_candidates: duplicated.len(),
            merge_total: duplicated.iter().map(|(_, count)| count).sum(),
            top_identities: duplicated
                .iter()
                .take(TOP_IDENTITIES)
                .map(|(idcard, count)| ((*idcard).to_string(), *count))
                .collect(),
            failures: outcomes
                .iter()
                .filter(|o| !o.success)
                .take(LISTED_FAILURES)
                .cloned()
                .collect(),
        }
    }

    /// Percentage of outcomes that succeeded, 0 for an empty run.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        percentage(self.succeeded, self.total)
    }

    /// Percentage of outcomes that failed, 0 for an empty run.
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        percentage(self.failed, self.total)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "STATISTICS REPORT")?;
        writeln!(f, "{rule}")?;

        writeln!(f)?;
        writeln!(
            f,
            "SUCCESS: {}/{} ({:.1}%)",
            self.succeeded,
            self.total,
            self.success_rate()
        )?;
        writeln!(
            f,
            "FAILED:  {}/{} ({:.1}%)",
            self.failed,
            self.total,
            self.failure_rate()
        )?;

        writeln!(f)?;
        writeln!(f, "Status Codes:")?;
        for (code, count) in &self.status_codes {
            writeln!(f, "   {code}: {count} requests")?;
        }

        writeln!(f)?;
        writeln!(f, "Event Types:")?;
        for (kind, count) in &self.event_types {
            writeln!(f, "   {kind}: {count} events")?;
        }

        writeln!(f)?;
        writeln!(f, "Merge Information:")?;
        writeln!(f, "   Unique IDCards: {}", self.unique_identities)?;
        writeln!(f, "   IDCards with duplicates: {}", self.merge_candidates)?;
        writeln!(f, "   Total events that will merge: {}", self.merge_total)?;

        if !self.top_identities.is_empty() {
            writeln!(f)?;
            writeln!(f, "Top {TOP_IDENTITIES} IDCards with most events:")?;
            for (idcard, count) in &self.top_identities {
                writeln!(f, "   {idcard}: {count} events")?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failed Requests (showing first {LISTED_FAILURES}):")?;
            for outcome in &self.failures {
                let prefix: String = outcome.idcard.chars().take(IDCARD_PREFIX_CHARS).collect();
                writeln!(
                    f,
                    "   #{} - IDCard: {prefix}... - Error: {}",
                    outcome.index,
                    outcome.detail()
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{rule}")
    }
}
