use std::collections::{HashMap, HashSet};

use crate::types::{ListenEvent, Page, RankedTrack};

/// Exact play counts per recording MBID for one run.
///
/// Keys are never empty. Listens without a mapped recording are skipped
/// because they cannot become playlist entries. A folded listen is counted
/// at most once, keyed by its timestamp and recording, so a listen delivered
/// again on the next page is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTally {
    counts: HashMap<String, u64>,
    folded: HashSet<(i64, String)>,
}

impl TrackTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one play of `recording_id`. Returns `false` and leaves the tally
    /// untouched for an empty id.
    pub fn record(&mut self, recording_id: &str) -> bool {
        if recording_id.is_empty() {
            return false;
        }
        *self.counts.entry(recording_id.to_string()).or_insert(0) += 1;
        true
    }

    /// Counts every mapped listen on `page` not folded before and returns
    /// how many were counted.
    pub fn fold(&mut self, page: &Page) -> usize {
        self.fold_where(page, |_| true)
    }

    /// Like [`fold`](Self::fold) but only considers listens accepted by `keep`.
    pub fn fold_where<F>(&mut self, page: &Page, keep: F) -> usize
    where
        F: Fn(&ListenEvent) -> bool,
    {
        let mut counted = 0;
        for listen in page.listens().iter().filter(|l| keep(l)) {
            let Some(recording_id) = listen.recording_id() else {
                continue;
            };
            if !self
                .folded
                .insert((listen.listened_at(), recording_id.to_string()))
            {
                continue;
            }
            if self.record(recording_id) {
                counted += 1;
            }
        }
        counted
    }

    pub fn get(&self, recording_id: &str) -> u64 {
        self.counts.get(recording_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, recording_id: &str) -> bool {
        self.counts.contains_key(recording_id)
    }

    /// Number of distinct recordings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Recordings ordered by descending count, ties by ascending MBID.
    pub fn rank(&self) -> Vec<RankedTrack> {
        let mut ranked: Vec<RankedTrack> = self
            .counts
            .iter()
            .map(|(id, count)| RankedTrack {
                recording_id: id.clone(),
                count: *count,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.recording_id.cmp(&b.recording_id))
        });
        ranked
    }
}
