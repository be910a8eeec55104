use std::future::Future;

use indicatif::ProgressBar;

use crate::{
    debug,
    error::{Error, Result},
    listenbrainz::ListenSource,
    management::TrackTally,
    utils::MonthRange,
    warning,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectOptions {
    /// Seed the cursor with the next month's first midnight instead of the
    /// last day's midnight.
    pub full_last_day: bool,
    /// Only count listens between the month start and the cursor seed.
    pub strict_window: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Fetching { cursor: i64 },
    Done,
    Failed,
}

/// What a finished collection hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    pub tally: TrackTally,
    pub requests: usize,
    pub pages: usize,
    pub counted: usize,
}

/// Walks the newest-first listens endpoint back to the start of a month.
///
/// Owns the tally for the whole run. Every page is folded before the next
/// request is issued. A listen is counted at most once, keyed by its
/// timestamp and recording, so boundary listens returned again on the next
/// page do not inflate the counts.
pub struct HistoryCollector<'a, S: ListenSource> {
    source: &'a S,
    user: String,
    start: i64,
    seed: i64,
    options: CollectOptions,
    state: FetchState,
    tally: TrackTally,
    requests: usize,
    pages: usize,
    counted: usize,
    progress: ProgressBar,
}

impl<'a, S: ListenSource> HistoryCollector<'a, S> {
    pub fn new(source: &'a S, user: &str, range: &MonthRange, options: CollectOptions) -> Self {
        let seed = range.cursor_seed(options.full_last_day);
        Self {
            source,
            user: user.to_string(),
            start: range.start_ts(),
            seed,
            options,
            state: FetchState::Fetching { cursor: seed },
            tally: TrackTally::new(),
            requests: 0,
            pages: 0,
            counted: 0,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports each fetched page on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn tally(&self) -> &TrackTally {
        &self.tally
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Runs one fetch iteration.
    ///
    /// An empty page ends the walk. So does a page whose oldest listen lies at
    /// or before the month start. Otherwise the cursor moves to that oldest
    /// listen, or one second below the current cursor when the page did not
    /// move it at all.
    ///
    /// # Errors
    ///
    /// Any fetch or decode error moves the collector to
    /// [`FetchState::Failed`] and is returned unchanged.
    pub async fn step(&mut self) -> Result<FetchState> {
        let cursor = match self.state {
            FetchState::Fetching { cursor } => cursor,
            FetchState::Done => return Ok(FetchState::Done),
            FetchState::Failed => return Err(Error::CollectionFailed),
        };

        self.requests += 1;
        self.progress.set_message(format!(
            "Fetching page {} (max_ts={})...",
            self.requests, cursor
        ));

        let page = match self.source.fetch_page(&self.user, cursor).await {
            Ok(page) => page,
            Err(e) => {
                self.state = FetchState::Failed;
                return Err(e);
            }
        };

        let Some(oldest) = page.oldest().map(|l| l.listened_at()) else {
            debug!("{}-{}: empty page, done", self.start, cursor);
            self.state = FetchState::Done;
            return Ok(self.state);
        };

        if page.reported_count() != page.len() {
            warning!(
                "Page reports count {} but holds {} listens",
                page.reported_count(),
                page.len()
            );
        }

        self.pages += 1;
        let (start, seed, strict) = (self.start, self.seed, self.options.strict_window);
        self.counted += self.tally.fold_where(&page, |listen| {
            !strict || (start..=seed).contains(&listen.listened_at())
        });
        debug!("{}-{}: {} listens", self.start, cursor, page.len());
        debug!("{} <= {}", oldest, self.start);

        self.state = if oldest <= self.start {
            FetchState::Done
        } else if oldest >= cursor {
            warning!(
                "Page did not move the cursor below {}, continuing at {}",
                cursor,
                cursor - 1
            );
            FetchState::Fetching { cursor: cursor - 1 }
        } else {
            FetchState::Fetching { cursor: oldest }
        };

        Ok(self.state)
    }

    /// Fetches until the month is covered and returns the tally.
    pub async fn collect(self) -> Result<Collected> {
        self.collect_until(std::future::pending::<()>()).await
    }

    /// Like [`collect`](Self::collect) but gives up with [`Error::Cancelled`]
    /// as soon as `shutdown` completes. An in-flight request is dropped.
    pub async fn collect_until<F>(mut self, shutdown: F) -> Result<Collected>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        while let FetchState::Fetching { .. } = self.state {
            let stepped = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                result = self.step() => Some(result),
            };

            match stepped {
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.progress.finish_and_clear();
                    return Err(e);
                }
                None => {
                    self.state = FetchState::Failed;
                    self.progress.finish_and_clear();
                    return Err(Error::Cancelled);
                }
            }
        }

        self.progress.finish_and_clear();
        if self.state == FetchState::Failed {
            return Err(Error::CollectionFailed);
        }
        Ok(Collected {
            tally: self.tally,
            requests: self.requests,
            pages: self.pages,
            counted: self.counted,
        })
    }
}
