use std::{future::Future, path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;
use tokio::io::AsyncWriteExt;

use crate::{
    config, error,
    error::{Error, Result},
    info,
    listenbrainz::{ListenClient, ListenSource},
    management::{self, CollectOptions, Collected, HistoryCollector, PlaylistBuilder},
    success,
    types::JspfDocument,
    utils::{self, MonthRange},
    warning,
};

/// Flag values for one `generate` run, before environment overrides.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub month: Option<String>,
    pub user: Option<String>,
    pub timezone: Option<String>,
    pub api_url: Option<String>,
    pub delay_ms: Option<u64>,
    pub output: Option<PathBuf>,
    pub limit: Option<usize>,
    pub summary: bool,
    pub full_last_day: bool,
    pub strict_window: bool,
    pub verbose: bool,
}

/// Effective settings after merging environment, flags and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub month: String,
    pub user: String,
    pub timezone: String,
    pub api_url: String,
    pub delay: Duration,
}

impl Settings {
    /// Applies the environment-over-flag precedence to every input.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingUsername`](crate::error::Error::MissingUsername) without a user
    /// - [`Error::UnknownTimezone`](crate::error::Error::UnknownTimezone) when the
    ///   current month is needed and the timezone does not resolve
    /// - [`Error::Config`](crate::error::Error::Config) for a malformed delay
    pub fn resolve(opts: &GenerateOptions) -> Result<Self> {
        let user = config::username(opts.user.clone())?;
        let timezone = config::timezone(opts.timezone.clone());
        let month = match config::target_month(opts.month.clone()) {
            Some(month) => month,
            None => utils::current_month_label(&timezone)?,
        };

        Ok(Self {
            month,
            user,
            timezone,
            api_url: config::api_url(opts.api_url.clone()),
            delay: config::request_delay(opts.delay_ms)?,
        })
    }
}

/// Fetches the month's listens from `source` and builds the ranked playlist.
///
/// Nothing is returned unless the whole month was fetched. `shutdown`
/// cancels the walk with [`Error::Cancelled`](crate::error::Error::Cancelled).
pub async fn monthly_playlist<S, F>(
    source: &S,
    user: &str,
    range: &MonthRange,
    options: CollectOptions,
    limit: Option<usize>,
    progress: ProgressBar,
    shutdown: F,
) -> Result<(JspfDocument, Collected)>
where
    S: ListenSource,
    F: Future<Output = ()>,
{
    let collected = HistoryCollector::new(source, user, range, options)
        .with_progress(progress)
        .collect_until(shutdown)
        .await?;

    let ranked = collected.tally.rank();
    let document = PlaylistBuilder::new(range.label.clone())
        .limit(limit)
        .build(&ranked);

    Ok((document, collected))
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    match ProgressStyle::with_template("{spinner:.blue} {msg}") {
        Ok(style) => pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")),
        Err(e) => warning!("Progress style unavailable: {}", e),
    }
    pb
}

async fn write_output(output: Option<&PathBuf>, json: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                async_fs::create_dir_all(parent).await?;
            }
            async_fs::write(path, json).await?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(json.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

async fn run(opts: GenerateOptions) -> Result<()> {
    config::set_verbose(opts.verbose || config::verbose_from_env());

    let settings = Settings::resolve(&opts)?;
    let range = utils::resolve_month(&settings.month, &settings.timezone)?;
    let client = ListenClient::new(&settings.api_url, settings.delay)?;

    info!(
        "Collecting listens of {} for {} ({} to {})",
        settings.user,
        range.label,
        range.start.to_rfc3339(),
        if opts.full_last_day {
            range.next_start.to_rfc3339()
        } else {
            range.end.to_rfc3339()
        }
    );

    let options = CollectOptions {
        full_last_day: opts.full_last_day,
        strict_window: opts.strict_window,
    };
    let (document, collected) = monthly_playlist(
        &client,
        &settings.user,
        &range,
        options,
        opts.limit,
        spinner(),
        ctrl_c(),
    )
    .await?;

    success!(
        "Counted {} listens of {} recordings over {} requests",
        collected.counted,
        collected.tally.len(),
        collected.requests
    );
    if collected.tally.is_empty() {
        warning!("No mapped listens found for {}", range.label);
    }

    if opts.summary {
        let ranked = collected.tally.rank();
        let shown = opts.limit.unwrap_or(ranked.len()).min(ranked.len());
        eprintln!("{}", Table::new(management::table_rows(&ranked[..shown])));
    }

    let json = management::render(&document)?;
    write_output(opts.output.as_ref(), &json).await?;

    if let Some(path) = &opts.output {
        success!(
            "Playlist {} with {} tracks written to {}",
            document.playlist.title,
            document.playlist.track.len(),
            path.display()
        );
    }

    Ok(())
}

pub async fn generate(opts: GenerateOptions) {
    if let Err(e) = run(opts).await {
        error!("{}", failure_message(&e));
    }
}

/// What the user sees when a run fails, whatever the error kind.
pub fn failure_message(err: &Error) -> String {
    format!("{}\nNo playlist was written.", err)
}
