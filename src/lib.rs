//! Monthly Playlist Generator Library
//!
//! This library builds a ranked playlist from a user's ListenBrainz listening
//! history for one calendar month. It walks the newest-first listens endpoint
//! with a timestamp cursor until the month is covered, tallies plays per
//! recording and renders the ranking as a JSPF playlist document.
//!
//! # Modules
//!
//! - `cli` - Command implementations invoked by the binary
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by every layer
//! - `listenbrainz` - ListenBrainz listens endpoint client
//! - `management` - Tally, pagination state machine and playlist builder
//! - `types` - Wire formats and table rows
//! - `utils` - Month resolution and small helpers
//!
//! # Example
//!
//! ```
//! use monthplgen::{cli, config};
//!
//! #[tokio::main]
//! async fn main() -> monthplgen::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod listenbrainz;
pub mod management;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Shorthand for [`error::Result`], kept at the crate root so callers can
/// write `monthplgen::Res<T>`.
pub type Res<T> = error::Result<T>;

/// Prints an informational message with a blue bullet point.
///
/// Every status macro writes to stderr, stdout is reserved for the
/// playlist document.
///
/// # Example
///
/// ```
/// info!("Fetching listens for {}", user);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Collected {} listens", total);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing. Only the
/// command layer uses it, library code returns [`error::Error`] instead.
///
/// # Example
///
/// ```
/// error!("Missing ListenBrainz username");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Page reports count {} but holds {} listens", count, len);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line when verbose output is enabled.
///
/// Used for request URLs, rate-limit headers and page boundaries. Silent
/// unless [`config::set_verbose`] was called with `true`.
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::is_verbose() {
      use colored::Colorize;
      eprintln!("[{}] {}", "·".dimmed(), std::format_args!($($arg)*));
    }
  })
}
