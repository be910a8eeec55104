//! # CLI Module
//!
//! Command implementations behind the `monthplgen` binary. Each command
//! resolves its configuration, drives the lower layers and reports progress
//! through the status macros. Fatal errors end the process through
//! [`error!`](crate::error!) with exit status 1.
//!
//! ## Commands
//!
//! - [`generate`] - Collects a month of listens and writes the ranked playlist
//!
//! ## Layers
//!
//! ```text
//! CLI Layer (settings, progress, output)
//!     ↓
//! Management Layer (pagination state machine, tally, playlist)
//!     ↓
//! API Layer (ListenBrainz listens endpoint)
//! ```
//!
//! ## Usage
//!
//! ```bash
//! monthplgen generate --user rob --month 2024-02
//! PLGEN_LB_USERNAME=rob monthplgen generate --timezone Europe/Berlin --summary
//! monthplgen generate --user rob --output playlists/2024-02.jspf --limit 50
//! ```

mod generate;

pub use generate::GenerateOptions;
pub use generate::Settings;
pub use generate::failure_message;
pub use generate::generate;
pub use generate::monthly_playlist;
