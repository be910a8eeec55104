use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Top-level body of `GET /1/user/{user}/listens`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListensResponse {
    pub payload: Page,
}

/// One page of listens, newest first.
///
/// `count` comes from the service and is not trusted, use [`Page::len`].
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    count: usize,
    listens: Vec<ListenEvent>,
}

impl Page {
    pub fn reported_count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.listens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listens.is_empty()
    }

    pub fn listens(&self) -> &[ListenEvent] {
        &self.listens
    }

    /// The last listen in delivery order, which is the oldest one.
    pub fn oldest(&self) -> Option<&ListenEvent> {
        self.listens.last()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListenEvent {
    listened_at: i64,
    #[serde(default)]
    track_metadata: TrackMetadata,
}

impl ListenEvent {
    pub fn listened_at(&self) -> i64 {
        self.listened_at
    }

    /// The mapped recording MBID. Empty or missing mappings yield `None`.
    pub fn recording_id(&self) -> Option<&str> {
        self.track_metadata
            .mbid_mapping
            .as_ref()
            .and_then(|m| m.recording_mbid.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TrackMetadata {
    #[serde(default)]
    mbid_mapping: Option<MbidMapping>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MbidMapping {
    #[serde(default)]
    recording_mbid: Option<String>,
}

/// A recording and how often it was played during the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTrack {
    pub recording_id: String,
    pub count: u64,
}

/// JSPF-flavored document written as the final output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JspfDocument {
    pub playlist: Playlist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub title: String,
    pub track: Vec<PlaylistTrack>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub identifier: String,
}

#[derive(Tabled)]
pub struct RankedTableRow {
    pub rank: usize,
    pub plays: u64,
    pub recording: String,
}
