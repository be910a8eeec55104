use crate::{
    error::{Error, Result},
    types::{JspfDocument, Playlist, PlaylistTrack, RankedTableRow, RankedTrack},
    utils,
};

/// Turns a ranking into the JSPF playlist document.
pub struct PlaylistBuilder {
    title: String,
    limit: Option<usize>,
}

impl PlaylistBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            limit: None,
        }
    }

    /// Keep only the first `limit` ranked tracks.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// One track per ranked recording, in rank order.
    pub fn build(&self, ranked: &[RankedTrack]) -> JspfDocument {
        let take = self.limit.unwrap_or(ranked.len());
        let track = ranked
            .iter()
            .take(take)
            .map(|r| PlaylistTrack {
                identifier: utils::recording_uri(&r.recording_id),
            })
            .collect();

        JspfDocument {
            playlist: Playlist {
                title: self.title.clone(),
                track,
            },
        }
    }
}

/// Serializes the document as a single JSON line terminated by a newline.
pub fn render(document: &JspfDocument) -> Result<String> {
    let mut json = serde_json::to_string(document).map_err(Error::Encode)?;
    json.push('\n');
    Ok(json)
}

pub fn table_rows(ranked: &[RankedTrack]) -> Vec<RankedTableRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, r)| RankedTableRow {
            rank: i + 1,
            plays: r.count,
            recording: r.recording_id.clone(),
        })
        .collect()
}
