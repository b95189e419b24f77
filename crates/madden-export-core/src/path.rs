//! URL path classification
//!
//! The companion app posts to nested paths under the export endpoint:
//! - `/export/{platform}/{leagueId}/week/{seasonType}/{weekNumber}/{dataType}` (weekly data)
//! - `/export/{platform}/{leagueId}/{exportType}` (league data like leagueteams, standings)
//!
//! Segments are consumed left to right by a small state machine. Each field is
//! set only when its segment exists; parsing stops at the first missing one.

/// First segment every classifiable path starts with
pub const EXPORT_ROOT: &str = "export";

/// Marker segment that switches to weekly parsing
pub const WEEK_MARKER: &str = "week";

/// Metadata extracted from an export request path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMetadata {
    pub platform: String,
    pub league_id: String,
    pub export_type: String,
    pub season_type: String,
    pub week_number: String,
    pub data_type: String,
}

impl PathMetadata {
    /// True when the path was weekly data (`.../week/...`)
    pub fn is_weekly(&self) -> bool {
        self.export_type == WEEK_MARKER
    }

    /// True when no field was extracted
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Segments consumed so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Root,
    Export,
    HasPlatform,
    HasLeague,
    WeekMode,
    HasSeason,
    HasWeek,
    Done,
}

/// Classify a request path into [`PathMetadata`].
///
/// Total over all inputs: short or foreign paths yield partially or fully
/// empty metadata. Leading, trailing and repeated slashes are ignored.
pub fn classify(path: &str) -> PathMetadata {
    let mut metadata = PathMetadata::default();
    let mut state = ParseState::Root;

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        state = match state {
            ParseState::Root if segment == EXPORT_ROOT => ParseState::Export,
            ParseState::Root | ParseState::Done => break,
            ParseState::Export => {
                metadata.platform = segment.to_string();
                ParseState::HasPlatform
            }
            ParseState::HasPlatform => {
                metadata.league_id = segment.to_string();
                ParseState::HasLeague
            }
            ParseState::HasLeague if segment == WEEK_MARKER => {
                metadata.export_type = WEEK_MARKER.to_string();
                ParseState::WeekMode
            }
            ParseState::HasLeague => {
                metadata.export_type = segment.to_string();
                ParseState::Done
            }
            ParseState::WeekMode => {
                metadata.season_type = segment.to_string();
                ParseState::HasSeason
            }
            ParseState::HasSeason => {
                metadata.week_number = segment.to_string();
                ParseState::HasWeek
            }
            ParseState::HasWeek => {
                metadata.data_type = segment.to_string();
                ParseState::Done
            }
        };
    }

    metadata
}
