//! Vimeo API client.
//!
//! [`VimeoClient`] is the only entry point; its operations are split across
//! submodules by concern (listing, transcripts, tags, metadata updates) but all
//! share one transport and one rate-limit window.

mod client;
mod rate_limit;
mod tags;
mod transcripts;
mod transport;
mod types;
mod update;

pub use client::{PageLimits, VimeoClient, DETAIL_FIELDS};
#[cfg(test)]
pub(crate) use client::testing;
pub use rate_limit::{RateLimitGuard, DEFAULT_RETRY_AFTER_SECS, MAX_RETRY_AFTER_SECS};
pub use tags::TagReplacement;
pub use transcripts::TEXT_VTT;
pub use transport::{ApiRequest, HttpTransport, Transport, TransportError, API_ACCEPT};
pub use types::{
    null_as_default, parse_video_id, ListVideosParams, Privacy, SortDirection, SortOrder, Video, VideoPrivacy,
    VideoStats, VideoUpdate,
};
pub use update::{FieldOutcome, UpdateReport, UpdateStrategy};
