//! Whole-set tag replacement.

use super::client::VimeoClient;
use super::transport::ApiRequest;
use super::types::parse_video_id;
use crate::error::{Result, VimeoError};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

/// Outcome of a completed tag replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagReplacement {
    pub removed: usize,
    pub added: usize,
    pub tags: Vec<String>,
}

impl VimeoClient {
    /// Replace every tag on a video with `tags`.
    ///
    /// Existing tags are deleted one at a time, then the new ones are created
    /// one at a time. This is not atomic: a failure part-way leaves the video
    /// with whatever was done so far, reported through
    /// [`VimeoError::TagsPartiallyApplied`].
    #[instrument(skip(self))]
    pub async fn set_tags(&self, video_id: &str, tags: &[String]) -> Result<TagReplacement> {
        let id = parse_video_id(video_id)?;
        let path = format!("/videos/{}/tags", id);

        let listing = self.api(ApiRequest::get(path.as_str())).await?;
        let existing = existing_tags(&listing);

        let partial = |removed: usize, added: usize, source: VimeoError| {
            VimeoError::TagsPartiallyApplied {
                removed,
                existing: existing.len(),
                added,
                requested: tags.len(),
                source: Box::new(source),
            }
        };

        let mut removed = 0;
        for tag in &existing {
            let request = ApiRequest::new(Method::DELETE, tag_path(&path, tag));
            if let Err(err) = self.api(request).await {
                return Err(partial(removed, 0, err));
            }
            removed += 1;
        }

        let mut added = 0;
        for tag in tags {
            let request = ApiRequest::new(Method::PUT, tag_path(&path, tag));
            if let Err(err) = self.api(request).await {
                return Err(partial(removed, added, err));
            }
            added += 1;
        }

        info!(removed, added, "Tags replaced");
        Ok(TagReplacement {
            removed,
            added,
            tags: tags.to_vec(),
        })
    }
}

fn tag_path(base: &str, tag: &str) -> String {
    format!("{}/{}", base, urlencoding::encode(tag))
}

/// Canonical tag values from a tag listing.
fn existing_tags(listing: &Value) -> Vec<String> {
    listing
        .get("data")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|t| t.get("tag").or_else(|| t.get("name")).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::super::client::testing::*;
    use super::super::transport::TransportError;
    use super::*;
    use serde_json::json;

    fn strings(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_deletes_then_creates_in_order() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({ "data": [{ "tag": "a", "name": "A" }, { "tag": "b" }] })),
            Ok(Value::Null),
            Ok(Value::Null),
            Ok(json!({ "tag": "c" })),
        ]);

        let report = client(&transport)
            .set_tags("1", &strings(&["c"]))
            .await
            .unwrap();

        assert_eq!(
            report,
            TagReplacement {
                removed: 2,
                added: 1,
                tags: strings(&["c"])
            }
        );
        assert_eq!(
            transport.calls(),
            vec![
                (Method::GET, "/videos/1/tags".to_string()),
                (Method::DELETE, "/videos/1/tags/a".to_string()),
                (Method::DELETE, "/videos/1/tags/b".to_string()),
                (Method::PUT, "/videos/1/tags/c".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_tags_are_percent_encoded() {
        let transport = ScriptedTransport::new(vec![Ok(json!({ "data": [] })), Ok(Value::Null)]);

        client(&transport)
            .set_tags("1", &strings(&["day 1/30"]))
            .await
            .unwrap();

        assert_eq!(transport.calls()[1].1, "/videos/1/tags/day%201%2F30");
    }

    #[tokio::test]
    async fn test_failure_reports_progress() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({ "data": [{ "tag": "a" }, { "tag": "b" }] })),
            Ok(Value::Null),
            Err(TransportError::status(500, "Something strange occurred.")),
        ]);

        let err = client(&transport)
            .set_tags("1", &strings(&["c", "d"]))
            .await
            .unwrap_err();

        match err {
            VimeoError::TagsPartiallyApplied {
                removed,
                existing,
                added,
                requested,
                source,
            } => {
                assert_eq!((removed, existing, added, requested), (1, 2, 0, 2));
                assert_eq!(source.status(), Some(500));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.calls().len(), 3);
    }
}
