//! Response shaping for token-constrained consumers.
//!
//! Vimeo video objects are large; an unfiltered page of them easily runs to tens
//! of thousands of tokens. Every listing goes through [`shape`] with one
//! [`ResponseMode`] before it is handed back to the assistant.

mod fields;

pub use fields::{extract_fields, sanitize_full, DROPPED_CONNECTIONS, KEPT_PICTURE_WIDTHS};

use serde_json::{Map, Value};

/// Fields returned in minimal mode.
pub const MINIMAL_FIELDS: [&str; 5] = ["uri", "name", "duration", "created_time", "privacy.view"];

/// Fields returned in compact mode.
pub const COMPACT_FIELDS: [&str; 10] = [
    "uri",
    "name",
    "description",
    "duration",
    "created_time",
    "modified_time",
    "privacy.view",
    "privacy.embed",
    "stats.plays",
    "tags",
];

/// Field-reduction policy applied to a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMode {
    Minimal,
    Compact,
    Full,
    Custom(Vec<String>),
}

impl ResponseMode {
    /// Pick the mode for a request. Supplied custom fields override everything else.
    pub fn select(base: ResponseMode, custom_fields: Option<Vec<String>>) -> Self {
        match custom_fields {
            Some(fields) => ResponseMode::Custom(fields),
            None => base,
        }
    }

    /// Name reported in the `_meta` block.
    pub fn name(&self) -> &'static str {
        match self {
            ResponseMode::Minimal => "minimal",
            ResponseMode::Compact => "compact",
            ResponseMode::Full => "full",
            ResponseMode::Custom(_) => "custom",
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reduce one resource according to `mode`. The input is never modified.
pub fn shape(resource: &Value, mode: &ResponseMode) -> Value {
    match mode {
        ResponseMode::Minimal => extract_fields(resource, &MINIMAL_FIELDS),
        ResponseMode::Compact => extract_fields(resource, &COMPACT_FIELDS),
        ResponseMode::Full => sanitize_full(resource),
        ResponseMode::Custom(fields) => extract_fields(resource, fields.as_slice()),
    }
}

/// Rough token count: a quarter of the serialised UTF-8 length, rounded up.
///
/// Only a monitoring signal; nothing is ever truncated on the strength of it.
pub fn estimate_tokens(value: &Value) -> usize {
    let len = serde_json::to_string(value).map(|s| s.len()).unwrap_or(0);
    len.div_ceil(4)
}

/// Shape every item of a paginated list and attach the advisory `_meta` block.
///
/// The caller is responsible for clamping the page size; `requested_per_page`
/// and `max_per_page` only decide whether a warning is reported.
pub fn shape_list(
    mut page: Value,
    mode: &ResponseMode,
    requested_per_page: Option<u32>,
    max_per_page: u32,
) -> Value {
    if let Some(items) = page.get_mut("data").and_then(Value::as_array_mut) {
        for item in items.iter_mut() {
            *item = shape(item, mode);
        }
    }

    let estimated = estimate_tokens(&page);

    if let Value::Object(map) = &mut page {
        let meta = map
            .entry("_meta")
            .or_insert_with(|| Value::Object(Map::new()));
        if !meta.is_object() {
            *meta = Value::Object(Map::new());
        }
        if let Value::Object(meta) = meta {
            meta.insert("estimated_tokens".to_string(), Value::from(estimated));
            meta.insert("response_mode".to_string(), Value::from(mode.name()));
            if requested_per_page.is_some_and(|n| n > max_per_page) {
                meta.insert(
                    "page_size_warning".to_string(),
                    Value::from(format!(
                        "Page size reduced to {} to prevent token overflow",
                        max_per_page
                    )),
                );
            }
        }
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn sample_video() -> Value {
        json!({
            "uri": "/videos/1",
            "name": "Day 12",
            "description": "Working session",
            "duration": 3600,
            "created_time": "2024-05-01T10:00:00+00:00",
            "modified_time": "2024-05-02T10:00:00+00:00",
            "privacy": { "view": "anybody", "embed": "public", "comments": "anybody" },
            "stats": { "plays": 42 },
            "tags": [{ "name": "rust", "tag": "rust" }],
            "link": "https://vimeo.com/1",
            "pictures": { "sizes": [{ "width": 200, "height": 150, "link": "x" }] },
            "user": { "name": "someone" }
        })
    }

    fn keys(value: &Value) -> BTreeSet<String> {
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_minimal_keys() {
        let out = shape(&sample_video(), &ResponseMode::Minimal);
        let expected: BTreeSet<String> = ["uri", "name", "duration", "created_time", "privacy"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys(&out), expected);
        assert_eq!(out["privacy"], json!({ "view": "anybody" }));
    }

    #[test]
    fn test_compact_keys() {
        let out = shape(&sample_video(), &ResponseMode::Compact);
        let expected: BTreeSet<String> = [
            "uri", "name", "description", "duration", "created_time",
            "modified_time", "privacy", "stats", "tags",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(keys(&out), expected);
        assert_eq!(out["privacy"], json!({ "view": "anybody", "embed": "public" }));
        assert_eq!(out["stats"], json!({ "plays": 42 }));
        assert!(out.get("link").is_none());
    }

    #[test]
    fn test_custom_overrides_mode() {
        let mode = ResponseMode::select(ResponseMode::Compact, Some(vec!["link".to_string()]));
        assert_eq!(mode.name(), "custom");
        assert_eq!(shape(&sample_video(), &mode), json!({ "link": "https://vimeo.com/1" }));

        let mode = ResponseMode::select(ResponseMode::Compact, None);
        assert_eq!(mode, ResponseMode::Compact);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(&json!({})), 1); // "{}"
        assert_eq!(estimate_tokens(&json!({"a":1})), 2); // {"a":1} = 7 bytes
        assert_eq!(estimate_tokens(&json!("ab")), 1); // "ab" = 4 bytes
        // Multi-byte characters count by bytes, not chars.
        assert_eq!(estimate_tokens(&json!("é")), 1); // 4 bytes
        assert_eq!(estimate_tokens(&json!("éé")), 2); // 6 bytes
    }

    #[test]
    fn test_shape_list_meta() {
        let page = json!({
            "total": 1,
            "page": 1,
            "data": [sample_video()],
            "_meta": { "source": "api" }
        });

        let out = shape_list(page, &ResponseMode::Minimal, Some(50), 20);
        let meta = &out["_meta"];
        assert_eq!(meta["response_mode"], "minimal");
        assert_eq!(meta["source"], "api");
        assert_eq!(
            meta["page_size_warning"],
            "Page size reduced to 20 to prevent token overflow"
        );
        assert!(meta["estimated_tokens"].as_u64().unwrap() > 0);
        assert!(out["data"][0].get("description").is_none());
    }

    #[test]
    fn test_shape_list_without_warning() {
        let page = json!({ "data": [] });
        let out = shape_list(page, &ResponseMode::Compact, Some(10), 15);
        assert!(out["_meta"].get("page_size_warning").is_none());

        let out = shape_list(json!({ "data": [] }), &ResponseMode::Compact, None, 15);
        assert!(out["_meta"].get("page_size_warning").is_none());
    }
}
