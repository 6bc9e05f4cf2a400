//! Dot-path field extraction and full-response sanitising.

use serde_json::{Map, Value};

/// Picture widths kept in full mode.
pub const KEPT_PICTURE_WIDTHS: [u64; 3] = [200, 640, 1280];

/// Connection subtrees dropped in full mode.
pub const DROPPED_CONNECTIONS: [&str; 5] = ["comments", "likes", "pictures", "texttracks", "chapters"];

/// Copy exactly the given dot-separated paths out of `source`.
///
/// A path whose segments are not all present is skipped entirely, so the result
/// never holds a half-built nested object for it.
pub fn extract_fields<S: AsRef<str>>(source: &Value, paths: &[S]) -> Value {
    let mut result = Map::new();

    for path in paths {
        let segments: Vec<&str> = path.as_ref().split('.').collect();
        let Some(value) = lookup(source, &segments) else {
            continue;
        };
        insert(&mut result, &segments, value.clone());
    }

    Value::Object(result)
}

fn lookup<'a>(source: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(source, |current, segment| current.as_object()?.get(*segment))
}

fn insert(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just made an object"),
        };
    }
    current.insert(last.to_string(), value);
}

/// The whole resource minus the high-volume subtrees.
pub fn sanitize_full(video: &Value) -> Value {
    let mut sanitized = video.clone();

    if let Some(sizes) = sanitized
        .pointer_mut("/pictures/sizes")
        .and_then(Value::as_array_mut)
    {
        let kept: Vec<Value> = sizes
            .iter()
            .filter(|size| {
                size.get("width")
                    .and_then(Value::as_u64)
                    .is_some_and(|w| KEPT_PICTURE_WIDTHS.contains(&w))
            })
            .map(|size| extract_fields(size, &["width", "height", "link"]))
            .collect();
        *sizes = kept;
    }

    if let Some(connections) = sanitized
        .pointer_mut("/metadata/connections")
        .and_then(Value::as_object_mut)
    {
        for name in DROPPED_CONNECTIONS {
            connections.remove(name);
        }
    }

    if let Some(embed) = sanitized.get_mut("embed") {
        if embed.is_object() {
            *embed = extract_fields(embed, &["html"]);
        }
    }

    sanitized
}
