use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::raw;

/// A single media source.
///
/// Sources are replaced wholesale when the current source changes, never
/// edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSource {
    pub url: String,
    pub title: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl PlayerSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Build a source from a loosely-typed value.
    ///
    /// Accepts an object with `url`/`title`/`type`, an array whose first
    /// element is such an object, or a bare URL string. Anything else yields
    /// the empty source.
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::String(url)) => Self::new(url.as_str()),
            Some(Value::Array(items)) => Self::from_raw(items.first()),
            Some(object @ Value::Object(_)) => Self {
                url: raw::string(Some(object), "url").unwrap_or_default(),
                title: raw::string(Some(object), "title").unwrap_or_default(),
                mime_type: raw::string(Some(object), "type")
                    .unwrap_or_default(),
            },
            _ => Self::default(),
        }
    }

    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_source() {
        let raw = json!({
            "url": "http://host/stream.m3u8",
            "title": "Live",
            "type": "application/x-mpegURL"
        });
        let source = PlayerSource::from_raw(Some(&raw));
        assert_eq!(source.url, "http://host/stream.m3u8");
        assert_eq!(source.title, "Live");
        assert_eq!(source.mime_type, "application/x-mpegURL");
        assert!(source.has_url());
    }

    #[test]
    fn array_source_uses_first_entry() {
        let raw = json!([{ "url": "a.m3u8" }, { "url": "b.m3u8" }]);
        assert_eq!(PlayerSource::from_raw(Some(&raw)).url, "a.m3u8");
        assert_eq!(PlayerSource::from_raw(Some(&json!([]))), PlayerSource::default());
    }

    #[test]
    fn bare_string_is_a_url() {
        let raw = json!("http://host/live.m3u8");
        let source = PlayerSource::from_raw(Some(&raw));
        assert_eq!(source, PlayerSource::new("http://host/live.m3u8"));
    }

    #[test]
    fn missing_source_is_empty() {
        let source = PlayerSource::from_raw(None);
        assert_eq!(source, PlayerSource::default());
        assert!(!source.has_url());
        assert_eq!(PlayerSource::from_raw(Some(&json!(42))), PlayerSource::default());
    }
}
