//! News items

use super::from_structured;
use crate::error::MappingError;
use crate::protocol::Record;
use serde::{Deserialize, Serialize};

/// A news item published through the package index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Record type tag
    pub ty: String,
    /// Stable identifier
    pub id: String,
    /// Ordinal used for read/unread ordering
    pub ord: u32,
    /// Whether the user has read the item
    pub is_read: bool,
    /// Renderings, the first one is the default
    pub langs: Vec<NewsLang>,
}

/// One language rendering of a news item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsLang {
    /// Language tag, e.g. "en_US"
    pub lang: String,
    /// Title to display
    pub display_title: String,
    /// Body content (Markdown)
    pub content: String,
}

impl NewsItem {
    /// Map a structured record into a news item
    pub fn from_record(record: &Record) -> Result<Self, MappingError> {
        from_structured(record, "news item")
    }

    /// The default rendering
    pub fn default_lang(&self) -> Option<&NewsLang> {
        self.langs.first()
    }

    /// Rendering for `lang`, falling back to the default
    pub fn lang(&self, lang: &str) -> Option<&NewsLang> {
        self.langs
            .iter()
            .find(|l| l.lang == lang)
            .or_else(|| self.default_lang())
    }

    /// Title of the default rendering, or the id when there is none
    pub fn title(&self) -> &str {
        self.default_lang()
            .map(|l| l.display_title.as_str())
            .unwrap_or(&self.id)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode;

    const NEWS: &str = r#"{"ty":"newsitem-v1","id":"2024-01-14-ruyi-news","ord":2,"is_read":false,"langs":[{"lang":"en_US","display_title":"RuyiSDK 0.4 released","content":"Hello"},{"lang":"zh_CN","display_title":"RuyiSDK 0.4 发布","content":"你好"}]}"#;

    #[test]
    fn maps_all_fields() {
        let item = NewsItem::from_record(&decode(NEWS)[0]).unwrap();

        assert_eq!(item.ty, "newsitem-v1");
        assert_eq!(item.id, "2024-01-14-ruyi-news");
        assert_eq!(item.ord, 2);
        assert!(!item.is_read);
        assert_eq!(item.langs.len(), 2);
        assert_eq!(item.title(), "RuyiSDK 0.4 released");
    }

    #[test]
    fn lang_lookup_falls_back_to_default() {
        let item = NewsItem::from_record(&decode(NEWS)[0]).unwrap();

        assert_eq!(item.lang("zh_CN").unwrap().content, "你好");
        assert_eq!(item.lang("de_DE").unwrap().lang, "en_US");
    }

    #[test]
    fn item_without_langs_uses_id_as_title() {
        let line = r#"{"ty":"newsitem-v1","id":"bare","ord":0,"is_read":true,"langs":[]}"#;
        let item = NewsItem::from_record(&decode(line)[0]).unwrap();

        assert!(item.default_lang().is_none());
        assert_eq!(item.title(), "bare");
    }

    #[test]
    fn serialize_decode_map_is_lossless() {
        let original = NewsItem::from_record(&decode(NEWS)[0]).unwrap();
        let line = serde_json::to_string(&original).unwrap();

        assert_eq!(NewsItem::from_record(&decode(&line)[0]).unwrap(), original);
    }

    #[test]
    fn missing_is_read_is_shape_error() {
        let line = r#"{"ty":"newsitem-v1","id":"x","ord":1,"langs":[]}"#;

        match NewsItem::from_record(&decode(line)[0]) {
            Err(MappingError::Shape { entity, reason, .. }) => {
                assert_eq!(entity, "news item");
                assert!(reason.contains("is_read"));
            }
            other => panic!("expected Shape error, got: {other:?}"),
        }
    }

    #[test]
    fn plain_text_line_is_not_structured_error() {
        assert!(matches!(
            NewsItem::from_record(&decode("No news.")[0]),
            Err(MappingError::NotStructured { .. })
        ));
    }
}
