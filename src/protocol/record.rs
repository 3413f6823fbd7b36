//! Record type and decoder

use serde_json::{Map, Value};

/// A parsed key-value document together with the line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    fields: Map<String, Value>,
    line: String,
}

impl Document {
    /// Parsed fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `ty` tag most porcelain documents carry
    pub fn ty(&self) -> Option<&str> {
        self.get("ty").and_then(Value::as_str)
    }

    /// Source line, untrimmed
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Consume the document, returning the fields as a JSON object value
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// One line of captured output
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// The line parsed as a JSON object
    Structured(Document),
    /// Anything else, kept verbatim
    Raw(String),
}

impl Record {
    /// Parse one line
    ///
    /// Only JSON objects are structured; a line holding a bare JSON scalar or array
    /// (or invalid JSON) is raw.
    pub fn parse(line: &str) -> Self {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(fields)) => Record::Structured(Document {
                fields,
                line: line.to_string(),
            }),
            _ => Record::Raw(line.to_string()),
        }
    }

    /// The original line text
    pub fn line(&self) -> &str {
        match self {
            Record::Structured(doc) => doc.line(),
            Record::Raw(line) => line,
        }
    }

    /// Whether the line holds only whitespace
    pub fn is_blank(&self) -> bool {
        self.line().trim().is_empty()
    }

    /// Whether the line parsed as a document
    pub fn is_structured(&self) -> bool {
        matches!(self, Record::Structured(_))
    }

    /// The parsed document, if structured
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Record::Structured(doc) => Some(doc),
            Record::Raw(_) => None,
        }
    }

    /// First whitespace-delimited token of the line
    pub fn first_token(&self) -> Option<&str> {
        self.line().split_whitespace().next()
    }
}

/// Split captured output into records, one per line
///
/// Splits on `\n` and strips one trailing `\r` per line. The number of records
/// always equals the number of newline-delimited segments, so an empty input
/// yields a single empty raw record.
pub fn decode(text: &str) -> Vec<Record> {
    text.split('\n')
        .map(|line| Record::parse(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}
