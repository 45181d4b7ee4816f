//! RouterOS reply models
//!
//! A router reply is an ordered list of sentences. Each sentence carries a tag
//! describing its role (`!re` for a data record, `!done` for the trailer, and so
//! on) and, optionally, a map of attributes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One structured record returned by the router (e.g. one interface, one lease)
pub type ReplyRow = BTreeMap<String, String>;

/// Role of a sentence within a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentenceTag {
    /// Data record
    #[serde(rename = "!re")]
    Re,
    /// Final sentence of a successful command
    #[serde(rename = "!done")]
    Done,
    /// Command failure
    #[serde(rename = "!trap")]
    Trap,
    /// Connection-level failure; the router closes the session after it
    #[serde(rename = "!fatal")]
    Fatal,
    /// Command produced no records (RouterOS 7.18+)
    #[serde(rename = "!empty")]
    Empty,
}

impl SentenceTag {
    /// Wire spelling of the tag
    pub fn as_str(self) -> &'static str {
        match self {
            SentenceTag::Re => "!re",
            SentenceTag::Done => "!done",
            SentenceTag::Trap => "!trap",
            SentenceTag::Fatal => "!fatal",
            SentenceTag::Empty => "!empty",
        }
    }
}

impl fmt::Display for SentenceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reply sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Reply word that opens the sentence
    pub tag: SentenceTag,
    /// `=name=value` words, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<ReplyRow>,
}

impl Sentence {
    /// Data record with attributes
    pub fn record(attributes: ReplyRow) -> Self {
        Self {
            tag: SentenceTag::Re,
            attributes: Some(attributes),
        }
    }

    /// Trailer sentence, optionally carrying a return value
    pub fn done(attributes: Option<ReplyRow>) -> Self {
        Self {
            tag: SentenceTag::Done,
            attributes,
        }
    }

    /// True for `!re` sentences that carry attributes
    pub fn is_data_record(&self) -> bool {
        self.tag == SentenceTag::Re && self.attributes.is_some()
    }
}

/// Full reply to one command, in the order the router produced it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Sentences up to and including the trailer
    pub sentences: Vec<Sentence>,
}

impl Reply {
    /// Create a reply from already-tagged sentences
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    /// Translate a REST response body into reply sentences.
    ///
    /// An array becomes one `!re` per element followed by `!done`. An object is
    /// the command's return value (for example `{"ret":"*1"}` from `add`) and
    /// becomes the attributes of `!done`. `null` yields a bare `!done`.
    pub fn from_rest(value: Value) -> Self {
        let mut sentences = Vec::new();
        match value {
            Value::Array(items) => {
                for item in items {
                    sentences.push(Sentence {
                        tag: SentenceTag::Re,
                        attributes: attributes_of(item),
                    });
                }
                sentences.push(Sentence::done(None));
            }
            Value::Null => sentences.push(Sentence::done(None)),
            other => sentences.push(Sentence::done(attributes_of(other))),
        }
        Self { sentences }
    }

    /// The `!done` attributes, if the command returned a value
    pub fn done_attributes(&self) -> Option<&ReplyRow> {
        self.sentences
            .iter()
            .rev()
            .find(|s| s.tag == SentenceTag::Done)
            .and_then(|s| s.attributes.as_ref())
    }
}

fn attributes_of(value: Value) -> Option<ReplyRow> {
    match value {
        Value::Object(map) => Some(
            map.into_iter()
                .map(|(key, value)| (key, attribute_text(value)))
                .collect(),
        ),
        _ => None,
    }
}

fn attribute_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
