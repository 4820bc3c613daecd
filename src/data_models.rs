use std::cmp::Ordering;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a post as returned by the search API.
///
/// Twitter hands ids out as decimal strings. Ids made only of digits compare
/// numerically so that the sorted output lists posts in id order; anything
/// else sorts lexically after the numeric ids. Integer ids are accepted on
/// input and kept in their decimal form.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> PostId {
        PostId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric_digits(&self) -> Option<&str> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = self.0.trim_start_matches('0');
        Some(if trimmed.is_empty() { "0" } else { trimmed })
    }
}

struct PostIdVisitor;

impl Visitor<'_> for PostIdVisitor {
    type Value = PostId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer post id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PostId, E> {
        Ok(PostId::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<PostId, E> {
        Ok(PostId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PostId, E> {
        Ok(PostId(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PostId, E> {
        Ok(PostId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<PostId, D::Error> {
        deserializer.deserialize_any(PostIdVisitor)
    }
}

impl Ord for PostId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_digits(), other.numeric_digits()) {
            (Some(a), Some(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for PostId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        PostId::new(id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub text: String,
}

impl Post {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Post {
        Post {
            id: PostId::new(id),
            text: text.into(),
        }
    }
}

/// Top-ranked language guess for one piece of text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub language_code: String,
    pub confidence: f64,
}
