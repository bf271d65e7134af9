use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoodSignalError;

/// Scores strictly above this are labelled [`Label::Depressed`].
pub const DECISION_THRESHOLD: f64 = 0.5;

// --- Handle ---

/// Account identifier under analysis. Trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    pub fn parse(raw: &str) -> Result<Self, MoodSignalError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MoodSignalError::Validation("Username is required".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = MoodSignalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Handle::parse(&value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// --- PostBatch ---

/// Post texts in retrieval order (not chronological).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostBatch {
    posts: Vec<String>,
}

impl PostBatch {
    pub fn new(posts: Vec<String>) -> Self {
        Self { posts }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn posts(&self) -> &[String] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<String> {
        self.posts
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.posts.iter().map(String::as_str)
    }

    /// Keep at most `max_items` posts.
    pub fn capped(mut self, max_items: usize) -> Self {
        self.posts.truncate(max_items);
        self
    }
}

impl FromIterator<String> for PostBatch {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            posts: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<String>> for PostBatch {
    fn from(posts: Vec<String>) -> Self {
        Self { posts }
    }
}

// --- Verdict ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "Depressed")]
    Depressed,
    #[serde(rename = "Not Depressed")]
    NotDepressed,
}

impl Label {
    /// Strict threshold: a score equal to the threshold is negative.
    pub fn from_score(score: f64) -> Self {
        if score > DECISION_THRESHOLD {
            Label::Depressed
        } else {
            Label::NotDepressed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Depressed => "Depressed",
            Label::NotDepressed => "Not Depressed",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted blend of the text and demographic scores. Computed per request,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub label: Label,
    pub weighted_score: f64,
    pub text_score: f64,
    pub demographic_score: f64,
}
