//! Bounded chat transcript
//!
//! Entries are kept in arrival order. Once the configured capacity is
//! reached, the oldest entry is evicted for each new one.

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Who said a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Bot,
    User,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bot => write!(f, "bot"),
            Self::User => write!(f, "user"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    entries: VecDeque<TranscriptEntry>,
    capacity: usize,
}

impl Transcript {
    /// Create an empty transcript holding at most `capacity` entries
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(TranscriptEntry {
            speaker,
            text: text.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }
}
