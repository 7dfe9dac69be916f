//! Tag domain model.
//!
//! # Responsibility
//! - Define the `(word, checked)` record owned by one category.
//! - Define the checked/unchecked query filter.
//! - Define the single-or-many title argument used by catalog operations.
//!
//! # Invariants
//! - Equality and ordering of tags are decided by `word` only when sorting;
//!   `checked` is state, not identity.
//! - `checked=false` is the initial state for explicitly added tags.

use serde::{Deserialize, Serialize};

/// One known value inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Token as it appears in storage file names.
    pub word: String,
    /// `true` once handled; pending tags are pulled.
    pub checked: bool,
}

impl Tag {
    /// Creates a pending tag.
    pub fn pending(word: impl Into<String>) -> Self {
        Self::new(word, false)
    }

    /// Creates a handled tag.
    pub fn handled(word: impl Into<String>) -> Self {
        Self::new(word, true)
    }

    pub fn new(word: impl Into<String>, checked: bool) -> Self {
        Self {
            word: word.into(),
            checked,
        }
    }

    pub fn check(&mut self) {
        self.checked = true;
    }

    pub fn uncheck(&mut self) {
        self.checked = false;
    }

    /// Returns whether this tag is still a pull target.
    pub fn is_pending(&self) -> bool {
        !self.checked
    }
}

/// Filter for category tag queries.
///
/// Setting both flags, or neither, returns every tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub checked: bool,
    pub unchecked: bool,
}

impl TagFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn checked_only() -> Self {
        Self {
            checked: true,
            unchecked: false,
        }
    }

    pub fn unchecked_only() -> Self {
        Self {
            checked: false,
            unchecked: true,
        }
    }

    /// Returns whether `tag` passes this filter.
    pub fn accepts(&self, tag: &Tag) -> bool {
        if self.checked == self.unchecked {
            return true;
        }
        if self.checked {
            tag.checked
        } else {
            !tag.checked
        }
    }
}

/// Title (or word) argument accepting either one value or a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Titles {
    Single(String),
    Many(Vec<String>),
}

impl Titles {
    /// Normalizes to a sequence in caller order.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(value) => vec![value],
            Self::Many(values) => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.is_empty(),
            Self::Many(values) => values.is_empty(),
        }
    }
}

impl From<&str> for Titles {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for Titles {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for Titles {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<Vec<&str>> for Titles {
    fn from(value: Vec<&str>) -> Self {
        Self::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Titles {
    fn from(value: &[&str]) -> Self {
        Self::Many(value.iter().map(|item| item.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Titles {
    fn from(value: [&str; N]) -> Self {
        Self::Many(value.iter().map(|item| item.to_string()).collect())
    }
}
