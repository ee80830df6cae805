use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProjectIdError;

pub const DEFAULT_PROJECT_ID: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    pub fn parse(value: &str) -> Result<Self, ProjectIdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ProjectIdError::Empty);
        }
        if let Some(ch) = value.chars().find(|ch| matches!(ch, '/' | '?' | '#')) {
            return Err(ProjectIdError::Reserved { ch });
        }
        Ok(Self(value.to_string()))
    }

    pub fn default_project() -> Self {
        Self(DEFAULT_PROJECT_ID.to_string())
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_PROJECT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::default_project()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = ProjectIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ProjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProjectId> for String {
    fn from(value: ProjectId) -> Self {
        value.0
    }
}

/// Finds the first `#` followed by a run of ASCII digits and returns the digits.
pub fn project_id_from_fragment(fragment: &str) -> Option<ProjectId> {
    let mut rest = fragment;
    while let Some(idx) = rest.find('#') {
        let after = &rest[idx + 1..];
        let digits = after
            .char_indices()
            .find(|(_, ch)| !ch.is_ascii_digit())
            .map(|(end, _)| &after[..end])
            .unwrap_or(after);
        if !digits.is_empty() {
            return Some(ProjectId(digits.to_string()));
        }
        rest = after;
    }
    None
}
