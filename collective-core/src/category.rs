//! Problem categories
//!
//! The fixed label set the summarizer is asked to choose from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Category assigned to a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Traffic,
    Environment,
    Education,
    Healthcare,
    Governance,
    Technology,
    Other,
}

impl Category {
    /// Every category, in prompt order.
    pub const ALL: [Category; 7] = [
        Self::Traffic,
        Self::Environment,
        Self::Education,
        Self::Healthcare,
        Self::Governance,
        Self::Technology,
        Self::Other,
    ];

    /// Get the label as stored and returned over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traffic => "Traffic",
            Self::Environment => "Environment",
            Self::Education => "Education",
            Self::Healthcare => "Healthcare",
            Self::Governance => "Governance",
            Self::Technology => "Technology",
            Self::Other => "Other",
        }
    }

    /// Map free-form model output onto the label set.
    ///
    /// Matching is case-insensitive; anything unrecognized becomes `Other`.
    pub fn from_label_lossy(label: &str) -> Self {
        label.parse().unwrap_or(Self::Other)
    }

    /// Comma-separated list of labels for prompts.
    pub fn prompt_list() -> String {
        Self::ALL
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "category",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("traffic".parse::<Category>().unwrap(), Category::Traffic);
        assert_eq!(" HEALTHCARE ".parse::<Category>().unwrap(), Category::Healthcare);
    }

    #[test]
    fn rejects_unknown_labels() {
        let err = "Sports".parse::<Category>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { .. }));
    }

    #[test]
    fn lossy_falls_back_to_other() {
        assert_eq!(Category::from_label_lossy("Sports"), Category::Other);
        assert_eq!(Category::from_label_lossy(""), Category::Other);
        assert_eq!(Category::from_label_lossy("education"), Category::Education);
    }

    #[test]
    fn prompt_list_matches_label_set() {
        assert_eq!(
            Category::prompt_list(),
            "Traffic, Environment, Education, Healthcare, Governance, Technology, Other"
        );
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Category::Governance).unwrap();
        assert_eq!(json, "\"Governance\"");
    }
}
