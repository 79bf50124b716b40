//! Answer values and the in-progress answer set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The value recorded for one answered question.
///
/// Yes/no, single-select and free-text questions carry a single string;
/// multi-select questions carry the list of selected option values. The
/// untagged representation keeps both the wire payload and the stored
/// record in the natural JSON/YAML shape (`"yes"` or `["a", "b"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multiple(Vec<String>),
}

impl AnswerValue {
    /// Returns true when the answer carries no usable content: a blank
    /// string or an empty selection. Empty answers never satisfy a
    /// required-question gate.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Single(text) => text.trim().is_empty(),
            AnswerValue::Multiple(values) => values.is_empty(),
        }
    }

    /// Returns true if this answer equals `value` as a single-valued answer.
    pub fn equals(&self, value: &str) -> bool {
        matches!(self, AnswerValue::Single(text) if text == value)
    }

    /// Returns true if this answer contains `value`.
    ///
    /// For multi-select answers this is membership; a single-valued answer
    /// counts as containing exactly its own value.
    pub fn includes(&self, value: &str) -> bool {
        match self {
            AnswerValue::Single(text) => text == value,
            AnswerValue::Multiple(values) => values.iter().any(|v| v == value),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        AnswerValue::Multiple(values)
    }
}

/// The mapping of question id to current answer value for one in-progress
/// or submitted questionnaire.
///
/// A `BTreeMap` keeps iteration and serialization order deterministic.
pub type AnswerSet = BTreeMap<String, AnswerValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_single_answer_is_empty() {
        assert!(AnswerValue::Single("   ".to_string()).is_empty());
        assert!(!AnswerValue::Single("no".to_string()).is_empty());
    }

    #[test]
    fn empty_selection_is_empty() {
        assert!(AnswerValue::Multiple(vec![]).is_empty());
        assert!(!AnswerValue::Multiple(vec!["a".to_string()]).is_empty());
    }

    #[test]
    fn equals_only_matches_single_values() {
        assert!(AnswerValue::from("yes").equals("yes"));
        assert!(!AnswerValue::from("no").equals("yes"));
        assert!(!AnswerValue::Multiple(vec!["yes".to_string()]).equals("yes"));
    }

    #[test]
    fn includes_tests_membership() {
        let answer = AnswerValue::Multiple(vec!["diabetes-type-2".to_string()]);
        assert!(answer.includes("diabetes-type-2"));
        assert!(!answer.includes("thyroid-condition"));
        assert!(AnswerValue::from("yes").includes("yes"));
    }

    #[test]
    fn serde_uses_untagged_shapes() {
        let single: AnswerValue = serde_yaml::from_str("\"yes\"").expect("should parse");
        assert_eq!(single, AnswerValue::from("yes"));

        let multiple: AnswerValue = serde_yaml::from_str("[a, b]").expect("should parse");
        assert_eq!(
            multiple,
            AnswerValue::Multiple(vec!["a".to_string(), "b".to_string()])
        );
    }
}
