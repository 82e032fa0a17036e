use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid answer option: {0:?}")]
pub struct ParseOptionError(String);

//
// ─── ANSWER OPTION ────────────────────────────────────────────────────────────
//

/// One of the four choices of a multiple-choice question.
///
/// Serialized as the lowercase letter the API uses (`"a"` .. `"d"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerOption {
    #[serde(alias = "A")]
    A,
    #[serde(alias = "B")]
    B,
    #[serde(alias = "C")]
    C,
    #[serde(alias = "D")]
    D,
}

impl AnswerOption {
    /// All options in display order.
    pub const ALL: [AnswerOption; 4] = [Self::A, Self::B, Self::C, Self::D];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
        }
    }

    /// Uppercase letter shown next to the option text.
    #[must_use]
    pub fn label(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "c" => Ok(Self::C),
            "d" => Ok(Self::D),
            _ => Err(ParseOptionError(s.to_string())),
        }
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as delivered inside a test.
///
/// `correct_answer` is whatever the server chose to expose; the attempt never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    #[serde(default)]
    pub correct_answer: Option<AnswerOption>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub difficulty_level: Difficulty,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Question {
    #[must_use]
    pub fn option_text(&self, option: AnswerOption) -> &str {
        match option {
            AnswerOption::A => &self.option_a,
            AnswerOption::B => &self.option_b,
            AnswerOption::C => &self.option_c,
            AnswerOption::D => &self.option_d,
        }
    }

    /// Options paired with their text, in display order.
    #[must_use]
    pub fn options(&self) -> [(AnswerOption, &str); 4] {
        AnswerOption::ALL.map(|option| (option, self.option_text(option)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_parses_either_case() {
        assert_eq!("B".parse::<AnswerOption>().unwrap(), AnswerOption::B);
        assert_eq!(" d ".parse::<AnswerOption>().unwrap(), AnswerOption::D);
        assert!("e".parse::<AnswerOption>().is_err());
    }

    #[test]
    fn decodes_question_with_server_defaults() {
        let json = r#"{
            "id": 3,
            "question_text": "2 + 2?",
            "option_a": "3",
            "option_b": "4",
            "option_c": "5",
            "option_d": "22",
            "correct_answer": "b",
            "created_by": 1
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.id, QuestionId::new(3));
        assert_eq!(question.difficulty_level, Difficulty::Medium);
        assert_eq!(question.option_text(AnswerOption::B), "4");
        assert_eq!(question.options()[3], (AnswerOption::D, "22"));
        assert!(question.topic.is_none());
    }
}
