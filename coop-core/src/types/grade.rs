//! Grade tiers and grade assignments

use crate::error::{CoopError, CoopResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    C,
    B,
    A,
    #[serde(rename = "aa")]
    AA,
    #[serde(rename = "aaa")]
    AAA,
}

impl Grade {
    /// All tiers, lowest first
    pub const ALL: [Grade; 5] = [Grade::C, Grade::B, Grade::A, Grade::AA, Grade::AAA];

    /// Parse an assignment grade code
    ///
    /// Only the letter codes, in any case.
    pub fn parse(code: &str) -> CoopResult<Self> {
        Self::from_letters(&code.to_ascii_lowercase()).ok_or_else(|| CoopError::UnknownGrade {
            grade: code.to_string(),
        })
    }

    /// Read a grade spec identifier
    ///
    /// Contract documents name tiers as letter codes, `GRADE_` prefixed
    /// identifiers or numeric tiers 1 (C) to 5 (AAA).
    pub fn from_spec_identifier(identifier: &str) -> Option<Self> {
        let normalized = identifier.trim().to_ascii_lowercase();
        let letters = normalized.strip_prefix("grade_").unwrap_or(&normalized);
        match letters {
            "1" => Some(Grade::C),
            "2" => Some(Grade::B),
            "3" => Some(Grade::A),
            "4" => Some(Grade::AA),
            "5" => Some(Grade::AAA),
            other => Self::from_letters(other),
        }
    }

    fn from_letters(letters: &str) -> Option<Self> {
        match letters {
            "c" => Some(Grade::C),
            "b" => Some(Grade::B),
            "a" => Some(Grade::A),
            "aa" => Some(Grade::AA),
            "aaa" => Some(Grade::AAA),
            _ => None,
        }
    }

    /// Lowercase letter code
    pub fn code(&self) -> &'static str {
        match self {
            Grade::C => "c",
            Grade::B => "b",
            Grade::A => "a",
            Grade::AA => "aa",
            Grade::AAA => "aaa",
        }
    }

    /// Whether a grade spec identifier names this tier
    pub fn matches(&self, identifier: &str) -> bool {
        Grade::from_spec_identifier(identifier) == Some(*self)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code().to_ascii_uppercase())
    }
}

/// Grade registry entry for one coop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeAssignment {
    #[serde(alias = "contract")]
    pub contract_id: String,
    #[serde(alias = "coop")]
    pub coop_code: String,
    /// Achieved letter grade, unparsed
    pub grade: String,
    /// Coop membership size reported by the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coop_size: Option<u32>,
}

impl GradeAssignment {
    /// Create an assignment without a membership size
    pub fn new(
        contract_id: impl Into<String>,
        coop_code: impl Into<String>,
        grade: impl Into<String>,
    ) -> Self {
        Self {
            contract_id: contract_id.into(),
            coop_code: coop_code.into(),
            grade: grade.into(),
            coop_size: None,
        }
    }
}
