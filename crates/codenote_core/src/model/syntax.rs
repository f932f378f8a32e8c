//! Syntax-highlighting language tags.
//!
//! The set is closed: highlighting engines live in the UI, the core only
//! records which one a document wants. Persisted and serialized as the
//! display strings below (`"C#"`, `"C++"`, `"MarkDown"`, ...).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxLanguage {
    #[default]
    Plain,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "XML")]
    Xml,
    #[serde(rename = "HTML")]
    Html,
    JavaScript,
    #[serde(rename = "CSS")]
    Css,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "SQL")]
    Sql,
    Python,
    Java,
    #[serde(rename = "C++")]
    Cpp,
    #[serde(rename = "PHP")]
    Php,
    MarkDown,
}

impl SyntaxLanguage {
    pub const ALL: [SyntaxLanguage; 13] = [
        Self::Plain,
        Self::CSharp,
        Self::Xml,
        Self::Html,
        Self::JavaScript,
        Self::Css,
        Self::Json,
        Self::Sql,
        Self::Python,
        Self::Java,
        Self::Cpp,
        Self::Php,
        Self::MarkDown,
    ];

    /// Stable display/storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "Plain",
            Self::CSharp => "C#",
            Self::Xml => "XML",
            Self::Html => "HTML",
            Self::JavaScript => "JavaScript",
            Self::Css => "CSS",
            Self::Json => "JSON",
            Self::Sql => "SQL",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::Php => "PHP",
            Self::MarkDown => "MarkDown",
        }
    }
}

impl Display for SyntaxLanguage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string names no known language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSyntaxLanguage(pub String);

impl Display for UnknownSyntaxLanguage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown syntax language `{}`", self.0)
    }
}

impl Error for UnknownSyntaxLanguage {}

impl FromStr for SyntaxLanguage {
    type Err = UnknownSyntaxLanguage;

    /// Accepts the storage names case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSyntaxLanguage(value.to_string()))
    }
}
