use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocaleKey {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "pt_BR")]
    PtBr,
}

impl LocaleKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en_US" => Some(Self::EnUs),
            "pt_BR" => Some(Self::PtBr),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
        }
    }

    /// International calling code stripped from generated phone numbers.
    pub fn calling_code(self) -> &'static str {
        match self {
            Self::EnUs => "+1",
            Self::PtBr => "+55",
        }
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocaleKey {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            GenerationError::InvalidOptions(format!("unsupported faker locale '{value}'"))
        })
    }
}
