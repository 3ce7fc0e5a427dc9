//! Backend identifiers.
//!
//! The set of text-generation backends is a closed enumeration resolved
//! against configuration at startup. Unknown ids are rejected when
//! configuration (or a caller request) is parsed, never at call time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for an id outside the supported backend set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown backend id '{0}', expected one of: {expected}", expected = BackendId::ALL.iter().map(|b| b.as_str()).collect::<Vec<_>>().join(", "))]
pub struct BackendIdError(pub String);

/// A supported text-generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    Openai,
    Mistral,
    Llama,
    Deepseek,
    Unity,
    Searchgpt,
}

impl BackendId {
    /// Every supported backend, in a fixed order.
    pub const ALL: [BackendId; 6] = [
        BackendId::Openai,
        BackendId::Mistral,
        BackendId::Llama,
        BackendId::Deepseek,
        BackendId::Unity,
        BackendId::Searchgpt,
    ];

    /// Wire identifier sent in backend requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Openai => "openai",
            BackendId::Mistral => "mistral",
            BackendId::Llama => "llama",
            BackendId::Deepseek => "deepseek",
            BackendId::Unity => "unity",
            BackendId::Searchgpt => "searchgpt",
        }
    }

    /// Human-readable name shown in recommendations.
    pub fn display_name(&self) -> &'static str {
        match self {
            BackendId::Openai => "OpenAI GPT-4o",
            BackendId::Mistral => "Mistral Small",
            BackendId::Llama => "Llama 3.3",
            BackendId::Deepseek => "DeepSeek",
            BackendId::Unity => "Unity",
            BackendId::Searchgpt => "SearchGPT",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = BackendIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(BackendId::Openai),
            "mistral" => Ok(BackendId::Mistral),
            "llama" => Ok(BackendId::Llama),
            "deepseek" => Ok(BackendId::Deepseek),
            "unity" => Ok(BackendId::Unity),
            "searchgpt" => Ok(BackendId::Searchgpt),
            other => Err(BackendIdError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_ids() {
        for backend in BackendId::ALL {
            assert_eq!(backend.as_str().parse::<BackendId>().unwrap(), backend);
        }
    }

    #[test]
    fn test_unknown_id_rejected() {
        let err = "gpt-9".parse::<BackendId>().unwrap_err();
        assert_eq!(err.0, "gpt-9");
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&BackendId::Searchgpt).unwrap();
        assert_eq!(json, r#""searchgpt""#);
        let back: BackendId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BackendId::Searchgpt);
    }
}
