//! Output identifiers naming each token's artifact files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FertError};

/// Pipeline-wide encoding of token ids into output identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputIdEncoding {
    /// Plain decimal, e.g. `6000000`.
    #[default]
    Decimal,
    /// 64 lowercase hex digits, zero padded (ERC-1155 `{id}` substitution form).
    Hex,
}

impl OutputIdEncoding {
    /// Encodes `id` into its output identifier.
    pub fn encode(self, id: u64) -> String {
        match self {
            OutputIdEncoding::Decimal => id.to_string(),
            OutputIdEncoding::Hex => format!("{id:064x}"),
        }
    }

    /// Returns the configuration keyword of the encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputIdEncoding::Decimal => "decimal",
            OutputIdEncoding::Hex => "hex",
        }
    }
}

impl fmt::Display for OutputIdEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputIdEncoding {
    type Err = FertError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "decimal" | "dec" => Ok(OutputIdEncoding::Decimal),
            "hex" | "hex64" => Ok(OutputIdEncoding::Hex),
            other => Err(FertError::Config(
                ErrorInfo::new("fert_core.id_encoding", format!("unknown id encoding {other:?}"))
                    .with_hint("use `decimal` or `hex`"),
            )),
        }
    }
}
