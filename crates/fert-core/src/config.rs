//! Run configuration, assembled once at startup and passed by reference.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FertError};
use crate::ids::OutputIdEncoding;

/// Beanstalk diamond on Ethereum mainnet.
pub const DEFAULT_BEANSTALK_ADDRESS: &str = "0xC1E088fC1323b20BCBee9bd1B9fC9546db5624C5";
/// Public host serving the generated artifacts.
pub const DEFAULT_BASE_URL: &str = "https://fert.bean.money";
/// Marketplace view of the Fertilizer collection; the output id is appended.
pub const DEFAULT_MARKETPLACE_URL: &str =
    "https://opensea.io/assets/ethereum/0x402c84de2ce49af88f5e2ef3710ff89bfed36cb6";
/// Largest page the subgraph serves per request.
pub const MAX_PAGE_SIZE: usize = 1000;
/// Default page size.
pub const DEFAULT_PAGE_SIZE: usize = 1000;
/// Default pagination failsafe.
pub const DEFAULT_MAX_REQUESTS: usize = 100;

/// Scaling applied to humidity in the metadata trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HumidityScale {
    /// Multiply by 100 (humidity 5 is published as 500).
    #[default]
    Percent,
    /// Publish the raw multiplier.
    Raw,
}

impl HumidityScale {
    /// Applies the scaling to a raw humidity value.
    pub fn apply(self, humidity: f64) -> f64 {
        match self {
            HumidityScale::Percent => humidity * 100.0,
            HumidityScale::Raw => humidity,
        }
    }
}

impl FromStr for HumidityScale {
    type Err = FertError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percent" | "pct" => Ok(HumidityScale::Percent),
            "raw" => Ok(HumidityScale::Raw),
            other => Err(FertError::Config(
                ErrorInfo::new(
                    "fert_core.humidity_scale",
                    format!("unknown humidity scale {other:?}"),
                )
                .with_hint("use `percent` or `raw`"),
            )),
        }
    }
}

/// Endpoints and pagination bounds for the token and progress sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// GraphQL endpoint of the subgraph.
    pub subgraph_url: String,
    /// JSON-RPC endpoint used to read global progress.
    pub rpc_url: String,
    /// Chain id the RPC endpoint must report.
    pub chain_id: u64,
    /// Contract exposing `beansPerFertilizer()`.
    pub contract_address: String,
    /// Records requested per page.
    pub page_size: usize,
    /// Pagination failsafe: maximum page requests per run.
    pub max_requests: usize,
}

/// Layout and presentation options for emitted artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving every artifact of the run.
    pub dir: PathBuf,
    /// How token ids become file names.
    pub id_encoding: OutputIdEncoding,
    /// Emit `X.html` pages next to the metadata.
    pub emit_pages: bool,
    /// Emit an extensionless copy of each metadata document.
    pub emit_bare_metadata: bool,
    /// Humidity scaling for the metadata trait.
    pub humidity_scale: HumidityScale,
    /// Publish the "Updated At" trait.
    pub record_updated_at: bool,
    /// Public base URL of the artifacts, without trailing slash.
    pub base_url: String,
    /// Marketplace base URL, without trailing slash.
    pub marketplace_url: String,
}

impl OutputConfig {
    /// Output configuration with default presentation settings.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            id_encoding: OutputIdEncoding::Decimal,
            emit_pages: true,
            emit_bare_metadata: false,
            humidity_scale: HumidityScale::Percent,
            record_updated_at: true,
            base_url: DEFAULT_BASE_URL.into(),
            marketplace_url: DEFAULT_MARKETPLACE_URL.into(),
        }
    }

    /// Metadata-only profile: hex identifiers, bare metadata copies, no pages.
    pub fn metadata_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            id_encoding: OutputIdEncoding::Hex,
            emit_pages: false,
            emit_bare_metadata: true,
            ..Self::new(dir)
        }
    }
}

/// Complete configuration of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Source endpoints and pagination bounds.
    pub source: SourceConfig,
    /// Artifact layout.
    pub output: OutputConfig,
    /// Abort the run on the first rejected token instead of skipping it.
    pub strict: bool,
}

fn missing(key: &str) -> FertError {
    FertError::Config(
        ErrorInfo::new("fert_core.config_missing", format!("{key} is not set"))
            .with_context("variable", key),
    )
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> FertError {
    FertError::Config(
        ErrorInfo::new("fert_core.config_invalid", reason)
            .with_context("variable", key)
            .with_context("value", value),
    )
}

fn parse_bool(key: &str, value: &str) -> Result<bool, FertError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected a boolean")),
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

struct Lookup<F> {
    get: F,
}

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.get)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, FertError> {
        self.optional(key).ok_or_else(|| missing(key))
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, FertError> {
        match self.optional(key) {
            Some(value) => parse_bool(key, &value),
            None => Ok(default),
        }
    }

    fn usize_or(&self, key: &str, default: usize) -> Result<usize, FertError> {
        match self.optional(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| invalid(key, &value, "expected a non-negative integer")),
            None => Ok(default),
        }
    }
}

impl RunConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, FertError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds and validates the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self, FertError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup { get };
        let chain_raw = env.required("FERT_CHAIN_ID")?;
        let chain_id = chain_raw
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid("FERT_CHAIN_ID", &chain_raw, "expected a numeric chain id"))?;
        let source = SourceConfig {
            subgraph_url: trim_url(&env.required("FERT_SUBGRAPH_URL")?),
            rpc_url: trim_url(&env.required("FERT_RPC_URL")?),
            chain_id,
            contract_address: env
                .optional("FERT_BEANSTALK_ADDRESS")
                .map(|value| value.trim().to_string())
                .unwrap_or_else(|| DEFAULT_BEANSTALK_ADDRESS.into()),
            page_size: env.usize_or("FERT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_requests: env.usize_or("FERT_MAX_PAGE_REQUESTS", DEFAULT_MAX_REQUESTS)?,
        };
        let id_encoding = match env.optional("FERT_ID_ENCODING") {
            Some(value) => value.parse()?,
            None => OutputIdEncoding::default(),
        };
        let humidity_scale = match env.optional("FERT_HUMIDITY_SCALE") {
            Some(value) => value.parse()?,
            None => HumidityScale::default(),
        };
        let output = OutputConfig {
            dir: PathBuf::from(env.required("FERT_OUT_DIR")?),
            id_encoding,
            emit_pages: env.bool_or("FERT_EMIT_PAGES", true)?,
            emit_bare_metadata: env.bool_or("FERT_EMIT_BARE_METADATA", false)?,
            humidity_scale,
            record_updated_at: env.bool_or("FERT_RECORD_UPDATED_AT", true)?,
            base_url: trim_url(
                &env.optional("FERT_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            ),
            marketplace_url: trim_url(
                &env.optional("FERT_MARKETPLACE_URL")
                    .unwrap_or_else(|| DEFAULT_MARKETPLACE_URL.into()),
            ),
        };
        let config = RunConfig {
            source,
            output,
            strict: env.bool_or("FERT_STRICT", false)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), FertError> {
        self.source.validate()
    }
}

impl SourceConfig {
    /// Checks page bounds and endpoint schemes.
    pub fn validate(&self) -> Result<(), FertError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(invalid(
                "FERT_PAGE_SIZE",
                &self.page_size.to_string(),
                format!("page size must be within 1..={MAX_PAGE_SIZE}"),
            ));
        }
        if self.max_requests == 0 {
            return Err(invalid(
                "FERT_MAX_PAGE_REQUESTS",
                "0",
                "at least one page request is required",
            ));
        }
        for (key, url) in [
            ("FERT_SUBGRAPH_URL", &self.subgraph_url),
            ("FERT_RPC_URL", &self.rpc_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(key, url, "endpoint must be an http(s) URL"));
            }
        }
        let address = self.contract_address.trim_start_matches("0x");
        if address.len() != 40 || !address.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid(
                "FERT_BEANSTALK_ADDRESS",
                &self.contract_address,
                "expected a 20-byte hex address",
            ));
        }
        Ok(())
    }
}
