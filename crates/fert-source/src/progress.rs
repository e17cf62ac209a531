use std::cell::Cell;

use fert_core::config::SourceConfig;
use fert_core::errors::{ErrorInfo, FertError};
use serde::Deserialize;
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use tracing::{debug, info};

/// Beanstalk view returning the cumulative Beans paid per Fertilizer.
pub const BEANS_PER_FERTILIZER: &str = "beansPerFertilizer()";

/// Supplies the global progress counter.
pub trait ProgressSource {
    /// Current value of the counter.
    fn global_progress(&self) -> Result<u64, FertError>;
}

/// First four bytes of the Keccak-256 hash of a Solidity function signature.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

fn decode_error(code: &str, message: impl Into<String>, raw: &str) -> FertError {
    FertError::Transport(ErrorInfo::new(code, message).with_context("raw", raw))
}

/// Decodes a JSON-RPC hex quantity such as `0x539`.
pub fn decode_quantity(raw: &str) -> Result<u64, FertError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Err(decode_error("fert_source.rpc_quantity", "empty quantity", raw));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|err| decode_error("fert_source.rpc_quantity", err.to_string(), raw))
}

/// Decodes a single ABI-encoded `uint` return word into a `u64`.
pub fn decode_uint_word(raw: &str) -> Result<u64, FertError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Err(decode_error(
            "fert_source.rpc_empty_return",
            "call returned no data; is the contract address correct?",
            raw,
        ));
    }
    if digits.len() > 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(decode_error(
            "fert_source.rpc_word",
            "expected a single 32-byte word",
            raw,
        ));
    }
    let split = digits.len().saturating_sub(16);
    let (high, low) = digits.split_at(split);
    if high.chars().any(|c| c != '0') {
        return Err(decode_error(
            "fert_source.rpc_overflow",
            "returned value does not fit in 64 bits",
            raw,
        ));
    }
    u64::from_str_radix(low, 16)
        .map_err(|err| decode_error("fert_source.rpc_word", err.to_string(), raw))
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Reads `beansPerFertilizer()` from the Beanstalk contract over JSON-RPC.
///
/// The node's chain id is checked against the configured one before the
/// first call.
#[derive(Debug)]
pub struct RpcProgressSource {
    endpoint: String,
    chain_id: u64,
    contract: String,
    agent: ureq::Agent,
    next_id: Cell<u64>,
}

impl RpcProgressSource {
    /// Creates a reader for the endpoint and contract in `config`.
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            endpoint: config.rpc_url.clone(),
            chain_id: config.chain_id,
            contract: config.contract_address.clone(),
            agent: ureq::Agent::new(),
            next_id: Cell::new(1),
        }
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, FertError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        debug!(endpoint = %self.endpoint, method, id, "json-rpc request");
        let transport = |code: &str, err: String| {
            FertError::Transport(
                ErrorInfo::new(code, err)
                    .with_context("endpoint", self.endpoint.clone())
                    .with_context("method", method),
            )
        };
        let response = self
            .agent
            .post(&self.endpoint)
            .send_json(json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))
            .map_err(|err| transport("fert_source.rpc_request", err.to_string()))?;
        let body: RpcResponse = response
            .into_json()
            .map_err(|err| transport("fert_source.rpc_decode", err.to_string()))?;
        if let Some(error) = body.error {
            return Err(FertError::Transport(
                ErrorInfo::new("fert_source.rpc_error", error.message)
                    .with_context("endpoint", self.endpoint.clone())
                    .with_context("method", method)
                    .with_context("rpc_code", error.code.to_string()),
            ));
        }
        body.result
            .ok_or_else(|| transport("fert_source.rpc_decode", "response carried no result".into()))
    }

    fn call_string(&self, method: &str, params: Value) -> Result<String, FertError> {
        match self.call(method, params)? {
            Value::String(text) => Ok(text),
            other => Err(decode_error(
                "fert_source.rpc_decode",
                "expected a hex string result",
                &other.to_string(),
            )),
        }
    }

    /// Fails with a config error when the node serves a different chain.
    pub fn check_chain(&self) -> Result<(), FertError> {
        let reported = decode_quantity(&self.call_string("eth_chainId", json!([]))?)?;
        if reported != self.chain_id {
            return Err(FertError::Config(
                ErrorInfo::new("fert_source.chain_mismatch", "RPC endpoint serves another chain")
                    .with_context("expected", self.chain_id.to_string())
                    .with_context("reported", reported.to_string())
                    .with_hint("check FERT_CHAIN_ID and FERT_RPC_URL"),
            ));
        }
        Ok(())
    }
}

impl ProgressSource for RpcProgressSource {
    fn global_progress(&self) -> Result<u64, FertError> {
        self.check_chain()?;
        let data = format!("0x{}", hex::encode(function_selector(BEANS_PER_FERTILIZER)));
        let raw = self.call_string(
            "eth_call",
            json!([{ "to": self.contract, "data": data }, "latest"]),
        )?;
        let progress = decode_uint_word(&raw)?;
        info!(progress, contract = %self.contract, "read global progress");
        Ok(progress)
    }
}
