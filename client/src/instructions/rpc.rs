use hotdoge_staking::{contract::TxHash, Address, Result, StakingError};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        OnceLock,
    },
    thread,
    time::{Duration, Instant},
};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Blocking JSON-RPC client for an EVM node.
///
/// Writes go through `eth_sendTransaction`, so the node (or the wallet
/// behind it) signs for the `from` account.
pub struct RpcClient {
    http: reqwest::blocking::Client,
    url: String,
    next_id: AtomicU64,
    receipt_poll: Duration,
    receipt_timeout: Duration,
}

impl RpcClient {
    pub fn new(url: String, receipt_poll: Duration, receipt_timeout: Duration) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            url,
            next_id: AtomicU64::new(1),
            receipt_poll,
            receipt_timeout,
        }
    }

    fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!("rpc {} #{}", method, id);
        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .and_then(|rsp| rsp.error_for_status())
            .and_then(|rsp| rsp.json())
            .map_err(|err| StakingError::Call(format!("{}: {}", method, err)))?;
        if let Some(err) = response.error {
            return Err(StakingError::Call(format!(
                "{}: {} (code {})",
                method, err.message, err.code
            )));
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    pub fn chain_id(&self) -> Result<u64> {
        let value = self.request("eth_chainId", json!([]))?;
        let text = value
            .as_str()
            .ok_or_else(|| StakingError::Decode(format!("eth_chainId returned {}", value)))?;
        u64::from_str_radix(text.trim_start_matches("0x"), 16)
            .map_err(|_| StakingError::Decode(format!("eth_chainId returned {}", text)))
    }

    pub fn accounts(&self) -> Result<Vec<Address>> {
        let value = self.request("eth_accounts", json!([]))?;
        let list = value
            .as_array()
            .ok_or_else(|| StakingError::Decode(format!("eth_accounts returned {}", value)))?;
        list.iter()
            .map(|item| Address::parse(item.as_str().unwrap_or_default()))
            .collect()
    }

    /// `eth_call` against the latest block; returns the raw return data.
    pub fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>> {
        let params = json!([{ "to": to.as_str(), "data": to_hex(data) }, "latest"]);
        let value = self.request("eth_call", params)?;
        from_hex(value.as_str().unwrap_or_default())
    }

    pub fn send_transaction(&self, from: &Address, to: &Address, data: &[u8]) -> Result<TxHash> {
        let params = json!([{ "from": from.as_str(), "to": to.as_str(), "data": to_hex(data) }]);
        let value = self.request("eth_sendTransaction", params)?;
        let tx_hash = value.as_str().unwrap_or_default().to_ascii_lowercase();
        if !tx_hash_pattern().is_match(&tx_hash) {
            return Err(StakingError::Decode(format!(
                "eth_sendTransaction returned {}",
                value
            )));
        }
        Ok(tx_hash)
    }

    /// Polls for the receipt until the transaction is mined or the timeout
    /// passes. A receipt with status `0x0` is a revert.
    pub fn wait_for_receipt(&self, tx_hash: &str) -> Result<()> {
        let deadline = Instant::now() + self.receipt_timeout;
        loop {
            let receipt = self.request("eth_getTransactionReceipt", json!([tx_hash]))?;
            if !receipt.is_null() {
                return match receipt.get("status").and_then(Value::as_str) {
                    Some("0x0") => Err(StakingError::Reverted(tx_hash.to_string())),
                    _ => Ok(()),
                };
            }
            if Instant::now() >= deadline {
                return Err(StakingError::Transaction(format!(
                    "{} not confirmed after {:?}",
                    tx_hash, self.receipt_timeout
                )));
            }
            thread::sleep(self.receipt_poll);
        }
    }
}

/// Submits a transaction and, when `wait` is set, blocks until it is mined.
pub fn send_txn(
    rpc: &RpcClient,
    from: &Address,
    to: &Address,
    data: &[u8],
    wait: bool,
) -> Result<TxHash> {
    let tx_hash = rpc.send_transaction(from, to, data)?;
    if wait {
        rpc.wait_for_receipt(&tx_hash)?;
    }
    Ok(tx_hash)
}

fn tx_hash_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0x[0-9a-f]{64}$").expect("static pattern"))
}

pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|err| StakingError::Decode(format!("{}: {}", text, err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(to_hex(&[0xdd, 0xca, 0x3f, 0x43]), "0xddca3f43");
        assert_eq!(from_hex("0xddca3f43").unwrap(), vec![0xdd, 0xca, 0x3f, 0x43]);
        assert_eq!(from_hex("0x").unwrap(), Vec::<u8>::new());
        assert!(from_hex("0xzz").is_err());
    }

    #[test]
    fn tx_hashes() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert!(tx_hash_pattern().is_match(&hash));
        assert!(!tx_hash_pattern().is_match("0x1234"));
    }
}
