// JSON-RPC transport
//
// A deliberately small client: the calls the harness makes (eth_call,
// eth_sendTransaction against a node-managed account, receipt polling,
// eth_accounts, eth_chainId) and nothing else. Transport failures surface as
// `ChainError::Network` because the transaction status is unknown; RPC
// errors that carry revert data surface as `ChainError::Revert`.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, B256};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};

use isopool_error::{ChainError, ChainResult};
use isopool_types::{TransactionReceipt, TxStatus};

use crate::abi;

/// How often receipt polling asks the node
const POLL_INTERVAL_MS: u64 = 1_000;

/// Minimal JSON-RPC 2.0 client over HTTP
#[derive(Debug)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    // `null` is a legal result (a pending receipt), so this must not be an
    // Option, which would flatten null and absent into the same case.
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[allow(dead_code)]
    code: i64,
    message: String,
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    status: Option<String>,
    block_number: Option<String>,
    gas_used: Option<String>,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, method: &str, params: Value) -> ChainResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(method, id, "rpc request");
        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::network(format!("{method}: {e}")))?;
        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::network(format!("{method}: invalid response: {e}")))?;
        if let Some(error) = parsed.error {
            return Err(rpc_error(method, error));
        }
        Ok(parsed.result)
    }

    /// Accounts the node manages, in node order
    pub async fn accounts(&self) -> ChainResult<Vec<Address>> {
        let result = self.request("eth_accounts", json!([])).await?;
        let raw: Vec<String> = serde_json::from_value(result)
            .map_err(|e| ChainError::network(format!("eth_accounts: {e}")))?;
        raw.iter()
            .map(|s| {
                Address::from_str(s)
                    .map_err(|e| ChainError::network(format!("eth_accounts: bad address {s}: {e}")))
            })
            .collect()
    }

    pub async fn chain_id(&self) -> ChainResult<u64> {
        let result = self.request("eth_chainId", json!([])).await?;
        let raw: String = serde_json::from_value(result)
            .map_err(|e| ChainError::network(format!("eth_chainId: {e}")))?;
        hex_to_u64(&raw).ok_or_else(|| ChainError::network(format!("eth_chainId: bad value {raw}")))
    }

    /// Read-only contract call. Reverts surface as `ChainError::Revert`.
    pub async fn call(
        &self,
        to: Address,
        data: &[u8],
        block: Option<u64>,
    ) -> ChainResult<Vec<u8>> {
        self.call_as(None, to, data, block).await
    }

    /// Read-only contract call with an explicit caller, for replaying a
    /// failed transaction whose revert path depends on `msg.sender`.
    pub async fn call_as(
        &self,
        from: Option<Address>,
        to: Address,
        data: &[u8],
        block: Option<u64>,
    ) -> ChainResult<Vec<u8>> {
        let block_tag = match block {
            Some(number) => format!("{number:#x}"),
            None => "latest".to_string(),
        };
        let mut call = json!({
            "to": format!("{to:#x}"),
            "data": format!("0x{}", hex::encode(data)),
        });
        if let Some(from) = from {
            call["from"] = Value::String(format!("{from:#x}"));
        }
        let result = self.request("eth_call", json!([call, block_tag])).await?;
        decode_hex_value("eth_call", result)
    }

    /// Submit a transaction signed by the node's account. Returns the hash;
    /// mining is observed separately via `wait_for_receipt`.
    pub async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: &[u8],
    ) -> ChainResult<B256> {
        let result = self
            .request(
                "eth_sendTransaction",
                json!([{
                    "from": format!("{from:#x}"),
                    "to": format!("{to:#x}"),
                    "data": format!("0x{}", hex::encode(data)),
                }]),
            )
            .await?;
        let raw: String = serde_json::from_value(result)
            .map_err(|e| ChainError::network(format!("eth_sendTransaction: {e}")))?;
        B256::from_str(&raw)
            .map_err(|e| ChainError::network(format!("eth_sendTransaction: bad hash {raw}: {e}")))
    }

    /// The receipt for a transaction, or `None` while it is pending
    pub async fn transaction_receipt(
        &self,
        tx: B256,
    ) -> ChainResult<Option<TransactionReceipt>> {
        let result = self
            .request("eth_getTransactionReceipt", json!([format!("{tx:#x}")]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let raw: RawReceipt = serde_json::from_value(result)
            .map_err(|e| ChainError::network(format!("eth_getTransactionReceipt: {e}")))?;
        Ok(Some(convert_receipt(raw)?))
    }

    /// Block until the transaction is mined. With `max_wait_ms` set, gives up
    /// with `ChainError::Timeout` once the deadline passes; the transaction
    /// itself cannot be withdrawn, only observed.
    pub async fn wait_for_receipt(
        &self,
        tx: B256,
        max_wait_ms: Option<u64>,
    ) -> ChainResult<TransactionReceipt> {
        let mut waited_ms = 0u64;
        loop {
            if let Some(receipt) = self.transaction_receipt(tx).await? {
                debug!(tx = %tx, block = ?receipt.block_number, "transaction mined");
                return Ok(receipt);
            }
            if let Some(limit) = max_wait_ms {
                if waited_ms >= limit {
                    return Err(ChainError::Timeout {
                        tx: format!("{tx:#x}"),
                        waited_ms,
                    });
                }
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            waited_ms += POLL_INTERVAL_MS;
        }
    }
}

fn convert_receipt(raw: RawReceipt) -> ChainResult<TransactionReceipt> {
    let tx_hash = B256::from_str(&raw.transaction_hash).map_err(|e| {
        ChainError::network(format!("receipt: bad hash {}: {e}", raw.transaction_hash))
    })?;
    let status = match raw.status.as_deref().and_then(hex_to_u64) {
        Some(0) => TxStatus::Failed,
        // Pre-Byzantium receipts have no status field; a mined receipt
        // without one is treated as success.
        _ => TxStatus::Success,
    };
    Ok(TransactionReceipt {
        tx_hash,
        status,
        block_number: raw.block_number.as_deref().and_then(hex_to_u64),
        gas_used: raw.gas_used.as_deref().and_then(hex_to_u64),
    })
}

fn decode_hex_value(method: &str, value: Value) -> ChainResult<Vec<u8>> {
    let raw: String = serde_json::from_value(value)
        .map_err(|e| ChainError::network(format!("{method}: {e}")))?;
    hex::decode(raw.trim_start_matches("0x"))
        .map_err(|e| ChainError::network(format!("{method}: bad hex {raw}: {e}")))
}

fn hex_to_u64(s: &str) -> Option<u64> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16).ok()
}

/// Classify an RPC error object. Revert payloads (the node rejected the
/// execution) are separated from transport-level failures.
fn rpc_error(method: &str, error: RpcErrorBody) -> ChainError {
    if let Some(Value::String(data)) = &error.data {
        if let Ok(bytes) = hex::decode(data.trim_start_matches("0x")) {
            if let Some(reason) = abi::decode_revert(&bytes) {
                return ChainError::revert(reason);
            }
        }
    }
    if error.message.to_ascii_lowercase().contains("revert") {
        return ChainError::revert(error.message);
    }
    ChainError::network(format!("{method}: {}", error.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{encode_tokens, Token, ERROR_SELECTOR};

    #[test]
    fn hex_helpers() {
        assert_eq!(hex_to_u64("0x1"), Some(1));
        assert_eq!(hex_to_u64("0x38"), Some(56));
        assert_eq!(hex_to_u64("zz"), None);
    }

    #[test]
    fn receipt_status_conversion() {
        let raw = RawReceipt {
            transaction_hash: format!("{:#x}", B256::repeat_byte(0x01)),
            status: Some("0x0".to_string()),
            block_number: Some("0xa".to_string()),
            gas_used: Some("0x5208".to_string()),
        };
        let receipt = convert_receipt(raw).unwrap();
        assert_eq!(receipt.status, TxStatus::Failed);
        assert_eq!(receipt.block_number, Some(10));
        assert_eq!(receipt.gas_used, Some(21_000));
    }

    #[test]
    fn rpc_error_classification() {
        let mut payload = ERROR_SELECTOR.to_vec();
        payload.extend(encode_tokens(&[Token::String("PRICE_FEED_MISSING".into())]));
        let err = rpc_error(
            "eth_call",
            RpcErrorBody {
                code: 3,
                message: "execution reverted".to_string(),
                data: Some(Value::String(format!("0x{}", hex::encode(payload)))),
            },
        );
        assert!(matches!(
            err,
            ChainError::Revert { ref reason } if reason == "PRICE_FEED_MISSING"
        ));

        let err = rpc_error(
            "eth_call",
            RpcErrorBody {
                code: -32000,
                message: "execution reverted".to_string(),
                data: None,
            },
        );
        assert!(err.is_revert());

        let err = rpc_error(
            "eth_call",
            RpcErrorBody {
                code: -32002,
                message: "connection refused".to_string(),
                data: None,
            },
        );
        assert!(!err.is_revert());
    }
}
