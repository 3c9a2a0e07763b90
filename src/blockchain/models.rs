use crate::blockchain::client::ClientError;
use serde::Deserialize;
use serde_json::Value;

/// The two shapes node software uses to list a block's transactions.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionList {
    /// Hashes of the non-coinbase transactions only.
    Hashes(Vec<String>),
    /// Full transaction objects, coinbase included.
    Full(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub height: u64,
    pub timestamp: i64,
    pub transactions: TransactionList,
}

impl Block {
    /// Transactions in the block, counting the coinbase exactly once.
    pub fn transaction_count(&self) -> u64 {
        match &self.transactions {
            TransactionList::Hashes(hashes) => hashes.len() as u64 + 1,
            TransactionList::Full(txs) => txs.len() as u64,
        }
    }
}

#[derive(Deserialize)]
struct RawHeader {
    height: Option<u64>,
    timestamp: Option<i64>,
}

#[derive(Deserialize)]
struct RawBlock {
    block_header: Option<RawHeader>,
    height: Option<u64>,
    timestamp: Option<i64>,
    tx_hashes: Option<Vec<String>>,
    transactions: Option<Vec<Value>>,
}

/// Decode a `get_block` result.
///
/// Monero daemons omit `tx_hashes` entirely when the block holds only its
/// coinbase, so a block with neither list is an empty hash list.
pub fn parse_block(requested_height: u64, result: Value) -> Result<Block, ClientError> {
    let raw: RawBlock = serde_json::from_value(result).map_err(|e| {
        ClientError::MalformedResponse(format!("block {}: {}", requested_height, e))
    })?;

    let header = raw.block_header.as_ref();
    let timestamp = header
        .and_then(|h| h.timestamp)
        .or(raw.timestamp)
        .ok_or_else(|| {
            ClientError::MalformedResponse(format!("block {} has no timestamp", requested_height))
        })?;
    let height = header
        .and_then(|h| h.height)
        .or(raw.height)
        .unwrap_or(requested_height);

    if height != requested_height {
        return Err(ClientError::MalformedResponse(format!(
            "asked for block {} but node returned {}",
            requested_height, height
        )));
    }

    let transactions = match (raw.tx_hashes, raw.transactions) {
        (Some(hashes), _) => TransactionList::Hashes(hashes),
        (None, Some(txs)) => TransactionList::Full(txs),
        (None, None) => TransactionList::Hashes(Vec::new()),
    };

    Ok(Block {
        height,
        timestamp,
        transactions,
    })
}

/// Decode a `get_block_count` result into the height of the newest block.
pub fn parse_chain_height(result: Value) -> Result<u64, ClientError> {
    let count = result
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| ClientError::MalformedResponse("get_block_count without count".into()))?;

    count
        .checked_sub(1)
        .ok_or_else(|| ClientError::MalformedResponse("chain reports zero blocks".into()))
}
