use crate::blockchain::client::{ClientError, RpcTransport};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// Return the index of the first node that answers `get_info` within `timeout`.
///
/// No retries happen here; moving on to the next candidate is the retry.
pub async fn select_working_node<T: RpcTransport + ?Sized>(
    transport: &T,
    nodes: &[String],
    timeout: Duration,
) -> Result<usize, ClientError> {
    for (index, node) in nodes.iter().enumerate() {
        match transport
            .call_once(node, "get_info", json!({}), Some(timeout))
            .await
        {
            Ok(_) => {
                info!("Connected to node: {}", node);
                return Ok(index);
            }
            Err(e) => warn!("Failed to connect to node {}: {}", node, e),
        }
    }

    Err(ClientError::NoAvailableNode(nodes.len()))
}
