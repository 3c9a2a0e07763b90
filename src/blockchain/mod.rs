pub mod client;
pub mod fetcher;
pub mod models;
pub mod node_selector;
pub mod resolver;

// Re-exports for convenience
pub use client::{ClientError, HttpTransport, RpcTransport};
pub use fetcher::{BlockFetcher, FetchPolicy, NodeRotation};
pub use models::Block;
pub use resolver::height_at_date;
