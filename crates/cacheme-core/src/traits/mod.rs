//! Core traits for cache operations

mod doorkeeper;
mod metrics;
mod node;
mod serializer;
mod storage;

pub use doorkeeper::Doorkeeper;
pub use metrics::Metrics;
pub use node::Node;
pub use serializer::{JsonSerializer, Serializer};
pub use storage::Storage;

#[cfg(feature = "msgpack")]
pub use serializer::MsgPackSerializer;

#[cfg(feature = "bincode")]
pub use serializer::BincodeSerializer;
