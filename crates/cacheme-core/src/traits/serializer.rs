//! Pluggable wire formats used by `Node::serialize`/`deserialize`

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// Maps a format-specific encode/decode failure onto the one
/// `CacheError` variant a `Node` caller needs to handle.
fn wire_err(msg: impl std::fmt::Display) -> CacheError {
    CacheError::SerializerError(msg.to_string())
}

/// A wire format a `Node` can encode its value into and back out of.
///
/// A `Node` picks one by delegating its `serialize`/`deserialize` default
/// methods to a concrete implementation. Built in: JSON, MessagePack,
/// Bincode.
pub trait Serializer: Send + Sync + Clone + 'static {
    /// Short name identifying the format, for logging and `stats()`.
    fn name(&self) -> &'static str;

    /// Encode `value` for storage.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CacheError>;

    /// Decode a value previously produced by `encode`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError>;
}

/// JSON wire format (default). Human-readable, widely compatible.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(value).map_err(wire_err)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError> {
        serde_json::from_slice(bytes).map_err(wire_err)
    }
}

/// MessagePack wire format (optional). Smaller and faster to encode than
/// JSON. Enable with the `msgpack` feature.
#[cfg(feature = "msgpack")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackSerializer;

#[cfg(feature = "msgpack")]
impl Serializer for MsgPackSerializer {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CacheError> {
        rmp_serde::to_vec(value).map_err(wire_err)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError> {
        rmp_serde::from_slice(bytes).map_err(wire_err)
    }
}

/// Bincode wire format (optional). Fastest, not cross-language, not
/// self-describing. Enable with the `bincode` feature.
#[cfg(feature = "bincode")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeSerializer;

#[cfg(feature = "bincode")]
impl Serializer for BincodeSerializer {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CacheError> {
        bincode::serde::encode_to_vec(value, bincode::config::standard()).map_err(wire_err)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError> {
        let (val, _len) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard()).map_err(wire_err)?;
        Ok(val)
    }
}
