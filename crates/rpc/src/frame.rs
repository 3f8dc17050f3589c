//! Wire frames and their codec.
//!
//! Every frame is a 4-byte big-endian length prefix followed by a bincode
//! body. [`framed`] wraps any byte stream in the length-delimited codec; the
//! `encode`/`decode` helpers turn frame bodies into typed values.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::RpcError;

/// Largest frame either side will read or write.
pub const MAX_FRAME_LENGTH: usize = 1024 * 1024;

/// Procedure on the log service that records one entry.
pub const LOG_INFO_METHOD: &str = "RPCServer.LogInfo";

/// A call from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcCall {
    /// Echoed by the reply; lets the client detect a crossed stream.
    pub seq: u64,
    pub method: String,
    /// bincode-encoded arguments for `method`.
    pub args: Vec<u8>,
}

/// A reply from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcReply {
    pub seq: u64,
    /// bincode-encoded result, or the error string the procedure returned.
    pub outcome: Result<Vec<u8>, String>,
}

/// Arguments of [`LOG_INFO_METHOD`]. The result is a `String`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogArgs {
    pub name: String,
    pub data: String,
}

/// Wraps `io` in the length-delimited frame codec.
pub fn framed<T>(io: T) -> Framed<T, LengthDelimitedCodec>
where
    T: AsyncRead + AsyncWrite,
{
    let codec = LengthDelimitedCodec::builder()
        .big_endian()
        .length_field_length(4)
        .max_frame_length(MAX_FRAME_LENGTH)
        .new_codec();
    Framed::new(io, codec)
}

/// Encodes `value` as a frame body.
///
/// # Errors
///
/// [`RpcError::Codec`] if bincode rejects the value.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, RpcError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|err| RpcError::Codec(err.to_string()))
}

/// Encodes `value` as a frame ready for the sink.
pub(crate) fn encode_frame<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, RpcError> {
    encode(value).map(Bytes::from)
}

/// Decodes a frame body.
///
/// # Errors
///
/// [`RpcError::Codec`] if the bytes are not a valid encoding of `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RpcError> {
    bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map(|(value, _)| value)
        .map_err(|err| RpcError::Codec(err.to_string()))
}
