use serde::{Deserialize, Serialize};

/// Message returned by a Put that reached every peer.
pub const MSG_STORED_AND_REPLICATED: &str = "Stored and replicated";
/// Message returned by a peer after applying a replicated write.
pub const MSG_APPLIED: &str = "applied";

/// A single key/value pair, used both as the Put/Replicate request body and as
/// one line of a List stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Application-level acknowledgment for Put and Replicate.
///
/// A non-ok ack is still a successful call at the transport level; the
/// `message` carries what went wrong (empty key, peers that missed the write).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Ack {
    pub ok: bool,
    pub message: String,
}

impl Ack {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn not_ok(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GetRequest {
    pub key: String,
}

/// Response for Get. Absent keys come back as an empty `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GetResponse {
    pub value: String,
}
