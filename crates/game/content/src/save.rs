//! Versioned, checksummed save envelope.
//!
//! A save is `{ version, checksum, payload }`. The checksum is FNV-1a 32-bit over
//! the payload serialized as JSON with object keys sorted, so the same state
//! always hashes the same no matter how it was produced.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vale_core::{Team, TowerRunState};

use crate::validation::{IssueKind, ValidationIssue};

/// Envelope version written by this build.
pub const SAVE_VERSION: u32 = 1;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a 32-bit hash.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Rebuilds every object in `value` with its keys in sorted order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Checksum of a JSON value in its key-sorted serialization.
pub fn payload_checksum(payload: &Value) -> u32 {
    let canonical = sort_keys(payload.clone()).to_string();
    fnv1a_32(canonical.as_bytes())
}

/// What a player save holds: the campaign party and the tower run in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSave {
    pub team: Team,
    #[serde(default)]
    pub run: Option<TowerRunState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub checksum: u32,
    pub payload: Value,
}

impl SaveEnvelope {
    /// Serializes `payload` and stamps it with the current version and checksum.
    pub fn seal<T: Serialize>(payload: &T) -> Result<Self, ValidationIssue> {
        let payload = serde_json::to_value(payload).map_err(|e| {
            ValidationIssue::new(IssueKind::Malformed, "payload", e.to_string())
        })?;
        let payload = sort_keys(payload);
        Ok(Self {
            version: SAVE_VERSION,
            checksum: payload_checksum(&payload),
            payload,
        })
    }

    /// Verifies version and checksum, then decodes the payload.
    pub fn open<T: DeserializeOwned>(&self) -> Result<T, ValidationIssue> {
        if self.version != SAVE_VERSION {
            tracing::warn!(version = self.version, "rejected save with unknown version");
            return Err(ValidationIssue::new(
                IssueKind::UnsupportedVersion,
                "version",
                format!("save version {} is not supported (expected {SAVE_VERSION})", self.version),
            ));
        }

        let actual = payload_checksum(&self.payload);
        if actual != self.checksum {
            tracing::warn!(
                expected = self.checksum,
                actual,
                "rejected save with checksum mismatch"
            );
            return Err(ValidationIssue::new(
                IssueKind::ChecksumMismatch,
                "checksum",
                format!("stored {:08x}, computed {actual:08x}", self.checksum),
            ));
        }

        serde_json::from_value(self.payload.clone())
            .map_err(|e| ValidationIssue::new(IssueKind::Malformed, "payload", e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ValidationIssue> {
        serde_json::to_string(self)
            .map_err(|e| ValidationIssue::new(IssueKind::Malformed, "envelope", e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ValidationIssue> {
        serde_json::from_str(json)
            .map_err(|e| ValidationIssue::new(IssueKind::Malformed, "envelope", e.to_string()))
    }
}
