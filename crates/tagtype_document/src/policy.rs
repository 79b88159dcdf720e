//! How timestamp payloads are written to documents.
//!
//! The codec wraps the payload in `{ "@@timestamp": ... }`, so the policy only
//! decides the payload's shape.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::Document;

const SECONDS_KEY: &str = "_seconds";
const NANOS_KEY: &str = "_nanoseconds";

/// Wire representation of timestamps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimestampPolicy {
    /// `{ "_seconds": i64, "_nanoseconds": u32 }`, the shape document stores
    /// use for native timestamps.
    #[default]
    Seconds,
    /// An RFC 3339 string in UTC.
    Rfc3339,
}

impl TimestampPolicy {
    /// Encodes a timestamp payload.
    #[must_use]
    pub fn encode(self, t: &DateTime<Utc>) -> serde_json::Value {
        match self {
            Self::Seconds => json!({
                SECONDS_KEY: t.timestamp(),
                NANOS_KEY: t.timestamp_subsec_nanos(),
            }),
            Self::Rfc3339 => serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }

    /// Reads back a payload written by [`encode`](Self::encode) under the
    /// same policy.
    #[must_use]
    pub fn decode(self, json: &serde_json::Value) -> Option<DateTime<Utc>> {
        match (self, json) {
            (Self::Seconds, serde_json::Value::Object(doc)) => decode_seconds(doc),
            (Self::Rfc3339, serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }
}

fn decode_seconds(doc: &Document) -> Option<DateTime<Utc>> {
    if doc.len() != 2 {
        return None;
    }
    let seconds = doc.get(SECONDS_KEY)?.as_i64()?;
    let nanos = u32::try_from(doc.get(NANOS_KEY)?.as_u64()?).ok()?;
    DateTime::from_timestamp(seconds, nanos)
}
