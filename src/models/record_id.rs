use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix carried by identities that were never persisted.
pub const TEMP_PREFIX: &str = "temp_";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identity of a trainee, program or history entry.
///
/// Durable ids come from the backend: the REST API hands out numeric ids
/// (epoch millis), SQLite hands out rowids. Temporary ids are minted on the
/// client before the first save and always start with [`TEMP_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Mint a fresh client-side identity.
    pub fn temporary() -> Self {
        let millis = chrono::Local::now().timestamp_millis();
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{TEMP_PREFIX}{millis}_{seq}"))
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMP_PREFIX)
    }

    pub fn is_durable(&self) -> bool {
        !self.is_temporary()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form, used by the SQLite backend and the JSON wire format.
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Numeric ids travel as JSON numbers; the API matches `"id":123` literally.
impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_i64() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer record id")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                Ok(RecordId::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                Ok(RecordId(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RecordId, E> {
                if v.fract() == 0.0 {
                    Ok(RecordId((v as i64).to_string()))
                } else {
                    Err(E::custom(format!("non-integer record id {v}")))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                Ok(RecordId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
