/// ID types for Soundscape Control entities
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::catalog::SoundType;
use crate::error::{CoreError, Result};

/// Accepts either a JSON number or a JSON string for numeric identifiers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

/// Numeric identifier of a mood, element or sample.
///
/// Moods and elements share one numeric namespace; the service reports
/// every playback event against an `ElementId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Create a new element ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner number
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse an id that may carry a prefix such as `m:` or `e:`.
    ///
    /// Everything up to the last `:` is discarded and the remainder must be
    /// an unsigned integer. Returns `None` otherwise.
    pub fn from_prefixed(raw: &str) -> Option<Self> {
        let digits = raw.rsplit(':').next().unwrap_or(raw).trim();
        digits.parse::<u64>().ok().map(Self)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ElementId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for ElementId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_prefixed(s).ok_or_else(|| CoreError::InvalidId(s.to_string()))
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(Self(n)),
            RawId::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A sound reference as written by users, hosts and the catalog export.
///
/// Either a bare number (`1234`) or a type-prefixed string (`m:1234`,
/// `e:1234`). The prefix is the only thing that disambiguates a mood from an
/// element with the same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId {
    kind: Option<SoundType>,
    number: ElementId,
}

impl SoundId {
    /// Create a type-qualified sound ID
    pub const fn typed(kind: SoundType, number: ElementId) -> Self {
        Self {
            kind: Some(kind),
            number,
        }
    }

    /// Create a bare sound ID without a type prefix
    pub const fn bare(number: ElementId) -> Self {
        Self { kind: None, number }
    }

    /// Parse `1234`, `m:1234` or `e:1234` (surrounding whitespace allowed).
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (kind, digits) = match trimmed.split_once(':') {
            Some((prefix, rest)) => {
                let kind = SoundType::from_prefix(prefix.trim())
                    .ok_or_else(|| CoreError::InvalidId(raw.to_string()))?;
                (Some(kind), rest.trim())
            }
            None => (None, trimmed),
        };

        let number = digits
            .parse::<u64>()
            .map_err(|_| CoreError::InvalidId(raw.to_string()))?;

        Ok(Self {
            kind,
            number: ElementId(number),
        })
    }

    /// The type encoded in the prefix, if any
    pub const fn kind(&self) -> Option<SoundType> {
        self.kind
    }

    /// The numeric part, with the prefix stripped
    pub const fn element_id(&self) -> ElementId {
        self.number
    }

    /// Returns this id qualified with `kind` unless it already carries a type.
    pub const fn or_kind(self, kind: SoundType) -> Self {
        match self.kind {
            Some(_) => self,
            None => Self::typed(kind, self.number),
        }
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{}:{}", kind.prefix(), self.number),
            None => write!(f, "{}", self.number),
        }
    }
}

impl FromStr for SoundId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<ElementId> for SoundId {
    fn from(id: ElementId) -> Self {
        Self::bare(id)
    }
}

impl From<u64> for SoundId {
    fn from(id: u64) -> Self {
        Self::bare(ElementId(id))
    }
}

impl Serialize for SoundId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SoundId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(Self::from(n)),
            RawId::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
