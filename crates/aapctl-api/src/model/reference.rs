//! Foreign references between controller objects.
//!
//! Callers usually hold references in symbolic (string) form, e.g. from a
//! config file. A reference is either unset, a positive remote identity, or
//! raw text that could not be read as one. Invalid input is kept verbatim so
//! it can be reported instead of silently dropped.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};

use super::ResourceId;

/// A typed pointer to another object's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ForeignRef {
    /// No reference. Omitted from request bodies.
    #[default]
    Unset,
    /// Symbolic input that is not an integer.
    Invalid(String),
    /// A concrete remote identity, always `> 0`.
    Ref(ResourceId),
}

impl ForeignRef {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// The referenced identity, if one is set.
    pub fn id(&self) -> Option<ResourceId> {
        match self {
            Self::Ref(id) => Some(*id),
            Self::Unset | Self::Invalid(_) => None,
        }
    }
}

impl From<ResourceId> for ForeignRef {
    /// Non-positive identities mean "no reference".
    fn from(id: ResourceId) -> Self {
        if id > 0 { Self::Ref(id) } else { Self::Unset }
    }
}

impl From<Option<ResourceId>> for ForeignRef {
    fn from(id: Option<ResourceId>) -> Self {
        id.map_or(Self::Unset, Self::from)
    }
}

impl FromStr for ForeignRef {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Unset);
        }
        Ok(trimmed
            .parse::<ResourceId>()
            .map_or_else(|_| Self::Invalid(raw.to_owned()), Self::from))
    }
}

impl fmt::Display for ForeignRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => Ok(()),
            Self::Invalid(raw) => f.write_str(raw),
            Self::Ref(id) => write!(f, "{id}"),
        }
    }
}

// ── Wire format ──────────────────────────────────────────────────────

impl Serialize for ForeignRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ref(id) => serializer.serialize_i64(*id),
            Self::Unset => serializer.serialize_none(),
            Self::Invalid(raw) => Err(ser::Error::custom(format!(
                "invalid foreign reference {raw:?}"
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireRef {
    Int(ResourceId),
    Text(String),
}

impl<'de> Deserialize<'de> for ForeignRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<WireRef>::deserialize(deserializer)? {
            None => Ok(Self::Unset),
            Some(WireRef::Int(id)) => Ok(Self::from(id)),
            Some(WireRef::Text(raw)) => match raw.parse::<Self>() {
                Ok(Self::Invalid(raw)) => Err(de::Error::custom(format!(
                    "foreign reference is not an integer: {raw:?}"
                ))),
                Ok(parsed) => Ok(parsed),
                Err(never) => match never {},
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ForeignRef {
        raw.parse().unwrap()
    }

    #[test]
    fn non_positive_ids_are_unset() {
        assert_eq!(ForeignRef::from(0), ForeignRef::Unset);
        assert_eq!(ForeignRef::from(-3), ForeignRef::Unset);
        assert_eq!(ForeignRef::from(7), ForeignRef::Ref(7));
    }

    #[test]
    fn parsing_symbolic_input() {
        assert_eq!(parse(""), ForeignRef::Unset);
        assert_eq!(parse("0"), ForeignRef::Unset);
        assert_eq!(parse(" 12 "), ForeignRef::Ref(12));
        assert_eq!(parse("twelve"), ForeignRef::Invalid("twelve".into()));
    }

    #[test]
    fn display_is_symbolic_form() {
        assert_eq!(ForeignRef::Ref(5).to_string(), "5");
        assert_eq!(ForeignRef::Unset.to_string(), "");
        assert_eq!(ForeignRef::Invalid("abc".into()).to_string(), "abc");
    }

    #[test]
    fn serializing_invalid_is_an_error() {
        assert!(serde_json::to_string(&ForeignRef::Invalid("x".into())).is_err());
        assert_eq!(serde_json::to_string(&ForeignRef::Ref(4)).unwrap(), "4");
    }

    #[test]
    fn deserializes_int_string_and_null() {
        let r: ForeignRef = serde_json::from_str("9").unwrap();
        assert_eq!(r, ForeignRef::Ref(9));
        let r: ForeignRef = serde_json::from_str("\"9\"").unwrap();
        assert_eq!(r, ForeignRef::Ref(9));
        let r: ForeignRef = serde_json::from_str("null").unwrap();
        assert_eq!(r, ForeignRef::Unset);
        assert!(serde_json::from_str::<ForeignRef>("\"nine\"").is_err());
    }
}
