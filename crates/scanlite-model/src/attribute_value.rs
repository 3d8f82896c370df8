//! `AttributeValue` type with well-formedness checks and custom serialization.
//!
//! `AttributeValue` is a tagged union where exactly one variant is present.
//! The JSON wire format uses single-key objects like `{"S": "hello"}`.
//!
//! Requests carry values in their loose wire form, [`RawAttributeValue`],
//! which may have zero or several tags populated. [`AttributeValue::from_raw`]
//! is the single place that turns the wire form into a checked value.

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::number::{Number, NumberError};

/// An item: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// Attribute value.
///
/// Numbers are exact decimals, binary values hold decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    /// String value.
    S(String),
    /// Number value.
    N(Number),
    /// Binary value (base64-encoded in JSON).
    B(Bytes),
    /// String Set.
    Ss(Vec<String>),
    /// Number Set.
    Ns(Vec<Number>),
    /// Binary Set (base64-encoded in JSON).
    Bs(Vec<Bytes>),
}

/// Scalar type tags, as used in key schemas and operand checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// String.
    S,
    /// Number.
    N,
    /// Binary.
    B,
}

impl ScalarType {
    /// Returns the type descriptor string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a wire value is not a usable `AttributeValue`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeValueError {
    /// No supported tag is populated.
    #[error(
        "Supplied AttributeValue is empty, must contain exactly one of the supported datatypes"
    )]
    Empty,
    /// More than one tag is populated.
    #[error(
        "Supplied AttributeValue has more than one datatypes set, must contain exactly one of the supported datatypes"
    )]
    MultipleTypes,
    /// Empty `S`, or an empty `SS` member.
    #[error(
        "One or more parameter values were invalid: An AttributeValue may not contain an empty string."
    )]
    EmptyString,
    /// Empty `B`.
    #[error(
        "One or more parameter values were invalid: An AttributeValue may not contain an empty binary type."
    )]
    EmptyBinary,
    /// A set with no members.
    #[error(
        "One or more parameter values were invalid: An AttributeValue may not contain an empty set."
    )]
    EmptySet,
    /// A `BS` member that is null or empty.
    #[error(
        "One or more parameter values were invalid: Binary sets may not contain null or empty values"
    )]
    EmptyBinarySetMember,
    /// A set with repeated members. Holds the rendered collection.
    #[error("One or more parameter values were invalid: Input collection {0} contains duplicates.")]
    Duplicates(String),
    /// Binary text that is not base64.
    #[error("Invalid base64 binary value: {0}")]
    InvalidBinary(String),
    /// `N` or `NS` member that is not a number.
    #[error(transparent)]
    Number(#[from] NumberError),
}

/// Wire form of an attribute value, before well-formedness checks.
///
/// Unknown tags are ignored and `null` tags count as absent. Binary members
/// hold base64 text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAttributeValue {
    #[serde(rename = "S", default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(rename = "B", default, skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
    #[serde(rename = "SS", default, skip_serializing_if = "Option::is_none")]
    pub ss: Option<Vec<Option<String>>>,
    #[serde(rename = "NS", default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<Vec<Option<String>>>,
    #[serde(rename = "BS", default, skip_serializing_if = "Option::is_none")]
    pub bs: Option<Vec<Option<String>>>,
}

impl RawAttributeValue {
    fn populated_tags(&self) -> usize {
        [
            self.s.is_some(),
            self.n.is_some(),
            self.b.is_some(),
            self.ss.is_some(),
            self.ns.is_some(),
            self.bs.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

impl From<&AttributeValue> for RawAttributeValue {
    fn from(value: &AttributeValue) -> Self {
        let mut raw = Self::default();
        match value {
            AttributeValue::S(s) => raw.s = Some(s.clone()),
            AttributeValue::N(n) => raw.n = Some(n.as_str().to_owned()),
            AttributeValue::B(b) => raw.b = Some(BASE64.encode(b)),
            AttributeValue::Ss(v) => raw.ss = Some(v.iter().cloned().map(Some).collect()),
            AttributeValue::Ns(v) => {
                raw.ns = Some(v.iter().map(|n| Some(n.as_str().to_owned())).collect());
            }
            AttributeValue::Bs(v) => raw.bs = Some(v.iter().map(|b| Some(BASE64.encode(b))).collect()),
        }
        raw
    }
}

impl AttributeValue {
    /// Checks a wire value and converts it into an `AttributeValue`.
    ///
    /// Exactly one tag must be populated; checks for the populated tag run in
    /// a fixed order: emptiness of the value or set, then each member, then
    /// duplicate members.
    pub fn from_raw(raw: &RawAttributeValue) -> Result<Self, AttributeValueError> {
        match raw.populated_tags() {
            0 => return Err(AttributeValueError::Empty),
            1 => {}
            _ => return Err(AttributeValueError::MultipleTypes),
        }

        if let Some(s) = &raw.s {
            if s.is_empty() {
                return Err(AttributeValueError::EmptyString);
            }
            return Ok(Self::S(s.clone()));
        }
        if let Some(n) = &raw.n {
            return Ok(Self::N(Number::parse(n)?));
        }
        if let Some(b) = &raw.b {
            let bytes = decode_binary(b)?;
            if bytes.is_empty() {
                return Err(AttributeValueError::EmptyBinary);
            }
            return Ok(Self::B(bytes));
        }
        if let Some(members) = &raw.ss {
            require_members(members)?;
            let values = members
                .iter()
                .map(|m| match m.as_deref() {
                    None | Some("") => Err(AttributeValueError::EmptyString),
                    Some(s) => Ok(s.to_owned()),
                })
                .collect::<Result<Vec<_>, _>>()?;
            reject_duplicates(&values, members)?;
            return Ok(Self::Ss(values));
        }
        if let Some(members) = &raw.ns {
            require_members(members)?;
            let values = members
                .iter()
                .map(|m| Number::parse(m.as_deref().unwrap_or_default()))
                .collect::<Result<Vec<_>, _>>()?;
            reject_duplicates(&values, members)?;
            return Ok(Self::Ns(values));
        }
        if let Some(members) = &raw.bs {
            require_members(members)?;
            let values = members
                .iter()
                .map(|m| match m.as_deref() {
                    None | Some("") => Err(AttributeValueError::EmptyBinarySetMember),
                    Some(b) => decode_binary(b).and_then(|bytes| {
                        if bytes.is_empty() {
                            Err(AttributeValueError::EmptyBinarySetMember)
                        } else {
                            Ok(bytes)
                        }
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            reject_duplicates(&values, members)?;
            return Ok(Self::Bs(values));
        }
        Err(AttributeValueError::Empty)
    }

    /// Parses a JSON value in wire form.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, AttributeValueError> {
        let raw = RawAttributeValue::deserialize(value).map_err(|_| AttributeValueError::Empty)?;
        Self::from_raw(&raw)
    }

    /// Converts back to wire form.
    #[must_use]
    pub fn to_raw(&self) -> RawAttributeValue {
        RawAttributeValue::from(self)
    }

    /// Returns the type descriptor string (e.g., "S", "NS").
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
        }
    }

    /// Returns the scalar type, or `None` for sets.
    #[must_use]
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Self::S(_) => Some(ScalarType::S),
            Self::N(_) => Some(ScalarType::N),
            Self::B(_) => Some(ScalarType::B),
            Self::Ss(_) | Self::Ns(_) | Self::Bs(_) => None,
        }
    }

    /// Returns `true` for the three set variants.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.scalar_type().is_none()
    }

    /// Returns the string value if this is an `S` variant.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is an `N` variant.
    #[must_use]
    pub fn as_n(&self) -> Option<&Number> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// Applies the number limits to every number this value holds.
    pub fn check_number_limits(&self) -> Result<(), NumberError> {
        match self {
            Self::N(n) => n.check_limits(),
            Self::Ns(v) => v.iter().try_for_each(Number::check_limits),
            _ => Ok(()),
        }
    }
}

fn decode_binary(text: &str) -> Result<Bytes, AttributeValueError> {
    BASE64
        .decode(text)
        .map(Bytes::from)
        .map_err(|_| AttributeValueError::InvalidBinary(text.to_owned()))
}

fn require_members(members: &[Option<String>]) -> Result<(), AttributeValueError> {
    if members.is_empty() {
        Err(AttributeValueError::EmptySet)
    } else {
        Ok(())
    }
}

fn reject_duplicates<T: PartialEq>(
    values: &[T],
    members: &[Option<String>],
) -> Result<(), AttributeValueError> {
    let duplicated = values
        .iter()
        .enumerate()
        .any(|(i, v)| values[..i].contains(v));
    if duplicated {
        let rendered: Vec<&str> = members.iter().map(|m| m.as_deref().unwrap_or("null")).collect();
        return Err(AttributeValueError::Duplicates(format!("[{}]", rendered.join(", "))));
    }
    Ok(())
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "{{S: {s}}}"),
            Self::N(n) => write!(f, "{{N: {n}}}"),
            Self::B(b) => write!(f, "{{B: {} bytes}}", b.len()),
            Self::Ss(v) => write!(f, "{{SS: {v:?}}}"),
            Self::Ns(v) => {
                let texts: Vec<&str> = v.iter().map(Number::as_str).collect();
                write!(f, "{{NS: {texts:?}}}")
            }
            Self::Bs(v) => write!(f, "{{BS: {} items}}", v.len()),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::S(s) => map.serialize_entry("S", s)?,
            Self::N(n) => map.serialize_entry("N", n)?,
            Self::B(b) => map.serialize_entry("B", &BASE64.encode(b))?,
            Self::Ss(v) => map.serialize_entry("SS", v)?,
            Self::Ns(v) => map.serialize_entry("NS", v)?,
            Self::Bs(v) => {
                let encoded: Vec<String> = v.iter().map(|b| BASE64.encode(b)).collect();
                map.serialize_entry("BS", &encoded)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawAttributeValue::deserialize(deserializer)?;
        Self::from_raw(&raw).map_err(serde::de::Error::custom)
    }
}
