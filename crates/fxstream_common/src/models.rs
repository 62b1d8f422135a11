use crate::{Error, Result, utils::parse_decimal};
use bon::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Field holding the provider's refresh time, e.g. `2024-01-15 10:00:00`.
pub const LAST_REFRESHED: &str = "last_refreshed";

/// Number of leading characters of `last_refreshed` used as the partition key.
pub const PARTITION_KEY_LEN: usize = 10;

/// A single value in a quote record.
///
/// Numbers are kept as [`Decimal`] so that monetary values survive the trip
/// through the stream and into the table without binary float rounding.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A value that parsed as a decimal number
    Number(Decimal),

    /// Anything else, passed through unchanged
    Text(String),
}

impl FieldValue {
    /// Returns the decimal if this is a number.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(d) => Some(*d),
            Self::Text(_) => None,
        }
    }

    /// Returns the string if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(d) => write!(f, "{}", d),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            // The decimal text goes out verbatim as a JSON number.
            Self::Number(d) => serde_json::Number::from_str(&d.to_string())
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            serde_json::Value::Number(n) => {
                let text = n.to_string();
                parse_decimal(&text).map(Self::Number).ok_or_else(|| {
                    de::Error::custom(format!(
                        "number not exactly representable as a decimal: {}",
                        text
                    ))
                })
            }
            other => Err(de::Error::custom(format!(
                "expected a number or a string, found {}",
                other
            ))),
        }
    }
}

/// A normalized exchange-rate observation.
///
/// Keys are the normalized provider labels plus the fields added by the
/// producer (`timestamp`, `from_symbol`, `to_symbol`, `ticker`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl QuoteRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing and returning any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Get a field by key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Render a field as text, whatever its type.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(ToString::to_string)
    }

    /// The provider's refresh time.
    pub fn last_refreshed(&self) -> Result<String> {
        self.text(LAST_REFRESHED)
            .ok_or_else(|| Error::Validation(format!("Quote record has no {} field", LAST_REFRESHED)))
    }

    /// The stream partition key: the date part of `last_refreshed`.
    pub fn partition_key(&self) -> Result<String> {
        Ok(self.last_refreshed()?.chars().take(PARTITION_KEY_LEN).collect())
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<BTreeMap<String, FieldValue>> for QuoteRecord {
    fn from(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, FieldValue)> for QuoteRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A currency pair to convert between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct CurrencyPair {
    /// Source currency code, e.g. `USD`
    #[builder(into)]
    pub from: String,

    /// Target currency code, e.g. `EUR`
    #[builder(into)]
    pub to: String,
}

impl CurrencyPair {
    /// The `FROM/TO` ticker for this pair.
    pub fn ticker(&self) -> String {
        format!("{}/{}", self.from, self.to)
    }
}

/// Response returned to the Lambda runtime by both functions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    /// HTTP-style status code, always 200 on success
    pub status_code: u16,

    /// JSON-encoded response body
    pub body: String,
}

impl InvocationResponse {
    /// A 200 response with `body` serialized as JSON.
    pub fn ok<T: Serialize>(body: &T) -> Result<Self> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(body)?,
        })
    }
}
