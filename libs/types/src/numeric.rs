//! Price type for the order book
//!
//! Uses rust_decimal so that price ordering in the book and the crossing
//! comparison are exact. Serialized as string to prevent JSON number
//! precision loss. Quantities stay integral (`u64`) and are not wrapped.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price with fixed-point decimal representation.
///
/// Must be non-negative; market orders carry [`Price::zero`] as a
/// placeholder since their price is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price from a Decimal.
    ///
    /// # Panics
    /// Panics if the price is negative.
    pub fn new(value: Decimal) -> Self {
        assert!(value >= Decimal::ZERO, "Price must be non-negative");
        Self(value)
    }

    /// Try to create a Price, returning None if negative.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Try to create a Price from a wire float.
    ///
    /// Returns None for negative, NaN, or unrepresentable values.
    pub fn try_from_f64(value: f64) -> Option<Self> {
        Decimal::try_from(value).ok().and_then(Self::try_new)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create from integer (for testing/convenience).
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Result<Self, rust_decimal::Error> {
        let decimal = Decimal::from_str(s)?;
        Ok(Self::new(decimal))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

// Custom serialization to preserve precision
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Self::try_new(decimal).ok_or_else(|| serde::de::Error::custom("Price must be non-negative"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
