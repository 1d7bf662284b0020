//! Fan-out topics
//!
//! Three topic families:
//!
//! - `order:{id}` - one order's lifecycle, watched by the diner and the
//!   assigned staff
//! - `table:{id}` - one table's occupancy, watched by the table board
//! - `kitchen:all` - firehose of every committed mutation, watched by the
//!   chef and staff dashboards

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named fan-out channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Single order stream, keyed by the order id
    Order(String),
    /// Single table stream, keyed by the table id
    Table(String),
    /// Everything, for the kitchen dashboards
    KitchenAll,
}

impl Topic {
    pub fn order(id: impl Into<String>) -> Self {
        Self::Order(id.into())
    }

    pub fn table(id: impl Into<String>) -> Self {
        Self::Table(id.into())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order(id) => write!(f, "order:{id}"),
            Self::Table(id) => write!(f, "table:{id}"),
            Self::KitchenAll => f.write_str("kitchen:all"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid topic '{0}', expected order:{{id}}, table:{{id}} or kitchen:all")]
pub struct TopicParseError(pub String);

impl FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("order", id)) if !id.is_empty() => Ok(Self::Order(id.to_string())),
            Some(("table", id)) if !id.is_empty() => Ok(Self::Table(id.to_string())),
            Some(("kitchen", "all")) => Ok(Self::KitchenAll),
            _ => Err(TopicParseError(s.to_string())),
        }
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
