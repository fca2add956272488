//! Sort key and sort direction for the species table.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Column the species table can be ordered by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SortField {
    /// National dex number.
    #[default]
    Number,
    /// Species name.
    Name,
    /// Generation label.
    Generation,
    /// Height.
    Height,
    /// Weight.
    Weight,
}

impl SortField {
    /// Match a `sortBy` parameter, ignoring ASCII case.
    ///
    /// Returns `None` for anything that is not one of the five keys.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "number" => Some(Self::Number),
            "name" => Some(Self::Name),
            "generation" => Some(Self::Generation),
            "height" => Some(Self::Height),
            "weight" => Some(Self::Weight),
            _ => None,
        }
    }

    /// The parameter spelling of this key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
            Self::Generation => "generation",
            Self::Height => "height",
            Self::Weight => "weight",
        }
    }
}

/// Direction of the table ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortOrder {
    /// Interpret a `sortOrder` parameter.
    ///
    /// Only `desc` (any case) reverses the order; everything else,
    /// including a missing value, is ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    /// Whether this is [`SortOrder::Desc`].
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }
}
