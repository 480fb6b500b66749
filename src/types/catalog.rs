use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookwormError;

/// Lower and upper bound (inclusive, lexical) of the fiction classification range.
pub const FICTION_RANGE: (&str, &str) = ("800", "900");

/// Which part of a user's shelf to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFilter {
    #[default]
    All,
    Fiction,
    Nonfiction,
}

impl CatalogFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Fiction => "fiction",
            Self::Nonfiction => "nonfiction",
        }
    }

    /// Unknown values degrade to [`CatalogFilter::All`].
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Extra `WHERE` fragment restricting `classification`; empty for `All`.
    /// Non-empty fragments take the two [`FICTION_RANGE`] bounds as parameters.
    pub(crate) fn sql_predicate(&self) -> &'static str {
        match self {
            Self::All => "",
            Self::Fiction => " AND classification BETWEEN ? AND ?",
            Self::Nonfiction => " AND classification NOT BETWEEN ? AND ?",
        }
    }

    /// Bind values for [`Self::sql_predicate`].
    pub(crate) fn sql_bounds(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::All => None,
            Self::Fiction | Self::Nonfiction => Some(FICTION_RANGE),
        }
    }

    /// In-memory equivalent of [`Self::sql_predicate`].
    pub fn matches(&self, classification: &str) -> bool {
        let (lo, hi) = FICTION_RANGE;
        let fiction = classification >= lo && classification <= hi;
        match self {
            Self::All => true,
            Self::Fiction => fiction,
            Self::Nonfiction => !fiction,
        }
    }
}

impl FromStr for CatalogFilter {
    type Err = BookwormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "fiction" => Ok(Self::Fiction),
            "nonfiction" => Ok(Self::Nonfiction),
            other => Err(BookwormError::InvalidField {
                field: "filter",
                reason: format!("unknown filter `{other}`"),
            }),
        }
    }
}

impl fmt::Display for CatalogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column the shelf is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Pk,
    Title,
    Author,
    Classification,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pk => "pk",
            Self::Title => "title",
            Self::Author => "author",
            Self::Classification => "classification",
        }
    }

    /// Unknown values degrade to primary-key order.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// `ORDER BY` clause; ties always fall back to insertion order.
    pub(crate) fn sql_order(&self) -> &'static str {
        match self {
            Self::Pk => " ORDER BY pk",
            Self::Title => " ORDER BY title, pk",
            Self::Author => " ORDER BY author, pk",
            Self::Classification => " ORDER BY classification, pk",
        }
    }
}

impl FromStr for SortColumn {
    type Err = BookwormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pk" => Ok(Self::Pk),
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "classification" => Ok(Self::Classification),
            other => Err(BookwormError::InvalidField {
                field: "sortBy",
                reason: format!("unknown sort column `{other}`"),
            }),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        assert_eq!(CatalogFilter::parse_or_default("poetry"), CatalogFilter::All);
        assert_eq!(CatalogFilter::parse_or_default(""), CatalogFilter::All);
        assert_eq!(SortColumn::parse_or_default("isbn"), SortColumn::Pk);
        assert_eq!(SortColumn::parse_or_default("pk; DROP TABLE books"), SortColumn::Pk);
        assert!("Fiction".parse::<CatalogFilter>().is_err());
    }

    #[test]
    fn known_values_round_trip_through_as_str() {
        for f in [CatalogFilter::All, CatalogFilter::Fiction, CatalogFilter::Nonfiction] {
            assert_eq!(CatalogFilter::parse_or_default(f.as_str()), f);
        }
        for c in [
            SortColumn::Pk,
            SortColumn::Title,
            SortColumn::Author,
            SortColumn::Classification,
        ] {
            assert_eq!(SortColumn::parse_or_default(c.as_str()), c);
        }
    }

    #[test]
    fn fiction_range_is_lexical_and_inclusive() {
        assert!(CatalogFilter::Fiction.matches("800"));
        assert!(CatalogFilter::Fiction.matches("823.8"));
        assert!(CatalogFilter::Fiction.matches("900"));
        assert!(!CatalogFilter::Fiction.matches("900.1"));
        assert!(!CatalogFilter::Fiction.matches("79"));
        assert!(!CatalogFilter::Fiction.matches(""));
        assert!(CatalogFilter::Nonfiction.matches(""));
        assert!(CatalogFilter::Nonfiction.matches("510"));
    }
}
