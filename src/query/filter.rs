use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::store::Visit;

/// A column filter: everything, or one exact value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Exact(String),
}

impl Selection {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Exact(wanted) => wanted == value,
        }
    }
}

impl FromStr for Selection {
    type Err = Infallible;

    /// `all`, `todos` and the empty string select everything
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todos") {
            Ok(Selection::All)
        } else {
            Ok(Selection::Exact(s.to_string()))
        }
    }
}

impl From<Option<String>> for Selection {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => s.parse().unwrap_or_default(),
            None => Selection::All,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Exact(value) => write!(f, "{value}"),
        }
    }
}

/// Criteria for `VisitStore::query`
#[derive(Debug, Clone, Default)]
pub struct VisitFilter {
    /// Inclusive lower bound on the visit date
    pub min_date: Option<NaiveDate>,
    pub name: Selection,
    pub locality: Selection,
    pub zone: Selection,
}

impl VisitFilter {
    pub fn matches(&self, visit: &Visit) -> bool {
        self.min_date.map_or(true, |d| visit.date >= d)
            && self.name.matches(&visit.name)
            && self.locality.matches(&visit.locality)
            && self.zone.matches(&visit.zone)
    }
}

/// Values present in the visit log for each filterable column
#[derive(Debug, Default, Serialize)]
pub struct FilterOptions {
    pub names: Vec<String>,
    pub localities: Vec<String>,
    pub zones: Vec<String>,
}

impl FilterOptions {
    pub fn from_visits(visits: &[Visit]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            values
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        }

        Self {
            names: distinct(visits.iter().map(|v| v.name.as_str())),
            localities: distinct(visits.iter().map(|v| v.locality.as_str())),
            zones: distinct(visits.iter().map(|v| v.zone.as_str())),
        }
    }
}
