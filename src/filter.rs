use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Contains => "contains",
            FilterOperator::Equals => "equals",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
        }
    }

    /// Compares two already lowercased strings.
    fn matches_folded(self, value: &str, needle: &str) -> bool {
        match self {
            FilterOperator::Contains => value.contains(needle),
            FilterOperator::Equals => value == needle,
            FilterOperator::StartsWith => value.starts_with(needle),
            FilterOperator::EndsWith => value.ends_with(needle),
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = LedgerError;

    fn from_str(value: &str) -> LedgerResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "contains" => Ok(FilterOperator::Contains),
            "equals" | "eq" | "=" | "==" => Ok(FilterOperator::Equals),
            "startswith" | "starts_with" => Ok(FilterOperator::StartsWith),
            "endswith" | "ends_with" => Ok(FilterOperator::EndsWith),
            _ => Err(LedgerError::UnknownOperator(value.to_string())),
        }
    }
}

/// A single column filter. At most one predicate per column is active in a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub column: String,
    pub value: String,
    pub operator: FilterOperator,
}

impl FilterPredicate {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        FilterPredicate {
            column: column.into(),
            value: value.into(),
            operator,
        }
    }

    pub fn contains(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Contains, value)
    }

    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::Equals, value)
    }

    /// Case-insensitive match of an extracted column value.
    pub fn matches(&self, value: &str) -> bool {
        self.operator
            .matches_folded(&value.to_lowercase(), &self.value.to_lowercase())
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} '{}'", self.column, self.operator, self.value)
    }
}

impl FromStr for FilterPredicate {
    type Err = LedgerError;

    /// Parses `column <op> value` where `<op>` is `contains`, `equals`, `startswith`,
    /// `endswith`, or `=`. Values may be quoted.
    fn from_str(filter: &str) -> LedgerResult<Self> {
        let trimmed = filter.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::EmptyFilter);
        }

        let lowered = trimmed.to_ascii_lowercase();
        for (needle, op) in [
            (" contains ", FilterOperator::Contains),
            (" equals ", FilterOperator::Equals),
            (" startswith ", FilterOperator::StartsWith),
            (" endswith ", FilterOperator::EndsWith),
        ] {
            if let Some(idx) = lowered.find(needle) {
                let left = trimmed[..idx].trim();
                let right = trimmed[idx + needle.len()..].trim();
                return predicate(trimmed, left, op, right);
            }
        }

        if let Some(idx) = trimmed.find("==").or_else(|| trimmed.find('=')) {
            let width = if trimmed[idx..].starts_with("==") { 2 } else { 1 };
            let left = trimmed[..idx].trim();
            let right = trimmed[idx + width..].trim();
            return predicate(trimmed, left, FilterOperator::Equals, right);
        }

        Err(LedgerError::MalformedFilter(trimmed.to_string()))
    }
}

fn predicate(
    expression: &str,
    column: &str,
    operator: FilterOperator,
    raw_value: &str,
) -> LedgerResult<FilterPredicate> {
    if column.is_empty() {
        return Err(LedgerError::MissingFilterColumn(expression.to_string()));
    }
    Ok(FilterPredicate::new(column, operator, unquote(raw_value)))
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 {
        let bytes = value.as_bytes();
        if (bytes[0] == b'"' && bytes[value.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[value.len() - 1] == b'\'')
        {
            return &value[1..value.len() - 1];
        }
    }
    value
}

pub fn parse_filters(filters: &[String]) -> LedgerResult<Vec<FilterPredicate>> {
    filters.iter().map(|f| f.parse()).collect()
}

/// Active predicates keyed by column name, kept in the order they were first applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    predicates: Vec<FilterPredicate>,
}

impl FilterSet {
    /// Inserts the predicate, replacing any existing predicate on the same column.
    pub fn apply(&mut self, predicate: FilterPredicate) {
        match self
            .predicates
            .iter_mut()
            .find(|existing| existing.column == predicate.column)
        {
            Some(existing) => *existing = predicate,
            None => self.predicates.push(predicate),
        }
    }

    pub fn clear(&mut self, column: &str) -> Option<FilterPredicate> {
        let idx = self
            .predicates
            .iter()
            .position(|existing| existing.column == column)?;
        Some(self.predicates.remove(idx))
    }

    pub fn clear_all(&mut self) {
        self.predicates.clear();
    }

    pub fn get(&self, column: &str) -> Option<&FilterPredicate> {
        self.predicates.iter().find(|p| p.column == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterPredicate> {
        self.predicates.iter()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// True when every predicate matches the value `lookup` yields for its column.
    pub fn matches_all<F>(&self, mut lookup: F) -> bool
    where
        F: FnMut(&str) -> String,
    {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(&lookup(&predicate.column)))
    }
}
