use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = LedgerError;

    fn from_str(value: &str) -> LedgerResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(LedgerError::UnknownSortDirection(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        let ordering = locale_compare(left, right);
        if self.direction.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

/// A command-line sort request: `column` toggles like a header click,
/// `column:asc` / `column:desc` pins the direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub column: String,
    pub direction: Option<SortDirection>,
}

impl FromStr for SortDirective {
    type Err = LedgerError;

    fn from_str(spec: &str) -> LedgerResult<Self> {
        let mut parts = spec.splitn(2, ':');
        let column = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(LedgerError::MissingSortColumn)?;
        let direction = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<SortDirection>)
            .transpose()?;
        Ok(SortDirective {
            column: column.to_string(),
            direction,
        })
    }
}

/// ASCII punctuation and symbols in root collation order. All of them sort
/// before digits, and digits sort before letters.
const SYMBOL_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Whitespace,
    Symbol,
    OtherSymbol,
    Digit,
    Letter,
}

fn primary_weight(ch: char) -> (CharClass, u32) {
    if ch.is_whitespace() {
        (CharClass::Whitespace, ch as u32)
    } else if let Some(rank) = SYMBOL_ORDER.find(ch) {
        (CharClass::Symbol, rank as u32)
    } else if ch.is_numeric() {
        (CharClass::Digit, ch as u32)
    } else if ch.is_alphabetic() {
        (CharClass::Letter, ch as u32)
    } else {
        (CharClass::OtherSymbol, ch as u32)
    }
}

/// Locale-style string ordering, following root collation for identifiers.
///
/// The primary order ignores case and ranks characters as whitespace, then
/// punctuation and symbols, then digits, then letters, so `"col_a" < "col1"`.
/// Strings that differ only in case put the lowercase form first, so
/// `"apple" < "Apple" < "banana"`.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    let weights = |value: &str| {
        value
            .chars()
            .flat_map(char::to_lowercase)
            .map(primary_weight)
            .collect::<Vec<_>>()
    };
    weights(left)
        .cmp(&weights(right))
        .then_with(|| right.cmp(left))
}
