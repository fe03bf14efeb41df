use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::types::{Money, PeriodIndex};

/// Column keys every serialized row starts with; no line item may reuse them.
pub const ROW_KEYS: [&str; 2] = ["Period", "Date"];

/// A user-named amount (revenue stream, additional fixed asset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedAmount {
    pub name: String,
    pub amount: Money,
}

/// A statement row addressable by stable line-item names.
///
/// `line_items` yields every line in statement order; the order and the set
/// of names are identical for all rows of one projection.
pub trait LineItems {
    fn period(&self) -> PeriodIndex;

    fn date(&self) -> NaiveDate;

    fn line_items(&self) -> Vec<(&str, Money)>;

    fn line_item(&self, name: &str) -> Option<Money> {
        self.line_items()
            .into_iter()
            .find(|(line, _)| *line == name)
            .map(|(_, value)| value)
    }
}

/// Serialize a row as one flat map: `Period`, `Date`, then every line item.
pub(crate) fn serialize_row<R, S>(row: &R, serializer: S) -> Result<S::Ok, S::Error>
where
    R: LineItems,
    S: Serializer,
{
    let items = row.line_items();
    let mut map = serializer.serialize_map(Some(items.len() + ROW_KEYS.len()))?;
    map.serialize_entry(ROW_KEYS[0], &row.period())?;
    map.serialize_entry(ROW_KEYS[1], &row.date())?;
    for (name, value) in &items {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

/// One statement: its rows ordered by period, period 0 first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Statement<R> {
    rows: Vec<R>,
}

impl<R: LineItems> Statement<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Statement { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&R> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&R> {
        self.rows.last()
    }

    /// Line-item names in statement order (taken from the first row).
    pub fn line_item_names(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| {
                row.line_items()
                    .into_iter()
                    .map(|(name, _)| name.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// One line across all periods, or `None` if the name is unknown.
    pub fn column(&self, name: &str) -> Option<Vec<Money>> {
        self.rows.iter().map(|row| row.line_item(name)).collect()
    }

    pub fn value(&self, period: PeriodIndex, name: &str) -> Option<Money> {
        self.rows.get(period).and_then(|row| row.line_item(name))
    }
}

impl<R> IntoIterator for Statement<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
