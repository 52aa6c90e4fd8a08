//! Composite grouping keys over Arrow columns.
//!
//! Every cell is normalized into a [`KeyValue`] so that grouping compares
//! values of any column type the same way, nulls included.

use std::collections::HashMap;
use std::fmt;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute;
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::errors::CheckError;
use crate::tables::ColumnId;
use crate::utils::hasher::Xxh3Builder;

/// Normalized cell value. NaN is folded into `Null` and `-0.0` into `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    Text(String),
}

impl KeyValue {
    fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            KeyValue::Null
        } else if v == 0. {
            KeyValue::Float(0f64.to_bits())
        } else {
            KeyValue::Float(v.to_bits())
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Null => write!(f, "null"),
            KeyValue::Bool(b) => write!(f, "{}", b),
            KeyValue::Int(i) => write!(f, "{}", i),
            KeyValue::UInt(u) => write!(f, "{}", u),
            KeyValue::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            KeyValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Ordered tuple of normalized values, one per key slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(pub Vec<KeyValue>);

impl GroupKey {
    pub fn values(&self) -> &[KeyValue] {
        &self.0
    }

    pub fn into_values(self) -> Vec<KeyValue> {
        self.0
    }
}

/// Maps internal key slots to the column identifiers shown to callers.
///
/// Slot `i` of every [`GroupKey`] belongs to `ids[i]`. Headers are always
/// derived from this mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySlots {
    ids: Vec<ColumnId>,
}

impl KeySlots {
    pub fn new(ids: Vec<ColumnId>) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn column(&self, slot: usize) -> Option<&ColumnId> {
        self.ids.get(slot)
    }

    pub fn columns(&self) -> &[ColumnId] {
        &self.ids
    }

    pub fn headers(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.to_string()).collect()
    }
}

/// Rows sharing one key, by position, in first-seen order.
#[derive(Debug, Clone)]
pub struct RowGroup {
    pub key: GroupKey,
    pub positions: Vec<usize>,
}

/// Convert one column into normalized key values.
pub fn column_key_values(array: &ArrayRef) -> Result<Vec<KeyValue>, CheckError> {
    let len = array.len();
    let values = match array.data_type() {
        DataType::Boolean => {
            let a = array.as_boolean();
            a.iter().map(|v| v.map_or(KeyValue::Null, KeyValue::Bool)).collect()
        }
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let casted = compute::cast(array, &DataType::Int64)?;
            let a = casted.as_primitive::<Int64Type>();
            a.iter().map(|v| v.map_or(KeyValue::Null, KeyValue::Int)).collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let casted = compute::cast(array, &DataType::UInt64)?;
            let a = casted.as_primitive::<UInt64Type>();
            a.iter().map(|v| v.map_or(KeyValue::Null, KeyValue::UInt)).collect()
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let casted = compute::cast(array, &DataType::Float64)?;
            let a = casted.as_primitive::<Float64Type>();
            a.iter()
                .map(|v| v.map_or(KeyValue::Null, KeyValue::from_f64))
                .collect()
        }
        DataType::Utf8 => text_values(array.as_string::<i32>().iter()),
        DataType::LargeUtf8 => text_values(array.as_string::<i64>().iter()),
        DataType::Dictionary(_, _) | DataType::Utf8View => {
            // Categorical columns group on their decoded labels
            let casted = compute::cast(array, &DataType::Utf8)?;
            text_values(casted.as_string::<i32>().iter())
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
            (0..len)
                .map(|i| {
                    if array.is_null(i) {
                        KeyValue::Null
                    } else {
                        KeyValue::Text(formatter.value(i).to_string())
                    }
                })
                .collect()
        }
    };
    Ok(values)
}

fn text_values<'a>(iter: impl Iterator<Item = Option<&'a str>>) -> Vec<KeyValue> {
    iter.map(|v| v.map_or(KeyValue::Null, |s| KeyValue::Text(s.to_string())))
        .collect()
}

/// Build the composite key of every row.
pub fn row_keys(columns: &[ArrayRef]) -> Result<Vec<GroupKey>, CheckError> {
    let n_rows = columns.first().map_or(0, |c| c.len());
    let per_column = columns
        .iter()
        .map(column_key_values)
        .collect::<Result<Vec<_>, _>>()?;

    let mut keys: Vec<Vec<KeyValue>> = (0..n_rows)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in per_column {
        for (row, value) in column.into_iter().enumerate() {
            keys[row].push(value);
        }
    }
    Ok(keys.into_iter().map(GroupKey).collect())
}

/// Partition rows by their full key. Groups come out in first-seen order.
pub fn group_rows(columns: &[ArrayRef]) -> Result<Vec<RowGroup>, CheckError> {
    let keys = row_keys(columns)?;
    let mut slots: HashMap<GroupKey, usize, Xxh3Builder> =
        HashMap::with_capacity_and_hasher(keys.len(), Xxh3Builder);
    let mut groups: Vec<RowGroup> = Vec::new();

    for (position, key) in keys.into_iter().enumerate() {
        match slots.get(&key) {
            Some(&slot) => groups[slot].positions.push(position),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push(RowGroup {
                    key,
                    positions: vec![position],
                });
            }
        }
    }
    Ok(groups)
}
