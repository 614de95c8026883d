use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::error::{StoreError, StoreResult};
use super::value::Value;

/// Aggregation applied to each group by [`Table::group_aggregate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    /// Number of non-null values
    Count,
    /// Sum of numeric values; stays integral when every input is an integer
    Sum,
    /// Arithmetic mean of non-null numeric values
    Mean,
}

impl AggOp {
    fn apply(self, column: &str, values: &[&Value]) -> StoreResult<Value> {
        let present = values.iter().filter(|v| !v.is_null());

        match self {
            AggOp::Count => Ok(Value::Int(present.count() as i64)),
            AggOp::Sum => {
                let mut int_sum: i64 = 0;
                let mut float_sum = 0.0;
                let mut integral = true;
                for value in present {
                    match value {
                        Value::Int(i) => {
                            int_sum = int_sum.saturating_add(*i);
                            float_sum += *i as f64;
                        }
                        Value::Float(f) => {
                            integral = false;
                            float_sum += f;
                        }
                        other => return Err(type_mismatch(column, "a number", other)),
                    }
                }
                Ok(if integral {
                    Value::Int(int_sum)
                } else {
                    Value::Float(float_sum)
                })
            }
            AggOp::Mean => {
                let mut total = 0.0;
                let mut n = 0usize;
                for value in present {
                    let x = value
                        .as_f64()
                        .ok_or_else(|| type_mismatch(column, "a number", value))?;
                    total += x;
                    n += 1;
                }
                Ok(if n == 0 {
                    Value::Null
                } else {
                    Value::Float(total / n as f64)
                })
            }
        }
    }
}

/// How [`Table::merge`] treats left rows without a partner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    /// Keep unmatched left rows, zero-filling numeric right columns
    Left,
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Default for rows a left join could not match
    fn fill_value(&self) -> Value {
        match self.values.iter().find(|v| !v.is_null()) {
            Some(Value::Int(_)) => Value::Int(0),
            Some(Value::Float(_)) => Value::Float(0.0),
            _ => Value::Null,
        }
    }
}

/// Immutable in-memory columnar table
///
/// Every operation returns a new table; the receiver is never modified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    len: usize,
}

impl Table {
    /// Builds a table from columns of equal length
    pub fn new(columns: Vec<Column>) -> StoreResult<Self> {
        let len = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(ragged) = columns.iter().find(|c| c.values.len() != len) {
            return Err(StoreError::RaggedColumn {
                column: ragged.name.clone(),
                expected: len,
                found: ragged.values.len(),
            });
        }
        Ok(Self { columns, len })
    }

    /// Builds a table from row-major data
    pub fn from_rows(names: &[&str], rows: Vec<Vec<Value>>) -> StoreResult<Self> {
        let mut columns: Vec<Column> = names
            .iter()
            .map(|name| Column::new(*name, Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            if row.len() != names.len() {
                return Err(StoreError::RaggedColumn {
                    column: names.last().map(|n| n.to_string()).unwrap_or_default(),
                    expected: names.len(),
                    found: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.values.push(value);
            }
        }

        Self::new(columns)
    }

    /// Parses a JSON array of records
    ///
    /// Columns are the union of record keys, ordered by name; a record
    /// without a key contributes a null cell.
    pub fn from_json_records(bytes: &[u8]) -> serde_json::Result<Self> {
        let records: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_slice(bytes)?;

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut columns: Vec<Column> = Vec::new();

        for (row, record) in records.into_iter().enumerate() {
            for (key, json) in record {
                let position = *positions.entry(key.clone()).or_insert_with(|| {
                    columns.push(Column::new(key, vec![Value::Null; row]));
                    columns.len() - 1
                });
                columns[position].values.push(Value::from(json));
            }
            for column in columns.iter_mut() {
                if column.values.len() <= row {
                    column.values.push(Value::Null);
                }
            }
        }

        columns.sort_by(|a, b| a.name.cmp(&b.name));
        let len = columns.first().map(|c| c.values.len()).unwrap_or(0);
        Ok(Self { columns, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> StoreResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.len).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.len).map(move |index| Row { table: self, index })
    }

    /// Whether any cell of `column` satisfies `predicate`
    pub fn contains<F>(&self, column: &str, predicate: F) -> StoreResult<bool>
    where
        F: Fn(&Value) -> bool,
    {
        Ok(self.column(column)?.values.iter().any(predicate))
    }

    /// Rows for which `predicate` holds
    pub fn filter<F>(&self, mut predicate: F) -> StoreResult<Table>
    where
        F: FnMut(&Row<'_>) -> StoreResult<bool>,
    {
        let mut keep = Vec::new();
        for row in self.rows() {
            if predicate(&row)? {
                keep.push(row.index);
            }
        }
        Ok(self.take(&keep))
    }

    /// Groups by `keys` and aggregates `value_column` per group
    ///
    /// The result holds the key columns followed by `value_column`, one row per
    /// group in ascending key order. Rows with a null key are dropped.
    pub fn group_aggregate(
        &self,
        keys: &[&str],
        value_column: &str,
        op: AggOp,
    ) -> StoreResult<Table> {
        let key_columns = keys
            .iter()
            .map(|key| self.column(key))
            .collect::<StoreResult<Vec<_>>>()?;
        let values = self.column(value_column)?;

        let mut groups: BTreeMap<Vec<Value>, Vec<&Value>> = BTreeMap::new();
        for index in 0..self.len {
            let key: Vec<Value> = key_columns
                .iter()
                .map(|c| c.values[index].clone())
                .collect();
            if key.iter().any(Value::is_null) {
                continue;
            }
            groups.entry(key).or_default().push(&values.values[index]);
        }

        let mut out_keys: Vec<Vec<Value>> = vec![Vec::with_capacity(groups.len()); keys.len()];
        let mut out_values = Vec::with_capacity(groups.len());
        for (key, members) in groups {
            for (slot, value) in out_keys.iter_mut().zip(key) {
                slot.push(value);
            }
            out_values.push(op.apply(value_column, &members)?);
        }

        let mut columns: Vec<Column> = keys
            .iter()
            .zip(out_keys)
            .map(|(name, values)| Column::new(*name, values))
            .collect();
        columns.push(Column::new(value_column, out_values));
        Table::new(columns)
    }

    /// Joins `other` onto this table by exact match on the shared column `on`
    ///
    /// Right-side columns whose name collides with a left column get a
    /// `_right` suffix. Null keys never match.
    pub fn merge(&self, other: &Table, on: &str, kind: JoinKind) -> StoreResult<Table> {
        let left_keys = self.column(on)?;
        let right_keys = other.column(on)?;

        let mut index: BTreeMap<&Value, Vec<usize>> = BTreeMap::new();
        for (row, key) in right_keys.values.iter().enumerate() {
            if !key.is_null() {
                index.entry(key).or_default().push(row);
            }
        }

        let mut pairs: Vec<(usize, Option<usize>)> = Vec::new();
        for (row, key) in left_keys.values.iter().enumerate() {
            match index.get(key) {
                Some(matches) => {
                    pairs.extend(matches.iter().map(|m| (row, Some(*m))));
                }
                _ if kind == JoinKind::Left => pairs.push((row, None)),
                _ => {}
            }
        }

        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), pairs.iter().map(|(l, _)| c.values[*l].clone()).collect()))
            .collect();

        for column in other.columns.iter().filter(|c| c.name != on) {
            let name = if self.columns.iter().any(|c| c.name == column.name) {
                format!("{}_right", column.name)
            } else {
                column.name.clone()
            };
            let fill = column.fill_value();
            let values = pairs
                .iter()
                .map(|(_, r)| match r {
                    Some(r) => column.values[*r].clone(),
                    None => fill.clone(),
                })
                .collect();
            columns.push(Column::new(name, values));
        }

        Table::new(columns)
    }

    /// Stable sort on one column
    pub fn sort_by(&self, column: &str, descending: bool) -> StoreResult<Table> {
        let values = &self.column(column)?.values;
        let mut order: Vec<usize> = (0..self.len).collect();
        if descending {
            order.sort_by(|a, b| values[*b].cmp(&values[*a]));
        } else {
            order.sort_by(|a, b| values[*a].cmp(&values[*b]));
        }
        Ok(self.take(&order))
    }

    /// Number of distinct non-null values in `column`
    pub fn n_unique(&self, column: &str) -> StoreResult<usize> {
        let distinct: BTreeSet<&Value> = self
            .column(column)?
            .values
            .iter()
            .filter(|v| !v.is_null())
            .collect();
        Ok(distinct.len())
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.rows()
            .map(|row| Record {
                fields: self
                    .columns
                    .iter()
                    .map(|c| (c.name.clone(), c.values[row.index].clone()))
                    .collect(),
            })
            .collect()
    }

    fn take(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), indices.iter().map(|i| c.values[*i].clone()).collect()))
            .collect();
        Table {
            columns,
            len: indices.len(),
        }
    }
}

/// Borrowed view of one table row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> StoreResult<&'a Value> {
        Ok(&self.table.column(column)?.values[self.index])
    }

    /// Boolean cell; null reads as false and 0/1 integers are accepted
    pub fn flag(&self, column: &str) -> StoreResult<bool> {
        match self.get(column)? {
            Value::Bool(b) => Ok(*b),
            Value::Null => Ok(false),
            Value::Int(i) => Ok(*i != 0),
            other => Err(type_mismatch(column, "a boolean", other)),
        }
    }

    /// Integer cell, `None` when null
    pub fn integer(&self, column: &str) -> StoreResult<Option<i64>> {
        match self.get(column)? {
            Value::Null => Ok(None),
            other => other
                .as_i64()
                .map(Some)
                .ok_or_else(|| type_mismatch(column, "an integer", other)),
        }
    }

    /// List cell; null reads as an empty list
    pub fn list(&self, column: &str) -> StoreResult<&'a [Value]> {
        match self.get(column)? {
            Value::List(items) => Ok(items.as_slice()),
            Value::Null => Ok(&[]),
            other => Err(type_mismatch(column, "a list", other)),
        }
    }

    /// Numeric cell, `None` when null
    pub fn number(&self, column: &str) -> StoreResult<Option<f64>> {
        match self.get(column)? {
            Value::Null => Ok(None),
            other => other
                .as_f64()
                .map(Some)
                .ok_or_else(|| type_mismatch(column, "a number", other)),
        }
    }
}

/// One row projected to column/value pairs, in column order
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn type_mismatch(column: &str, expected: &'static str, found: &Value) -> StoreError {
    StoreError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: found.to_string(),
    }
}
