// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::schema::{DataType, Field};

/// A single non-null cell.
///
/// Serialized untagged, so statistics read as plain JSON numbers for `Int32`
/// columns and plain strings for `Utf8` columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int32(i32),
    Utf8(String),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int32(_) => DataType::Int32,
            Value::Utf8(_) => DataType::Utf8,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            Value::Utf8(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(v) => Some(v.as_str()),
            Value::Int32(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int32(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Utf8(v)
    }
}

/// A row in schema order; `None` is a null cell.
pub type Row = Vec<Option<Value>>;

/// The values of one column within one row group, typed after coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Int32(Vec<Option<i32>>),
    Utf8(Vec<Option<String>>),
}

impl Column {
    pub fn data_type(&self) -> DataType {
        match self {
            Column::Int32(_) => DataType::Int32,
            Column::Utf8(_) => DataType::Utf8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int32(v) => v.len(),
            Column::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            Column::Int32(v) => v.iter().filter(|v| v.is_none()).count(),
            Column::Utf8(v) => v.iter().filter(|v| v.is_none()).count(),
        }
    }

    pub fn value(&self, index: usize) -> Option<Value> {
        match self {
            Column::Int32(v) => v.get(index).copied().flatten().map(Value::Int32),
            Column::Utf8(v) => v.get(index).cloned().flatten().map(Value::Utf8),
        }
    }

    /// Extract column `index` from `rows`, coercing every cell to the field's
    /// type. Cells that cannot be coerced become null, or fail the call with
    /// [`Error::SchemaMismatch`] when `strict` is set. Returns the column and
    /// the number of cells that were nulled by coercion.
    pub fn from_rows(rows: &[Row], index: usize, field: &Field, strict: bool) -> Result<(Self, usize)> {
        let mut mismatches = 0;
        let mut on_mismatch = |value: &Value| {
            if strict {
                Err(Error::SchemaMismatch {
                    column: field.name.clone(),
                    value: value.to_string(),
                })
            } else {
                mismatches += 1;
                Ok(())
            }
        };

        let cells = rows.iter().map(|row| row.get(index).and_then(|c| c.as_ref()));
        let column = match field.data_type {
            DataType::Int32 => {
                let mut values = Vec::with_capacity(rows.len());
                for cell in cells {
                    let v = match cell {
                        None => None,
                        Some(Value::Int32(v)) => Some(*v),
                        Some(value @ Value::Utf8(s)) => {
                            let s = s.trim();
                            if s.is_empty() {
                                None
                            } else if let Ok(v) = s.parse::<i32>() {
                                Some(v)
                            } else {
                                on_mismatch(value)?;
                                None
                            }
                        }
                    };
                    values.push(v);
                }
                Column::Int32(values)
            }
            DataType::Utf8 => Column::Utf8(
                cells
                    .map(|cell| {
                        cell.map(|value| match value {
                            Value::Utf8(s) => s.clone(),
                            Value::Int32(v) => v.to_string(),
                        })
                    })
                    .collect(),
            ),
        };
        Ok((column, mismatches))
    }
}
