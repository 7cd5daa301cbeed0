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

use serde::{Deserialize, Serialize};

use crate::encodings::{bitmap, decode_column, read_header, Encoding};
use crate::errors::Result;
use crate::read::reader::FileReader;
use crate::schema::Field;
use crate::value::{Column, Value};

/// Per column, per row group statistics stored in the metadata block.
///
/// `min` and `max` cover non-null values only and are `None` when the group
/// holds no value for the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub min: Option<Value>,
    pub max: Option<Value>,
    #[serde(rename = "nullCount")]
    pub null_count: u64,
}

impl ColumnStatistics {
    pub fn from_column(column: &Column) -> Self {
        match column {
            Column::Int32(values) => Self::from_values(values, Value::Int32),
            Column::Utf8(values) => Self::from_values(values, Value::Utf8),
        }
    }

    fn from_values<T: Ord + Clone>(values: &[Option<T>], to_value: fn(T) -> Value) -> Self {
        let mut min: Option<&T> = None;
        let mut max: Option<&T> = None;
        let mut null_count = 0;
        for v in values {
            match v {
                Some(v) => {
                    if min.map_or(true, |m| v < m) {
                        min = Some(v);
                    }
                    if max.map_or(true, |m| v > m) {
                        max = Some(v);
                    }
                }
                None => null_count += 1,
            }
        }
        Self {
            min: min.cloned().map(to_value),
            max: max.cloned().map(to_value),
            null_count,
        }
    }
}

/// Physical layout of one column group.
#[derive(Debug)]
pub struct ColumnInfo {
    pub field: Field,
    pub encoding: Encoding,
    pub validity_size: u32,
    pub null_count: u64,
    /// bytes of the encoded non-null values, after the bitmap
    pub encoded_size: usize,
}

/// Inspect how every column of row group `index` was stored.
pub fn stat_row_group(reader: &FileReader, index: usize) -> Result<Vec<ColumnInfo>> {
    let row_count = reader.row_group_meta(index)?.row_count as usize;
    let buffer = reader.decompress_row_group(index)?;
    let mut buffer = buffer.as_slice();

    let mut infos = Vec::with_capacity(reader.schema().len());
    for field in reader.schema().fields.iter() {
        let info = stat_column(&mut buffer, field, row_count)
            .map_err(|e| e.in_column(&field.name, index))?;
        infos.push(info);
    }
    Ok(infos)
}

fn stat_column(buffer: &mut &[u8], field: &Field, row_count: usize) -> Result<ColumnInfo> {
    let data: &[u8] = *buffer;
    let mut cursor = data;
    let header = read_header(&mut cursor, row_count)?;
    let (_, consumed) = decode_column(data, field.data_type, row_count)?;
    *buffer = &data[consumed..];

    Ok(ColumnInfo {
        field: field.clone(),
        encoding: header.encoding,
        validity_size: header.validity.len() as u32,
        null_count: bitmap::count_nulls(header.validity, row_count) as u64,
        encoded_size: consumed - header.size,
    })
}
