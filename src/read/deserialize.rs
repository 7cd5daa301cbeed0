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

use crate::encodings::decode_column;
use crate::errors::Result;
use crate::schema::Field;
use crate::value::Column;

/// Decode the next column group of `length` rows, advancing `reader` past it.
pub fn read_simple(reader: &mut &[u8], field: &Field, length: usize) -> Result<Column> {
    let data: &[u8] = *reader;
    let (column, consumed) = decode_column(data, field.data_type, length)?;
    *reader = &data[consumed..];
    Ok(column)
}

/// Decode the leading `fields` of a decompressed row group. When every column
/// of the schema is requested the buffer must be consumed exactly.
pub fn read_columns(
    buffer: &[u8],
    fields: &[Field],
    length: usize,
    all_columns: bool,
    row_group: usize,
) -> Result<Vec<Column>> {
    let mut reader = buffer;
    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        let column =
            read_simple(&mut reader, field, length).map_err(|e| e.in_column(&field.name, row_group))?;
        columns.push(column);
    }

    if all_columns && !reader.is_empty() {
        return Err(malformed_err!(
            "row group {} has {} trailing bytes after its last column",
            row_group,
            reader.len()
        ));
    }
    Ok(columns)
}
