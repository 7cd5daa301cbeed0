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

use log::{debug, warn};

use crate::encodings::encode_column;
use crate::errors::Result;
use crate::schema::Schema;
use crate::stat::ColumnStatistics;
use crate::value::{Column, Row};
use crate::{RowGroupMeta, MAX_ROW_GROUP_BYTES};

use super::WriteOptions;

/// Turns a slice of rows into one compressed row group.
///
/// Every column is coerced once; the same typed vector feeds both the codec
/// and the statistics, so they agree on which cells are null.
pub struct RowGroupBuilder<'a> {
    schema: &'a Schema,
    options: &'a WriteOptions,
    scratch: Vec<u8>,
}

impl<'a> RowGroupBuilder<'a> {
    pub fn new(schema: &'a Schema, options: &'a WriteOptions) -> Self {
        Self {
            schema,
            options,
            scratch: Vec::new(),
        }
    }

    /// Encode `rows` as row group `index`, appending the compressed payload to
    /// `output`. The returned meta has its offset left at zero.
    pub fn build(&mut self, rows: &[Row], index: usize, output: &mut Vec<u8>) -> Result<RowGroupMeta> {
        self.scratch.clear();
        let mut stats = Vec::with_capacity(self.schema.len());

        for (i, field) in self.schema.fields.iter().enumerate() {
            let (column, mismatches) =
                Column::from_rows(rows, i, field, self.options.strict_types)
                    .map_err(|e| e.in_column(&field.name, index))?;
            if mismatches > 0 {
                warn!(
                    "{} value(s) of column `{}` in row group {} are not {:?}, stored as null",
                    mismatches, field.name, index, field.data_type
                );
            }

            let column_stats = ColumnStatistics::from_column(&column);
            if !field.nullable && column_stats.null_count > 0 {
                warn!(
                    "column `{}` is not nullable but row group {} holds {} null(s)",
                    field.name, index, column_stats.null_count
                );
            }

            let start = self.scratch.len();
            let encoding = encode_column(&column, &self.options.forbidden_encodings, &mut self.scratch)
                .map_err(|e| e.in_column(&field.name, index))?;
            debug!(
                "row group {} column `{}`: {:?}, {} bytes",
                index,
                field.name,
                encoding,
                self.scratch.len() - start
            );
            stats.push(column_stats);
        }

        if self.scratch.len() as u64 > MAX_ROW_GROUP_BYTES {
            return Err(general_err!(
                "row group {} encodes to {} bytes, more than {}; use a smaller row_group_size",
                index,
                self.scratch.len(),
                MAX_ROW_GROUP_BYTES
            ));
        }
        let compressed_length = self.options.compression.compress(&self.scratch, output)?;
        Ok(RowGroupMeta {
            offset: 0,
            compressed_length: compressed_length as u64,
            uncompressed_length: self.scratch.len() as u64,
            row_count: rows.len() as u64,
            stats,
        })
    }
}
