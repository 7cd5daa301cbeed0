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

//! A small columnar file format with statistics based row group pruning.
//!
//! A skiff file is laid out as
//!
//! ```text
//! [u32 metadata length][JSON metadata block][compressed row group]*
//! ```
//!
//! Each row group holds every column of a contiguous batch of rows, each
//! column encoded as Raw, RLE or Dictionary under a null bitmap, and the whole
//! group compressed as one block.

#[macro_use]
mod errors;

pub mod compression;
pub mod encodings;
pub mod query;
pub mod read;
pub mod schema;
pub mod stat;
pub mod value;
pub mod write;

use std::fs;
use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub use compression::Compression;
pub use errors::{Error, Result};
pub use query::{Predicate, QueryOutput, QueryResult, ReadOptions, ResultSet, ScanMetrics};
pub use read::reader::FileReader;
pub use schema::{DataType, Field, Schema};
pub use stat::ColumnStatistics;
pub use value::{Column, Row, Value};
pub use write::{FileWriter, WriteOptions};

/// Version written to and accepted from the metadata block.
pub const FORMAT_VERSION: u32 = 1;

/// Size of the little-endian `u32` metadata length in front of the block.
pub const META_LENGTH_PREFIX: usize = 4;

/// Largest uncompressed row group, bounded by the i32 sizes of the lz4 block API.
pub const MAX_ROW_GROUP_BYTES: u64 = i32::MAX as u64;

/// The metadata block of a skiff file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub version: u32,
    pub schema: Schema,
    pub compression: Compression,
    pub total_row_count: u64,
    pub row_groups: Vec<RowGroupMeta>,
}

impl FileMeta {
    /// Place the row group payloads back to back starting at `start`.
    pub fn assign_offsets(&mut self, start: u64) {
        let mut offset = start;
        for group in self.row_groups.iter_mut() {
            group.offset = offset;
            offset += group.compressed_length;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowGroupMeta {
    // from the start of the file
    pub offset: u64,
    pub compressed_length: u64,
    pub uncompressed_length: u64,
    pub row_count: u64,
    // schema ordered
    pub stats: Vec<ColumnStatistics>,
}

/// Write `rows` into the bytes of a skiff file.
pub fn write(rows: &[Row], schema: Schema, options: WriteOptions) -> Result<Vec<u8>> {
    let mut writer = FileWriter::new(schema, options)?;
    writer.write(rows)?;
    let (bytes, _) = writer.finish()?;
    Ok(bytes)
}

/// Open the bytes of a skiff file and run one query over them.
pub fn read(data: impl Into<Bytes>, options: &ReadOptions) -> Result<QueryResult> {
    let reader = FileReader::try_new(data)?;
    query::execute(&reader, options)
}

pub fn write_file<P: AsRef<Path>>(
    path: P,
    rows: &[Row],
    schema: Schema,
    options: WriteOptions,
) -> Result<FileMeta> {
    let mut writer = FileWriter::new(schema, options)?;
    writer.write(rows)?;
    let mut file = std::io::BufWriter::new(fs::File::create(path)?);
    let meta = writer.finish_to(&mut file)?;
    file.flush()?;
    Ok(meta)
}

pub fn read_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<QueryResult> {
    read(fs::read(path)?, options)
}
