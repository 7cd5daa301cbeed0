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

use std::io::Write;

use log::{debug, info};

use crate::errors::Result;
use crate::schema::Schema;
use crate::value::Row;
use crate::{FileMeta, RowGroupMeta, FORMAT_VERSION, META_LENGTH_PREFIX};

use super::{RowGroupBuilder, WriteOptions};

const MAX_LAYOUT_ATTEMPTS: usize = 8;

/// Writes rows into a skiff file.
///
/// Rows are buffered until a full row group is available; compressed
/// payloads are kept in memory because the metadata block, which precedes
/// them, can only be laid out once every payload length is known.
pub struct FileWriter {
    schema: Schema,
    options: WriteOptions,
    pending: Vec<Row>,
    payloads: Vec<u8>,
    row_groups: Vec<RowGroupMeta>,
    total_row_count: u64,
}

impl FileWriter {
    pub fn new(schema: Schema, options: WriteOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            schema,
            pending: Vec::with_capacity(options.row_group_size),
            options,
            payloads: vec![],
            row_groups: vec![],
            total_row_count: 0,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of row groups flushed so far.
    pub fn num_row_groups(&self) -> usize {
        self.row_groups.len()
    }

    /// Append rows. May be called any number of times; full row groups are
    /// encoded and compressed immediately.
    pub fn write(&mut self, rows: &[Row]) -> Result<()> {
        let size = self.options.row_group_size;
        let mut rows = rows;

        if !self.pending.is_empty() {
            let take = (size - self.pending.len()).min(rows.len());
            self.pending.extend_from_slice(&rows[..take]);
            rows = &rows[take..];
            if self.pending.len() == size {
                self.flush_pending()?;
            }
        }

        while rows.len() >= size {
            let (group, rest) = rows.split_at(size);
            self.write_row_group(group)?;
            rows = rest;
        }
        self.pending.extend_from_slice(rows);
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        self.write_row_group(&pending)?;
        self.pending = pending;
        self.pending.clear();
        Ok(())
    }

    fn write_row_group(&mut self, rows: &[Row]) -> Result<()> {
        let index = self.row_groups.len();
        let meta = RowGroupBuilder::new(&self.schema, &self.options).build(
            rows,
            index,
            &mut self.payloads,
        )?;
        self.total_row_count += meta.row_count;
        self.row_groups.push(meta);
        Ok(())
    }

    /// Flush the last partial row group and lay out the file.
    pub fn finish(self) -> Result<(Vec<u8>, FileMeta)> {
        let mut bytes = vec![];
        let meta = self.finish_to(&mut bytes)?;
        Ok((bytes, meta))
    }

    /// Like [`FileWriter::finish`], streaming the file into `writer`.
    pub fn finish_to<W: Write>(mut self, writer: &mut W) -> Result<FileMeta> {
        if !self.pending.is_empty() {
            self.flush_pending()?;
        }

        let mut meta = FileMeta {
            version: FORMAT_VERSION,
            schema: self.schema,
            compression: self.options.compression,
            total_row_count: self.total_row_count,
            row_groups: self.row_groups,
        };
        let block = layout(&mut meta)?;

        writer.write_all(&(block.len() as u32).to_le_bytes())?;
        writer.write_all(&block)?;
        writer.write_all(&self.payloads)?;
        writer.flush()?;

        info!(
            "wrote {} rows in {} row groups, metadata {} bytes, payloads {} bytes",
            meta.total_row_count,
            meta.row_groups.len(),
            block.len(),
            self.payloads.len()
        );
        Ok(meta)
    }
}

/// Serialize `meta` with offsets that point past the serialized block itself.
///
/// The block length depends on the digits of the offsets it carries, so the
/// reserved length is grown until a serialization fits in it; a shorter final
/// serialization is padded with trailing whitespace to exactly the reserved
/// length. The reserved length only grows, which bounds the iteration.
pub fn layout(meta: &mut FileMeta) -> Result<Vec<u8>> {
    let mut reserved = 0;
    for attempt in 0..MAX_LAYOUT_ATTEMPTS {
        meta.assign_offsets((META_LENGTH_PREFIX + reserved) as u64);
        let mut block = serde_json::to_vec(meta)?;
        debug!(
            "metadata layout attempt {}: reserved {} bytes, serialized {} bytes",
            attempt,
            reserved,
            block.len()
        );
        if block.len() <= reserved {
            block.resize(reserved, b' ');
            return Ok(block);
        }
        reserved = block.len();
    }
    Err(malformed_err!(
        "metadata layout did not settle after {} attempts",
        MAX_LAYOUT_ATTEMPTS
    ))
}
