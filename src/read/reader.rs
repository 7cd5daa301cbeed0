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

use std::io::{ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use bytes::Bytes;

use crate::errors::{Error, Result};
use crate::schema::Schema;
use crate::value::Column;
use crate::{Compression, FileMeta, RowGroupMeta, FORMAT_VERSION, MAX_ROW_GROUP_BYTES};

use super::deserialize::read_columns;

/// Random access to the row groups of an in-memory skiff file.
///
/// The metadata block is parsed and validated once; afterwards every declared
/// payload range is known to lie inside the file.
#[derive(Debug, Clone)]
pub struct FileReader {
    data: Bytes,
    meta: FileMeta,
}

impl FileReader {
    pub fn try_new(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let mut reader = &data[..];
        let meta = read_meta(&mut reader)?;
        let payload_start = data.len() - reader.len();
        validate_meta(&meta, payload_start as u64, data.len() as u64)?;
        Ok(Self { data, meta })
    }

    pub fn meta(&self) -> &FileMeta {
        &self.meta
    }

    pub fn schema(&self) -> &Schema {
        &self.meta.schema
    }

    pub fn num_row_groups(&self) -> usize {
        self.meta.row_groups.len()
    }

    pub fn row_group_meta(&self, index: usize) -> Result<&RowGroupMeta> {
        self.meta.row_groups.get(index).ok_or_else(|| {
            general_err!(
                "row group {} out of range, the file has {}",
                index,
                self.meta.row_groups.len()
            )
        })
    }

    /// The compressed bytes of row group `index`, without copying.
    pub fn row_group_payload(&self, index: usize) -> Result<Bytes> {
        let group = self.row_group_meta(index)?;
        let start = group.offset as usize;
        Ok(self.data.slice(start..start + group.compressed_length as usize))
    }

    pub fn decompress_row_group(&self, index: usize) -> Result<Vec<u8>> {
        let group = self.row_group_meta(index)?;
        let payload = self.row_group_payload(index)?;
        let mut buffer = alloc_buffer(group.uncompressed_length)
            .map_err(|e| malformed_err!("row group {}: {}", index, e))?;
        self.meta
            .compression
            .decompress(&payload, &mut buffer)
            .map_err(|e| malformed_err!("row group {}: {}", index, e))?;
        Ok(buffer)
    }

    /// Decode the first `num_columns` columns of row group `index`.
    pub fn read_row_group(&self, index: usize, num_columns: usize) -> Result<Vec<Column>> {
        let fields = &self.schema().fields;
        let num_columns = num_columns.min(fields.len());
        let length = self.row_group_meta(index)?.row_count as usize;
        let buffer = self.decompress_row_group(index)?;
        read_columns(
            &buffer,
            &fields[..num_columns],
            length,
            num_columns == fields.len(),
            index,
        )
    }
}

/// Read the length prefix and metadata block from the front of a skiff file,
/// leaving `reader` at the first row group payload.
pub fn read_meta<R: Read>(reader: &mut R) -> Result<FileMeta> {
    let meta_len = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| eof_as_malformed(e, "metadata length prefix"))? as u64;

    let mut block = Vec::new();
    reader.by_ref().take(meta_len).read_to_end(&mut block)?;
    if (block.len() as u64) < meta_len {
        return Err(malformed_err!(
            "metadata block declares {} bytes, only {} present",
            meta_len,
            block.len()
        ));
    }

    let meta: FileMeta = serde_json::from_slice(&block)
        .map_err(|e| malformed_err!("cannot parse metadata block: {}", e))?;
    if meta.version != FORMAT_VERSION {
        return Err(malformed_err!(
            "unsupported format version {}, expected {}",
            meta.version,
            FORMAT_VERSION
        ));
    }
    Ok(meta)
}

/// A zeroed buffer of `len` bytes, failing instead of aborting when it cannot
/// be allocated.
fn alloc_buffer(len: u64) -> std::result::Result<Vec<u8>, String> {
    let len = usize::try_from(len)
        .map_err(|_| format!("uncompressed length {} does not fit in memory", len))?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| format!("cannot allocate {} bytes: {}", len, e))?;
    buffer.resize(len, 0);
    Ok(buffer)
}

fn eof_as_malformed(e: std::io::Error, what: &str) -> Error {
    if e.kind() == ErrorKind::UnexpectedEof {
        malformed_err!("file too short for the {}", what)
    } else {
        Error::Io(e)
    }
}

fn validate_meta(meta: &FileMeta, payload_start: u64, file_len: u64) -> Result<()> {
    Schema::try_new(meta.schema.fields.clone())
        .map_err(|e| malformed_err!("invalid schema: {}", e))?;

    let mut total_rows = 0u64;
    for (i, group) in meta.row_groups.iter().enumerate() {
        let end = group.offset.checked_add(group.compressed_length);
        match end {
            Some(end) if group.offset >= payload_start && end <= file_len => {}
            _ => {
                return Err(malformed_err!(
                    "row group {} spans [{}, +{}) outside the payload region [{}, {})",
                    i,
                    group.offset,
                    group.compressed_length,
                    payload_start,
                    file_len
                ))
            }
        }

        let size_ok = match meta.compression {
            Compression::None => group.uncompressed_length == group.compressed_length,
            _ => group.uncompressed_length <= MAX_ROW_GROUP_BYTES,
        };
        if !size_ok {
            return Err(malformed_err!(
                "row group {} declares {} uncompressed bytes for {} {} bytes",
                i,
                group.uncompressed_length,
                group.compressed_length,
                meta.compression.name()
            ));
        }

        if group.stats.len() != meta.schema.len() {
            return Err(malformed_err!(
                "row group {} has statistics for {} columns, schema has {}",
                i,
                group.stats.len(),
                meta.schema.len()
            ));
        }
        for (field, stats) in meta.schema.fields.iter().zip(group.stats.iter()) {
            for bound in [&stats.min, &stats.max].into_iter().flatten() {
                if bound.data_type() != field.data_type {
                    return Err(malformed_err!(
                        "row group {} column `{}`: statistic {} is not {:?}",
                        i,
                        field.name,
                        bound,
                        field.data_type
                    ));
                }
            }
        }
        total_rows = total_rows.checked_add(group.row_count).ok_or_else(|| {
            malformed_err!("row counts overflow at row group {}", i)
        })?;
    }

    if total_rows != meta.total_row_count {
        return Err(malformed_err!(
            "row groups hold {} rows, metadata declares {}",
            total_rows,
            meta.total_row_count
        ));
    }
    Ok(())
}
