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

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Block compression codec applied to a whole row group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    /// LZ4 (block)
    LZ4,
    /// ZSTD
    ZSTD,
    SNAPPY,
}

impl Compression {
    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::LZ4 => "lz4",
            Compression::ZSTD => "zstd",
            Compression::SNAPPY => "snappy",
        }
    }

    /// Decompress `input` into `out_slice`, which must already have the
    /// uncompressed length.
    pub fn decompress(&self, input: &[u8], out_slice: &mut [u8]) -> Result<()> {
        let written = match self {
            Compression::LZ4 => decompress_lz4(input, out_slice),
            Compression::ZSTD => decompress_zstd(input, out_slice),
            Compression::SNAPPY => decompress_snappy(input, out_slice),
            Compression::None => {
                if input.len() != out_slice.len() {
                    return Err(Error::Compression(format!(
                        "stored block is {} bytes, expected {}",
                        input.len(),
                        out_slice.len()
                    )));
                }
                out_slice.copy_from_slice(input);
                Ok(input.len())
            }
        }?;
        if written != out_slice.len() {
            return Err(Error::Compression(format!(
                "{} block decompressed to {} bytes, expected {}",
                self.name(),
                written,
                out_slice.len()
            )));
        }
        Ok(())
    }

    /// Append the compressed form of `input_buf` to `output_buf`, returning the
    /// number of bytes appended.
    pub fn compress(&self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
        match self {
            Compression::LZ4 => compress_lz4(input_buf, output_buf),
            Compression::ZSTD => compress_zstd(input_buf, output_buf),
            Compression::SNAPPY => compress_snappy(input_buf, output_buf),
            Compression::None => {
                output_buf.extend_from_slice(input_buf);
                Ok(input_buf.len())
            }
        }
    }
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Compression::None),
            "lz4" => Ok(Compression::LZ4),
            "zstd" => Ok(Compression::ZSTD),
            "snappy" => Ok(Compression::SNAPPY),
            other => Err(Error::UnknownCompression(other.to_owned())),
        }
    }
}

pub fn decompress_lz4(input_buf: &[u8], output_buf: &mut [u8]) -> Result<usize> {
    let size = i32::try_from(output_buf.len()).map_err(|_| {
        Error::Compression(format!(
            "lz4 block of {} bytes exceeds the i32 size limit",
            output_buf.len()
        ))
    })?;
    lz4::block::decompress_to_buffer(input_buf, Some(size), output_buf)
        .map_err(|e| Error::Compression(format!("decompress lz4 failed: {e}")))
}

pub fn decompress_zstd(input_buf: &[u8], output_buf: &mut [u8]) -> Result<usize> {
    zstd::bulk::decompress_to_buffer(input_buf, output_buf)
        .map_err(|e| Error::Compression(format!("decompress zstd failed: {e}")))
}

pub fn decompress_snappy(input_buf: &[u8], output_buf: &mut [u8]) -> Result<usize> {
    snap::raw::Decoder::new()
        .decompress(input_buf, output_buf)
        .map_err(|e| Error::Compression(format!("decompress snappy failed: {e}")))
}

pub fn compress_lz4(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = lz4::block::compress_bound(input_buf.len())?;
    output_buf.resize(start + bound, 0);
    let size = lz4::block::compress_to_buffer(input_buf, None, false, &mut output_buf[start..])?;
    output_buf.truncate(start + size);
    Ok(size)
}

pub fn compress_zstd(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = zstd::zstd_safe::compress_bound(input_buf.len());
    output_buf.resize(start + bound, 0);
    let size = zstd::bulk::compress_to_buffer(input_buf, &mut output_buf[start..], 0)?;
    output_buf.truncate(start + size);
    Ok(size)
}

pub fn compress_snappy(input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<usize> {
    let start = output_buf.len();
    let bound = snap::raw::max_compress_len(input_buf.len());
    output_buf.resize(start + bound, 0);
    let size = snap::raw::Encoder::new()
        .compress(input_buf, &mut output_buf[start..])
        .map_err(|e| Error::Compression(format!("compress snappy failed: {e}")))?;
    output_buf.truncate(start + size);
    Ok(size)
}
