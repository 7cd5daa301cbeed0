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

//! Column codec.
//!
//! A column group is laid out as
//!
//! ```text
//! [u8 encoding tag][u32 bitmap length][null bitmap][encoded non-null values]
//! ```
//!
//! Only non-null values reach the value encoders; the bitmap restores the
//! nulls on decode.

pub mod bitmap;
mod dict;
mod raw;
mod rle;

use std::fmt::Debug;
use std::hash::Hash;

use crate::errors::{Error, Result};
use crate::read::read_basic::{read_bytes, read_i32, read_u32, read_u8};
use crate::schema::DataType;
use crate::value::Column;

pub use self::dict::{Dict, DictEncoder};
pub use self::raw::Raw;
pub use self::rle::Rle;

/// Value encoding scheme of a column group, stored as its tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Values back to back in their plain form.
    Raw,
    /// `[u32 run length][value]` per run of equal values.
    Rle,
    /// First-occurrence dictionary followed by one `u32` index per value.
    Dictionary,
}

impl Encoding {
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Encoding::Raw),
            1 => Ok(Encoding::Rle),
            2 => Ok(Encoding::Dictionary),
            other => Err(Error::UnknownEncoding(other)),
        }
    }

    pub fn tag(&self) -> u8 {
        u8::from(*self)
    }

    pub fn create_encoder<T: PlainValue>(&self) -> Box<dyn ValueEncoding<T>> {
        match self {
            Encoding::Raw => Box::new(Raw {}),
            Encoding::Rle => Box::new(Rle {}),
            Encoding::Dictionary => Box::new(Dict {}),
        }
    }
}

impl From<Encoding> for u8 {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::Raw => 0,
            Encoding::Rle => 1,
            Encoding::Dictionary => 2,
        }
    }
}

/// A value with a fixed plain serialization: 4-byte little-endian for `i32`,
/// `[u32 length][utf8 bytes]` for strings.
///
/// `Ord` is the statistics ordering: numeric for `i32`, byte-wise
/// lexicographic for `String`.
pub trait PlainValue: Clone + Eq + Hash + Ord + Debug + 'static {
    fn write_plain(&self, output: &mut Vec<u8>);
    fn read_plain(input: &mut &[u8]) -> Result<Self>;
}

impl PlainValue for i32 {
    fn write_plain(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.to_le_bytes());
    }

    fn read_plain(input: &mut &[u8]) -> Result<Self> {
        read_i32(input)
    }
}

impl PlainValue for String {
    fn write_plain(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&(self.len() as u32).to_le_bytes());
        output.extend_from_slice(self.as_bytes());
    }

    fn read_plain(input: &mut &[u8]) -> Result<Self> {
        let len = read_u32(input)? as usize;
        let bytes = read_bytes(input, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| malformed_err!("invalid utf8 value: {}", e))
    }
}

pub trait ValueEncoding<T: PlainValue> {
    /// Append the encoded `values` to `output`, returning the bytes written.
    fn encode(&self, values: &[T], output: &mut Vec<u8>) -> Result<usize>;
    /// Decode exactly `length` values from the front of `input`, returning the
    /// bytes consumed.
    fn decode(&self, input: &[u8], length: usize, output: &mut Vec<T>) -> Result<usize>;
}

/// Shape of a column group's non-null values, used to pick a scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingStats {
    /// rows in the group, nulls included
    pub tuple_count: usize,
    pub null_count: usize,
    /// longest run of consecutive equal non-null values
    pub max_run: usize,
    /// distinct non-null values
    pub unique_count: usize,
}

pub fn gen_stats<T: PlainValue>(values: &[T], tuple_count: usize) -> EncodingStats {
    let mut unique = hashbrown::HashSet::with_capacity_and_hasher(
        values.len().min(1024),
        ahash::RandomState::new(),
    );
    let mut max_run = 0;
    let mut run = 0;
    let mut last: Option<&T> = None;
    for v in values {
        if last == Some(v) {
            run += 1;
        } else {
            run = 1;
            last = Some(v);
        }
        max_run = max_run.max(run);
        unique.insert(v);
    }

    EncodingStats {
        tuple_count,
        null_count: tuple_count - values.len(),
        max_run,
        unique_count: unique.len(),
    }
}

/// Pick the scheme for a column group: RLE when one run covers more than half
/// of the rows, Dictionary when at most a quarter of the rows are distinct,
/// Raw otherwise. Forbidden schemes are skipped; Raw is always allowed.
pub fn choose_encoding(stats: &EncodingStats, forbidden: &[Encoding]) -> Encoding {
    let allowed = |e: Encoding| !forbidden.contains(&e);
    let n = stats.tuple_count;

    if stats.max_run * 2 > n && allowed(Encoding::Rle) {
        Encoding::Rle
    } else if stats.unique_count > 0 && stats.unique_count * 4 <= n && allowed(Encoding::Dictionary)
    {
        Encoding::Dictionary
    } else {
        Encoding::Raw
    }
}

/// Encode one column group and append it to `buf`.
pub fn encode_values<T: PlainValue>(
    values: &[Option<T>],
    forbidden: &[Encoding],
    buf: &mut Vec<u8>,
) -> Result<Encoding> {
    let validity = bitmap::build_bitmap(values);
    let non_null: Vec<T> = values.iter().flatten().cloned().collect();

    let stats = gen_stats(&non_null, values.len());
    let encoding = choose_encoding(&stats, forbidden);
    log::debug!("choose column encoding: {:?} for {:?}", encoding, stats);

    buf.push(encoding.tag());
    buf.extend_from_slice(&(validity.len() as u32).to_le_bytes());
    buf.extend_from_slice(&validity);
    encoding.create_encoder::<T>().encode(&non_null, buf)?;
    Ok(encoding)
}

/// Decode one column group of `length` rows from the front of `input`,
/// returning the values and the bytes consumed.
pub fn decode_values<T: PlainValue>(input: &[u8], length: usize) -> Result<(Vec<Option<T>>, usize)> {
    let mut cursor = input;
    let header = read_header(&mut cursor, length)?;

    let non_null = length - bitmap::count_nulls(header.validity, length);
    let mut values = Vec::with_capacity(non_null);
    let consumed = header
        .encoding
        .create_encoder::<T>()
        .decode(cursor, non_null, &mut values)?;
    if values.len() != non_null {
        return Err(malformed_err!(
            "{:?} decoded {} values, expected {}",
            header.encoding,
            values.len(),
            non_null
        ));
    }

    let values = bitmap::expand(header.validity, length, values)?;
    Ok((values, header.size + consumed))
}

/// Tag and null bitmap of a column group.
#[derive(Debug)]
pub struct ColumnHeader<'a> {
    pub encoding: Encoding,
    pub validity: &'a [u8],
    /// bytes taken by the tag, bitmap length and bitmap
    pub size: usize,
}

pub fn read_header<'a>(input: &mut &'a [u8], length: usize) -> Result<ColumnHeader<'a>> {
    let start = input.len();
    let encoding = Encoding::from_tag(read_u8(input)?)?;
    let validity_len = read_u32(input)? as usize;
    if validity_len != bitmap::bitmap_len(length) {
        return Err(malformed_err!(
            "null bitmap is {} bytes, expected {} for {} rows",
            validity_len,
            bitmap::bitmap_len(length),
            length
        ));
    }
    let validity = read_bytes(input, validity_len)?;
    Ok(ColumnHeader {
        encoding,
        validity,
        size: start - input.len(),
    })
}

/// Encode a typed column group, see [`encode_values`].
pub fn encode_column(column: &Column, forbidden: &[Encoding], buf: &mut Vec<u8>) -> Result<Encoding> {
    match column {
        Column::Int32(values) => encode_values(values, forbidden, buf),
        Column::Utf8(values) => encode_values(values, forbidden, buf),
    }
}

/// Decode a typed column group, see [`decode_values`].
pub fn decode_column(input: &[u8], data_type: DataType, length: usize) -> Result<(Column, usize)> {
    match data_type {
        DataType::Int32 => {
            decode_values::<i32>(input, length).map(|(v, n)| (Column::Int32(v), n))
        }
        DataType::Utf8 => {
            decode_values::<String>(input, length).map(|(v, n)| (Column::Utf8(v), n))
        }
    }
}
