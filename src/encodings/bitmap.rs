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

//! Null bitmap of a column group: one bit per row, LSB-first, 1 = present.

use crate::errors::Result;

/// Number of bitmap bytes for `length` rows.
#[inline]
pub fn bitmap_len(length: usize) -> usize {
    length.div_ceil(8)
}

#[inline]
pub fn is_valid(bitmap: &[u8], i: usize) -> bool {
    bitmap[i / 8] & (1 << (i % 8)) != 0
}

pub fn build_bitmap<T>(values: &[Option<T>]) -> Vec<u8> {
    let mut bitmap = vec![0u8; bitmap_len(values.len())];
    for (i, v) in values.iter().enumerate() {
        if v.is_some() {
            bitmap[i / 8] |= 1 << (i % 8);
        }
    }
    bitmap
}

/// Count the zero bits among the first `length` rows; padding bits of the
/// last byte are ignored.
pub fn count_nulls(bitmap: &[u8], length: usize) -> usize {
    let full = length / 8;
    let mut set = bitmap[..full]
        .iter()
        .map(|b| b.count_ones() as usize)
        .sum::<usize>();
    let rem = length % 8;
    if rem != 0 {
        let mask = (1u8 << rem) - 1;
        set += (bitmap[full] & mask).count_ones() as usize;
    }
    length - set
}

/// Re-expand the compacted non-null `values` to `length` rows.
pub fn expand<T>(bitmap: &[u8], length: usize, values: Vec<T>) -> Result<Vec<Option<T>>> {
    let mut values = values.into_iter();
    let mut out = Vec::with_capacity(length);
    for i in 0..length {
        if is_valid(bitmap, i) {
            match values.next() {
                Some(v) => out.push(Some(v)),
                None => return Err(malformed_err!("null bitmap marks more values than decoded")),
            }
        } else {
            out.push(None);
        }
    }
    if values.next().is_some() {
        return Err(malformed_err!("decoded more values than the null bitmap marks"));
    }
    Ok(out)
}
