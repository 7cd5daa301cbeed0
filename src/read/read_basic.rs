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

use byteorder::{LittleEndian, ReadBytesExt};

use crate::errors::Result;

pub fn read_u8(input: &mut &[u8]) -> Result<u8> {
    let remaining = input.len();
    input
        .read_u8()
        .map_err(|_| malformed_err!("expected 1 byte, {} remaining", remaining))
}

pub fn read_u32(input: &mut &[u8]) -> Result<u32> {
    let remaining = input.len();
    input
        .read_u32::<LittleEndian>()
        .map_err(|_| malformed_err!("expected 4 bytes, {} remaining", remaining))
}

pub fn read_i32(input: &mut &[u8]) -> Result<i32> {
    let remaining = input.len();
    input
        .read_i32::<LittleEndian>()
        .map_err(|_| malformed_err!("expected 4 bytes, {} remaining", remaining))
}

/// Split `len` bytes off the front of `input`.
pub fn read_bytes<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    if input.len() < len {
        return Err(malformed_err!(
            "expected {} bytes, {} remaining",
            len,
            input.len()
        ));
    }
    let (head, tail) = input.split_at(len);
    *input = tail;
    Ok(head)
}
