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

use crate::errors::Result;
use crate::read::read_basic::read_u32;

use super::{PlainValue, ValueEncoding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rle {}

impl<T: PlainValue> ValueEncoding<T> for Rle {
    fn encode(&self, values: &[T], output: &mut Vec<u8>) -> Result<usize> {
        let start = output.len();
        let mut seen_count: u32 = 0;
        let mut last_value: Option<&T> = None;

        for item in values {
            match last_value {
                Some(last) if last == item => seen_count += 1,
                _ => {
                    if let Some(last) = last_value {
                        // flush u32 cnt, value
                        output.extend_from_slice(&seen_count.to_le_bytes());
                        last.write_plain(output);
                    }
                    last_value = Some(item);
                    seen_count = 1;
                }
            }
        }

        if let Some(last) = last_value {
            output.extend_from_slice(&seen_count.to_le_bytes());
            last.write_plain(output);
        }
        Ok(output.len() - start)
    }

    fn decode(&self, input: &[u8], length: usize, output: &mut Vec<T>) -> Result<usize> {
        let mut cursor = input;
        let mut num_values = 0;
        output.reserve(length);
        while num_values < length {
            let len = read_u32(&mut cursor)? as usize;
            let value = T::read_plain(&mut cursor)?;
            if len == 0 || num_values + len > length {
                return Err(malformed_err!(
                    "run of {} values overflows {} remaining",
                    len,
                    length - num_values
                ));
            }
            output.extend(std::iter::repeat(value).take(len));
            num_values += len;
        }
        Ok(input.len() - cursor.len())
    }
}
