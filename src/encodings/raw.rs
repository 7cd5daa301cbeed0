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

use super::{PlainValue, ValueEncoding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Raw {}

impl<T: PlainValue> ValueEncoding<T> for Raw {
    fn encode(&self, values: &[T], output: &mut Vec<u8>) -> Result<usize> {
        let start = output.len();
        for v in values {
            v.write_plain(output);
        }
        Ok(output.len() - start)
    }

    fn decode(&self, input: &[u8], length: usize, output: &mut Vec<T>) -> Result<usize> {
        let mut cursor = input;
        output.reserve(length);
        for _ in 0..length {
            output.push(T::read_plain(&mut cursor)?);
        }
        Ok(input.len() - cursor.len())
    }
}
