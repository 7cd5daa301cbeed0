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

use std::hash::Hash;

use hashbrown::hash_map::RawEntryMut;
use hashbrown::HashMap;

use crate::errors::Result;
use crate::read::read_basic::read_u32;

use super::{PlainValue, ValueEncoding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dict {}

impl<T: PlainValue> ValueEncoding<T> for Dict {
    fn encode(&self, values: &[T], output: &mut Vec<u8>) -> Result<usize> {
        let start = output.len();
        let mut encoder = DictEncoder::with_capacity(values.len());
        for val in values {
            encoder.push(val);
        }

        // dictionary in first-occurrence order, plain encoded
        let sets = encoder.get_sets();
        output.extend_from_slice(&(sets.len() as u32).to_le_bytes());
        for val in sets {
            val.write_plain(output);
        }
        for index in encoder.get_indices() {
            output.extend_from_slice(&index.to_le_bytes());
        }
        Ok(output.len() - start)
    }

    fn decode(&self, input: &[u8], length: usize, output: &mut Vec<T>) -> Result<usize> {
        let mut cursor = input;
        let unique_num = read_u32(&mut cursor)? as usize;
        // every entry takes at least 4 bytes
        if unique_num > cursor.len() / 4 {
            return Err(malformed_err!(
                "dictionary of {} entries does not fit in {} bytes",
                unique_num,
                cursor.len()
            ));
        }

        let mut data = Vec::with_capacity(unique_num);
        for _ in 0..unique_num {
            data.push(T::read_plain(&mut cursor)?);
        }

        output.reserve(length);
        for _ in 0..length {
            let index = read_u32(&mut cursor)? as usize;
            match data.get(index) {
                Some(v) => output.push(v.clone()),
                None => {
                    return Err(malformed_err!(
                        "dictionary index {} out of range for {} entries",
                        index,
                        unique_num
                    ))
                }
            }
        }
        Ok(input.len() - cursor.len())
    }
}

/// Dictionary encoder.
/// Builds the dictionary of distinct values in first-occurrence order and the
/// index of every pushed value into it.
pub struct DictEncoder<T> {
    interner: DictMap<T>,
    indices: Vec<u32>,
}

impl<T> DictEncoder<T>
where
    T: Hash + Eq + Clone,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            interner: DictMap::new(),
            indices: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: &T) {
        let key = self.interner.entry_key(value);
        self.indices.push(key);
    }

    pub fn get_sets(&self) -> &[T] {
        &self.interner.sets
    }

    pub fn get_indices(&self) -> &[u32] {
        &self.indices
    }
}

const DEFAULT_DEDUP_CAPACITY: usize = 4096;

#[derive(Debug, Default)]
pub struct DictMap<T> {
    state: ahash::RandomState,
    dedup: HashMap<u32, (), ()>,
    sets: Vec<T>,
}

impl<T> DictMap<T>
where
    T: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self {
            state: Default::default(),
            dedup: HashMap::with_capacity_and_hasher(DEFAULT_DEDUP_CAPACITY, ()),
            sets: vec![],
        }
    }

    pub fn entry_key(&mut self, value: &T) -> u32 {
        let hash = self.state.hash_one(value);

        let entry = self
            .dedup
            .raw_entry_mut()
            .from_hash(hash, |index| value == &self.sets[*index as usize]);

        match entry {
            RawEntryMut::Occupied(entry) => *entry.into_key(),
            RawEntryMut::Vacant(entry) => {
                let key = self.sets.len() as u32;
                self.sets.push(value.clone());
                *entry
                    .insert_with_hasher(hash, key, (), |key| {
                        self.state.hash_one(&self.sets[*key as usize])
                    })
                    .0
            }
        }
    }
}
