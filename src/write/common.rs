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

use crate::encodings::Encoding;
use crate::errors::Result;
use crate::Compression;

pub const DEFAULT_ROW_GROUP_SIZE: usize = 100;

/// Options declaring the behaviour of writing a skiff file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WriteOptions {
    /// Block codec applied to every row group.
    pub compression: Compression,
    /// Rows per row group; the last group may be smaller.
    pub row_group_size: usize,
    /// Schemes the encoder must never pick. Raw is the fallback and can not
    /// be forbidden.
    pub forbidden_encodings: Vec<Encoding>,
    /// Fail with `SchemaMismatch` instead of storing uncoercible cells as null.
    pub strict_types: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: Compression::LZ4,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            forbidden_encodings: vec![],
            strict_types: false,
        }
    }
}

impl WriteOptions {
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_row_group_size(mut self, row_group_size: usize) -> Self {
        self.row_group_size = row_group_size;
        self
    }

    pub fn with_forbidden_encodings(mut self, encodings: Vec<Encoding>) -> Self {
        self.forbidden_encodings = encodings;
        self
    }

    pub fn with_strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.row_group_size == 0 {
            return Err(general_err!("row_group_size must be at least 1"));
        }
        if self.forbidden_encodings.contains(&Encoding::Raw) {
            return Err(general_err!("the Raw encoding can not be forbidden"));
        }
        Ok(())
    }
}
