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

//! Column descriptors of a skiff file.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::value::{Row, Value};

/// Physical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int32,
    Utf8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

/// Ordered, uniquely named columns. Fixed for the lifetime of a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn try_new(fields: Vec<Field>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in fields.iter() {
            if !seen.insert(field.name.as_str()) {
                return Err(general_err!("duplicate column name `{}`", field.name));
            }
        }
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_owned()))
    }

    pub fn field(&self, name: &str) -> Result<&Field> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    /// Map header-keyed string cells (as produced by a CSV loader) into a
    /// positional row. Missing headers become null; typing happens when the
    /// row is encoded.
    pub fn row_from_cells(&self, cells: &HashMap<String, Option<String>>) -> Row {
        self.fields
            .iter()
            .map(|f| cells.get(&f.name).cloned().flatten().map(Value::Utf8))
            .collect()
    }
}
