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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown column encoding tag {0}")]
    UnknownEncoding(u8),
    #[error("unknown compression codec `{0}`")]
    UnknownCompression(String),
    #[error("malformed file: {0}")]
    MalformedFile(String),
    #[error("value `{value}` cannot be stored in column `{column}`")]
    SchemaMismatch { column: String, value: String },
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),
    #[error("column `{0}` not found")]
    ColumnNotFound(String),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("compression error: {0}")]
    Compression(String),
    #[error("column `{column}` in row group {row_group}: {source}")]
    Column {
        column: String,
        row_group: usize,
        #[source]
        source: Box<Error>,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Attach the column and row group a codec failure happened in.
    pub fn in_column(self, column: &str, row_group: usize) -> Self {
        Error::Column {
            column: column.to_owned(),
            row_group,
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through [`Error::Column`] wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Column { source, .. } => source.root(),
            other => other,
        }
    }
}

macro_rules! malformed_err {
    ($fmt:expr) => ($crate::errors::Error::MalformedFile($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => ($crate::errors::Error::MalformedFile(format!($fmt, $($args),*)));
}

macro_rules! general_err {
    ($fmt:expr) => ($crate::errors::Error::InvalidOptions($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => ($crate::errors::Error::InvalidOptions(format!($fmt, $($args),*)));
}
