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

//! Query engine: statistics pruning, row filtering and projection.

mod predicate;

use log::{debug, info, warn};

use crate::errors::Result;
use crate::read::reader::FileReader;
use crate::schema::Field;
use crate::value::Row;
use crate::{FileMeta, RowGroupMeta};

pub use predicate::{BoundPredicate, Literal, Operator, Predicate};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub filter: Option<Predicate>,
    /// Columns to return, in this order. `None` returns every column.
    pub projection: Option<Vec<String>>,
    /// Only list the row group metadata; filter and projection are ignored.
    pub stats_only: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Parse `expr` as the filter. An expression that does not parse leaves
    /// the query unfiltered; use [`Predicate::parse`] to surface the error.
    pub fn filter_expr(mut self, expr: &str) -> Self {
        match Predicate::parse(expr) {
            Ok(predicate) => self.filter = Some(predicate),
            Err(e) => {
                warn!("ignoring filter: {}", e);
                self.filter = None;
            }
        }
        self
    }

    pub fn with_projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_stats_only(mut self, stats_only: bool) -> Self {
        self.stats_only = stats_only;
        self
    }
}

/// Decoded rows, restricted to the projected columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub columns: Vec<Field>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutput {
    Rows(ResultSet),
    Stats(Vec<RowGroupMeta>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanMetrics {
    pub row_groups_total: usize,
    pub row_groups_pruned: usize,
    pub row_groups_decoded: usize,
    pub rows_decoded: u64,
    pub rows_matched: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub meta: FileMeta,
    pub output: QueryOutput,
    pub metrics: ScanMetrics,
}

impl QueryResult {
    pub fn rows(&self) -> Option<&ResultSet> {
        match &self.output {
            QueryOutput::Rows(rows) => Some(rows),
            QueryOutput::Stats(_) => None,
        }
    }

    pub fn stats(&self) -> Option<&[RowGroupMeta]> {
        match &self.output {
            QueryOutput::Stats(stats) => Some(stats),
            QueryOutput::Rows(_) => None,
        }
    }
}

/// Run one query against an opened file.
///
/// Row groups whose statistics rule the filter out are skipped without being
/// decompressed; surviving groups are decoded only up to the last column the
/// query touches, then filtered row by row and projected.
pub fn execute(reader: &FileReader, options: &ReadOptions) -> Result<QueryResult> {
    let meta = reader.meta();
    let mut metrics = ScanMetrics {
        row_groups_total: meta.row_groups.len(),
        ..Default::default()
    };

    if options.stats_only {
        return Ok(QueryResult {
            meta: meta.clone(),
            output: QueryOutput::Stats(meta.row_groups.clone()),
            metrics,
        });
    }

    let schema = reader.schema();
    let predicate = options
        .filter
        .as_ref()
        .map(|p| p.bind(schema))
        .transpose()?;
    let projection: Vec<usize> = match &options.projection {
        Some(names) => names
            .iter()
            .map(|name| schema.index_of(name))
            .collect::<Result<_>>()?,
        None => (0..schema.len()).collect(),
    };
    let num_columns = projection
        .iter()
        .copied()
        .chain(predicate.as_ref().map(|p| p.column))
        .max()
        .map_or(0, |last| last + 1);

    let mut rows: Vec<Row> = vec![];
    for (i, group) in meta.row_groups.iter().enumerate() {
        if let Some(predicate) = &predicate {
            if !predicate.might_match(&group.stats[predicate.column]) {
                debug!("row group {} pruned by its statistics", i);
                metrics.row_groups_pruned += 1;
                continue;
            }
        }

        let columns = reader.read_row_group(i, num_columns)?;
        metrics.row_groups_decoded += 1;
        metrics.rows_decoded += group.row_count;

        for r in 0..group.row_count as usize {
            if let Some(predicate) = &predicate {
                if !predicate.row_matches(columns[predicate.column].value(r).as_ref()) {
                    continue;
                }
            }
            rows.push(projection.iter().map(|c| columns[*c].value(r)).collect());
        }
    }
    metrics.rows_matched = rows.len() as u64;

    info!(
        "scanned {} row groups: {} pruned, {} decoded, {} of {} rows matched",
        metrics.row_groups_total,
        metrics.row_groups_pruned,
        metrics.row_groups_decoded,
        metrics.rows_matched,
        metrics.rows_decoded
    );

    let columns = projection
        .iter()
        .map(|c| schema.fields[*c].clone())
        .collect();
    Ok(QueryResult {
        meta: meta.clone(),
        output: QueryOutput::Rows(ResultSet { columns, rows }),
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::schema::{DataType, Schema};
    use crate::value::Value;
    use crate::write::WriteOptions;

    fn reader() -> FileReader {
        let schema = Schema::try_new(vec![
            Field::new("ID", DataType::Int32, false),
            Field::new("Name", DataType::Utf8, true),
            Field::new("Score", DataType::Int32, true),
        ])
        .unwrap();
        let rows: Vec<Row> = (0..20)
            .map(|i| {
                vec![
                    Some(Value::Int32(i)),
                    (i % 5 != 0).then(|| Value::from(format!("name-{}", i % 3))),
                    Some(Value::Int32(i * 10)),
                ]
            })
            .collect();
        let bytes =
            crate::write(&rows, schema, WriteOptions::default().with_row_group_size(5)).unwrap();
        FileReader::try_new(bytes).unwrap()
    }

    #[test]
    fn test_filter_and_project() {
        let reader = reader();
        let options = ReadOptions::new()
            .filter_expr("ID > 12")
            .with_projection(["Score", "ID"]);
        let result = execute(&reader, &options).unwrap();

        let rows = result.rows().unwrap();
        let names: Vec<&str> = rows.columns.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Score", "ID"]);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows.rows[0], vec![Some(Value::Int32(130)), Some(Value::Int32(13))]);

        assert_eq!(result.metrics.row_groups_total, 4);
        assert_eq!(result.metrics.row_groups_pruned, 2);
        assert_eq!(result.metrics.row_groups_decoded, 2);
        assert_eq!(result.metrics.rows_decoded, 10);
        assert_eq!(result.metrics.rows_matched, 7);
    }

    #[test]
    fn test_nulls_never_match() {
        let reader = reader();
        let options = ReadOptions::new().filter_expr("Name < 'zzz'");
        let result = execute(&reader, &options).unwrap();
        // every fifth Name is null
        assert_eq!(result.rows().unwrap().len(), 16);
    }

    #[test]
    fn test_invalid_filter_is_ignored() {
        let reader = reader();
        let options = ReadOptions::new().filter_expr("ID >= 3");
        assert_eq!(options.filter, None);
        let result = execute(&reader, &options).unwrap();
        assert_eq!(result.rows().unwrap().len(), 20);
        assert_eq!(result.metrics.row_groups_pruned, 0);
    }

    #[test]
    fn test_unknown_columns() {
        let reader = reader();
        let err = execute(&reader, &ReadOptions::new().filter_expr("Nope = 1")).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(c) if c == "Nope"));
        let err = execute(&reader, &ReadOptions::new().with_projection(["ID", "Nope"])).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(c) if c == "Nope"));
    }

    #[test]
    fn test_stats_only() {
        let reader = reader();
        let options = ReadOptions::new()
            .filter_expr("ID > 100")
            .with_projection(["Nope"])
            .with_stats_only(true);
        let result = execute(&reader, &options).unwrap();
        let stats = result.stats().unwrap();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[3].stats[0].max, Some(Value::Int32(19)));
        assert_eq!(result.metrics.row_groups_decoded, 0);
    }

    #[test]
    fn test_empty_projection() {
        let reader = reader();
        let result = execute(&reader, &ReadOptions::new().with_projection(Vec::<String>::new())).unwrap();
        let rows = result.rows().unwrap();
        assert!(rows.columns.is_empty());
        assert_eq!(rows.len(), 20);
        assert!(rows.rows.iter().all(|r| r.is_empty()));
    }
}
