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

use std::collections::HashMap;

use skiff::{
    encodings::Encoding, stat::stat_row_group, DataType, Error, Field, FileReader, Predicate,
    ReadOptions, Row, Schema, Value, WriteOptions,
};

const COUNTRIES: [&str; 6] = ["Chile", "France", "Japan", "Kenya", "Peru", "Spain"];

fn people() -> (Schema, Vec<Row>) {
    let schema = Schema::try_new(vec![
        Field::new("ID", DataType::Int32, false),
        Field::new("Name", DataType::Utf8, true),
    ])
    .unwrap();
    let rows = [(1, "Alice"), (1, "Alice"), (2, "Bob"), (3, "Carol")]
        .into_iter()
        .map(|(id, name)| vec![Some(Value::Int32(id)), Some(Value::from(name))])
        .collect();
    (schema, rows)
}

/// 1000 rows built from string cells, the way a CSV loader hands them over.
fn customers() -> FileReader {
    let schema = Schema::try_new(vec![
        Field::new("Index", DataType::Int32, false),
        Field::new("First Name", DataType::Utf8, true),
        Field::new("Country", DataType::Utf8, true),
    ])
    .unwrap();
    let rows: Vec<Row> = (1..=1000)
        .map(|i| {
            let mut cells = HashMap::new();
            cells.insert("Index".to_owned(), Some(i.to_string()));
            cells.insert("First Name".to_owned(), Some(format!("name{}", i % 37)));
            let country = (i % 11 != 0).then(|| COUNTRIES[i % COUNTRIES.len()].to_owned());
            cells.insert("Country".to_owned(), country);
            schema.row_from_cells(&cells)
        })
        .collect();
    let options = WriteOptions::default().with_row_group_size(100);
    FileReader::try_new(skiff::write(&rows, schema, options).unwrap()).unwrap()
}

fn query(reader: &FileReader, options: ReadOptions) -> skiff::QueryResult {
    skiff::query::execute(reader, &options).unwrap()
}

#[test]
fn test_round_trip_in_order() {
    let (schema, rows) = people();
    let options = WriteOptions::default().with_row_group_size(2);
    let bytes = skiff::write(&rows, schema, options).unwrap();

    let result = skiff::read(bytes, &ReadOptions::default()).unwrap();
    let counts: Vec<u64> = result.meta.row_groups.iter().map(|g| g.row_count).collect();
    assert_eq!(counts, vec![2, 2]);
    assert_eq!(result.rows().unwrap().rows, rows);
}

#[test]
fn test_constant_group_is_rle() {
    let (schema, rows) = people();
    let options = WriteOptions::default().with_row_group_size(2);
    let reader = FileReader::try_new(skiff::write(&rows, schema, options).unwrap()).unwrap();

    let first = stat_row_group(&reader, 0).unwrap();
    assert_eq!(first[0].encoding, Encoding::Rle);
    assert_eq!(first[0].encoding.tag(), 1);

    let second = stat_row_group(&reader, 1).unwrap();
    assert!(matches!(
        second[1].encoding,
        Encoding::Raw | Encoding::Dictionary
    ));
}

#[test]
fn test_range_filter_prunes() {
    let reader = customers();
    let result = query(&reader, ReadOptions::new().filter_expr("Index > 900"));

    let rows = &result.rows().unwrap().rows;
    assert_eq!(rows.len(), 100);
    for (row, expected) in rows.iter().zip(901..=1000) {
        assert_eq!(row[0], Some(Value::Int32(expected)));
    }
    assert_eq!(result.metrics.row_groups_total, 10);
    assert_eq!(result.metrics.row_groups_pruned, 9);
    assert_eq!(result.metrics.row_groups_decoded, 1);
}

#[test]
fn test_point_filter() {
    let reader = customers();
    let result = query(&reader, ReadOptions::new().filter_expr("Index = 1000"));
    let rows = &result.rows().unwrap().rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Some(Value::Int32(1000)));
    assert_eq!(result.metrics.row_groups_pruned, 9);

    let result = query(&reader, ReadOptions::new().filter_expr("Index < 2"));
    assert_eq!(result.rows().unwrap().len(), 1);
}

#[test]
fn test_no_match_is_distinct_from_missing_column() {
    let reader = customers();
    let result = query(&reader, ReadOptions::new().filter_expr("Country = 'ZZZ'"));
    assert!(result.rows().unwrap().is_empty());
    assert_eq!(result.metrics.rows_matched, 0);

    let err = skiff::query::execute(&reader, &ReadOptions::new().filter_expr("Region = 'ZZZ'"))
        .unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(c) if c == "Region"));
}

#[test]
fn test_stats_only_ignores_filter() {
    let reader = customers();
    let options = ReadOptions::new()
        .filter_expr("Index > 900")
        .with_stats_only(true);
    let result = query(&reader, options);

    let stats = result.stats().unwrap();
    assert_eq!(stats.len(), 10);
    assert_eq!(stats, &reader.meta().row_groups[..]);
    for (i, group) in stats.iter().enumerate() {
        let first = i as i32 * 100 + 1;
        assert_eq!(group.stats[0].min, Some(Value::Int32(first)));
        assert_eq!(group.stats[0].max, Some(Value::Int32(first + 99)));
    }
}

#[test]
fn test_projection_with_filter_on_other_column() {
    let reader = customers();
    let options = ReadOptions::new()
        .with_filter(Predicate::parse("Country = Peru").unwrap())
        .with_projection(["First Name", "Index"]);
    let result = query(&reader, options);

    let set = result.rows().unwrap();
    let names: Vec<&str> = set.columns.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["First Name", "Index"]);

    // Peru is COUNTRIES[4]; every 11th row has no country
    let expected: Vec<i32> = (1..=1000)
        .filter(|i| i % 6 == 4 && i % 11 != 0)
        .collect();
    let got: Vec<i32> = set
        .rows
        .iter()
        .map(|r| r[1].as_ref().and_then(Value::as_i32).unwrap())
        .collect();
    assert_eq!(got, expected);
    for row in set.rows.iter() {
        let i = row[1].as_ref().and_then(Value::as_i32).unwrap();
        assert_eq!(row[0], Some(Value::from(format!("name{}", i % 37))));
    }
}

#[test]
fn test_string_cells_are_coerced() {
    let reader = customers();
    let result = query(&reader, ReadOptions::new().with_projection(["Index", "Country"]));
    let rows = &result.rows().unwrap().rows;
    assert_eq!(rows[10], vec![Some(Value::Int32(11)), None]);
    assert_eq!(
        rows[0],
        vec![Some(Value::Int32(1)), Some(Value::from("France"))]
    );
    assert_eq!(reader.meta().row_groups[0].stats[2].null_count, 9);
}
