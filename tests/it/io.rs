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

use rand::{rngs::StdRng, Rng, SeedableRng};
use skiff::{
    encodings::Encoding, stat::stat_row_group, Column, Compression, DataType, Field, FileReader,
    FileWriter, ReadOptions, Row, Schema, Value, WriteOptions,
};

pub const WRITE_GROUP: usize = 128;

pub fn new_test_rows(size: usize) -> (Schema, Vec<Row>) {
    let schema = Schema::try_new(vec![
        Field::new("index", DataType::Int32, false),
        Field::new("random", DataType::Int32, true),
        Field::new("constant", DataType::Int32, true),
        Field::new("name", DataType::Utf8, true),
        Field::new("category", DataType::Utf8, true),
    ])
    .unwrap();
    let columns = vec![
        create_index(size),
        create_random_index(size, 0.2),
        create_constant(size, 0.1),
        create_random_string(size, 0.4),
        create_category(size, 0.3),
    ];
    (schema, to_rows(&columns, size))
}

fn to_rows(columns: &[Column], size: usize) -> Vec<Row> {
    (0..size)
        .map(|i| columns.iter().map(|c| c.value(i)).collect())
        .collect()
}

fn create_index(size: usize) -> Column {
    Column::Int32((0..size as i32).map(Some).collect())
}

fn create_random_index(size: usize, null_density: f32) -> Column {
    let mut rng = StdRng::seed_from_u64(42);
    Column::Int32(
        (0..size)
            .map(|_| {
                if rng.gen::<f32>() > null_density {
                    Some(rng.gen::<i32>())
                } else {
                    None
                }
            })
            .collect(),
    )
}

fn create_constant(size: usize, null_density: f32) -> Column {
    let mut rng = StdRng::seed_from_u64(7);
    Column::Int32(
        (0..size)
            .map(|_| (rng.gen::<f32>() > null_density).then_some(-17))
            .collect(),
    )
}

fn create_random_string(size: usize, null_density: f32) -> Column {
    let mut rng = StdRng::seed_from_u64(42);
    Column::Utf8(
        (0..size)
            .map(|_| {
                if rng.gen::<f32>() > null_density {
                    let value = rng.gen_range::<i32, _>(0i32..size as i32);
                    Some(format!("{value}"))
                } else {
                    None
                }
            })
            .collect(),
    )
}

fn create_category(size: usize, null_density: f32) -> Column {
    let categories = ["", "red", "green", "blue", "ünïcödé"];
    let mut rng = StdRng::seed_from_u64(9);
    Column::Utf8(
        (0..size)
            .map(|_| {
                (rng.gen::<f32>() > null_density)
                    .then(|| categories[rng.gen_range(0..categories.len())].to_owned())
            })
            .collect(),
    )
}

#[test]
fn test_basic() {
    let schema = Schema::try_new(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Utf8, true),
    ])
    .unwrap();
    let rows: Vec<Row> = vec![
        vec![Some(Value::Int32(1)), Some(Value::from("1.1"))],
        vec![Some(Value::Int32(2)), None],
        vec![None, Some(Value::from(""))],
        vec![Some(Value::Int32(i32::MIN)), Some(Value::from("6.6"))],
    ];
    test_write_read(schema, rows);
}

#[test]
fn test_random_nonull() {
    let size = 1000;
    let columns = vec![
        create_index(size),
        create_random_index(size, 0.0),
        create_random_string(size, 0.0),
    ];
    let schema = Schema::try_new(vec![
        Field::new("index", DataType::Int32, false),
        Field::new("random", DataType::Int32, false),
        Field::new("name", DataType::Utf8, false),
    ])
    .unwrap();
    test_write_read(schema, to_rows(&columns, size));
}

#[test]
fn test_random() {
    let (schema, rows) = new_test_rows(1000);
    test_write_read(schema, rows);
}

#[test]
fn test_all_null() {
    let size = 300;
    let columns = vec![
        create_random_index(size, 1.0),
        create_random_string(size, 1.0),
    ];
    let schema = Schema::try_new(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Utf8, true),
    ])
    .unwrap();
    test_write_read(schema, to_rows(&columns, size));
}

#[test]
fn test_write_file() {
    let (schema, rows) = new_test_rows(500);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.skiff");

    let options = WriteOptions::default().with_row_group_size(WRITE_GROUP);
    let meta = skiff::write_file(&path, &rows, schema, options).unwrap();
    assert_eq!(meta.row_groups.len(), 4);

    let result = skiff::read_file(&path, &ReadOptions::default()).unwrap();
    assert_eq!(result.meta, meta);
    assert_eq!(result.rows().unwrap().rows, rows);
}

#[test]
fn test_finish_to_writer() {
    let (schema, rows) = new_test_rows(200);
    let mut file = tempfile::tempfile().unwrap();
    let mut writer = FileWriter::new(schema.clone(), WriteOptions::default()).unwrap();
    writer.write(&rows).unwrap();
    writer.finish_to(&mut file).unwrap();

    use std::io::{Read, Seek, SeekFrom};
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut bytes = vec![];
    file.read_to_end(&mut bytes).unwrap();

    let expected = skiff::write(&rows, schema, WriteOptions::default()).unwrap();
    assert_eq!(bytes, expected);
}

#[test]
fn test_forbidden_encodings() {
    let (schema, rows) = new_test_rows(1000);
    for forbidden in [
        vec![Encoding::Rle],
        vec![Encoding::Dictionary],
        vec![Encoding::Rle, Encoding::Dictionary],
    ] {
        let options = WriteOptions::default()
            .with_row_group_size(WRITE_GROUP)
            .with_forbidden_encodings(forbidden.clone());
        let bytes = skiff::write(&rows, schema.clone(), options).unwrap();
        let reader = FileReader::try_new(bytes).unwrap();
        for i in 0..reader.num_row_groups() {
            for info in stat_row_group(&reader, i).unwrap() {
                assert!(!forbidden.contains(&info.encoding), "{forbidden:?}");
            }
        }
        let result = skiff::query::execute(&reader, &ReadOptions::default()).unwrap();
        assert_eq!(result.rows().unwrap().rows, rows);
    }
}

#[test]
fn test_chosen_encodings() {
    let (schema, rows) = new_test_rows(1000);
    let options = WriteOptions::default().with_row_group_size(WRITE_GROUP);
    let reader = FileReader::try_new(skiff::write(&rows, schema, options).unwrap()).unwrap();
    for i in 0..reader.num_row_groups() {
        let infos = stat_row_group(&reader, i).unwrap();
        assert_eq!(infos[0].encoding, Encoding::Raw, "index");
        assert_eq!(infos[1].encoding, Encoding::Raw, "random");
        assert_eq!(infos[2].encoding, Encoding::Rle, "constant");
        assert_eq!(infos[4].encoding, Encoding::Dictionary, "category");
    }
}

fn test_write_read(schema: Schema, rows: Vec<Row>) {
    let compressions = vec![
        Compression::LZ4,
        Compression::ZSTD,
        Compression::SNAPPY,
        Compression::None,
    ];

    for compression in compressions {
        for row_group_size in [1, 3, WRITE_GROUP, rows.len().max(1)] {
            test_write_read_with_options(
                schema.clone(),
                &rows,
                WriteOptions::default()
                    .with_compression(compression)
                    .with_row_group_size(row_group_size),
            );
        }
    }
}

fn test_write_read_with_options(schema: Schema, rows: &[Row], options: WriteOptions) {
    let row_group_size = options.row_group_size;
    let compression = options.compression;
    let bytes = skiff::write(rows, schema.clone(), options).unwrap();

    let result = skiff::read(bytes, &ReadOptions::default()).unwrap();
    assert_eq!(result.meta.schema, schema);
    assert_eq!(result.meta.compression, compression);
    assert_eq!(result.meta.total_row_count, rows.len() as u64);
    assert_eq!(
        result.meta.row_groups.len(),
        (rows.len() + row_group_size - 1) / row_group_size
    );

    let result = result.rows().unwrap();
    assert_eq!(result.columns, schema.fields);
    assert_eq!(result.rows, rows);
}
