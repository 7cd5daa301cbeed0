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
use std::fs;

use skiff::{Compression, DataType, Field, Result, Row, Schema, WriteOptions};

fn setup_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();
}

/// Naive comma separated loader: no quoting, empty cells are null.
fn load_csv(path: &str) -> Result<(Vec<String>, Vec<HashMap<String, Option<String>>>)> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let headers: Vec<String> = match lines.next() {
        Some(line) => line.split(',').map(|h| h.trim().to_owned()).collect(),
        None => return Ok((vec![], vec![])),
    };

    let records = lines
        .map(|line| {
            let parts: Vec<&str> = line.split(',').collect();
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let cell = parts
                        .get(i)
                        .map(|v| v.trim())
                        .filter(|v| !v.is_empty())
                        .map(str::to_owned);
                    (h.clone(), cell)
                })
                .collect()
        })
        .collect();
    Ok((headers, records))
}

/// A column is Int32 when every present cell parses as one.
fn infer_schema(
    headers: &[String],
    records: &[HashMap<String, Option<String>>],
) -> Result<Schema> {
    let fields = headers
        .iter()
        .map(|h| {
            let all_ints = records.iter().all(|r| match r.get(h).cloned().flatten() {
                Some(v) => v.parse::<i32>().is_ok(),
                None => true,
            });
            let data_type = if all_ints {
                DataType::Int32
            } else {
                DataType::Utf8
            };
            Field::new(h.clone(), data_type, true)
        })
        .collect();
    Schema::try_new(fields)
}

// cargo run --example skiff_write -- /tmp/input.csv /tmp/output.skiff [group size] [codec]
fn main() -> Result<()> {
    setup_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: skiff_write <input.csv> <output.skiff> [group size] [codec]");
        std::process::exit(2);
    }

    let row_group_size = match args.get(3) {
        Some(size) => size
            .parse()
            .map_err(|_| skiff::Error::InvalidOptions(format!("bad group size `{size}`")))?,
        None => skiff::write::DEFAULT_ROW_GROUP_SIZE,
    };
    let compression = match args.get(4) {
        Some(codec) => codec.parse::<Compression>()?,
        None => Compression::LZ4,
    };

    let (headers, records) = load_csv(&args[1])?;
    let schema = infer_schema(&headers, &records)?;
    let rows: Vec<Row> = records.iter().map(|r| schema.row_from_cells(r)).collect();

    let options = WriteOptions::default()
        .with_row_group_size(row_group_size)
        .with_compression(compression);
    let meta = skiff::write_file(&args[2], &rows, schema, options)?;
    println!(
        "wrote {} rows in {} row groups to {}",
        meta.total_row_count,
        meta.row_groups.len(),
        args[2]
    );
    Ok(())
}
