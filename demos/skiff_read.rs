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

use std::time::Instant;

use skiff::{QueryOutput, ReadOptions, Result};

fn setup_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();
}

// cargo run --example skiff_read -- /tmp/output.skiff [--where "Index > 500"] [--select a,b] [--stats]
fn main() -> Result<()> {
    setup_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: skiff_read <file.skiff> [--where <expr>] [--select <a,b>] [--stats]");
        std::process::exit(2);
    }

    let mut options = ReadOptions::new();
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match (arg.as_str(), rest.clone().next()) {
            ("--where", Some(expr)) => {
                options = options.filter_expr(expr);
                rest.next();
            }
            ("--select", Some(columns)) => {
                options = options.with_projection(columns.split(',').map(str::trim));
                rest.next();
            }
            ("--stats", _) => options = options.with_stats_only(true),
            (other, _) => {
                eprintln!("unexpected argument `{other}`");
                std::process::exit(2);
            }
        }
    }

    let t = Instant::now();
    let result = skiff::read_file(&args[1], &options)?;
    match &result.output {
        QueryOutput::Stats(groups) => {
            for (i, group) in groups.iter().enumerate() {
                println!(
                    "row group {i} @{} rows={} compressed={} uncompressed={}",
                    group.offset, group.row_count, group.compressed_length, group.uncompressed_length
                );
                for (field, stats) in result.meta.schema.fields.iter().zip(group.stats.iter()) {
                    let show = |v: &Option<skiff::Value>| {
                        v.as_ref().map_or("null".to_owned(), |v| v.to_string())
                    };
                    println!(
                        "  {}: min={} max={} nulls={}",
                        field.name,
                        show(&stats.min),
                        show(&stats.max),
                        stats.null_count
                    );
                }
            }
        }
        QueryOutput::Rows(set) => {
            let header: Vec<&str> = set.columns.iter().map(|f| f.name.as_str()).collect();
            println!("{}", header.join(","));
            for row in set.rows.iter() {
                let cells: Vec<String> = row
                    .iter()
                    .map(|c| c.as_ref().map(|v| v.to_string()).unwrap_or_default())
                    .collect();
                println!("{}", cells.join(","));
            }
            if set.is_empty() {
                println!("no rows matched");
            }
        }
    }
    println!("cost {:?} ms", t.elapsed().as_millis());
    Ok(())
}
