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

use skiff::{
    read::reader::read_meta, Compression, FileMeta, FileReader, FileWriter, Result, WriteOptions,
};

use crate::io::{new_test_rows, WRITE_GROUP};

fn write_data(dest: &mut Vec<u8>, compression: Compression) -> FileMeta {
    let (schema, rows) = new_test_rows(1000);
    let options = WriteOptions::default()
        .with_compression(compression)
        .with_row_group_size(WRITE_GROUP);
    let mut writer = FileWriter::new(schema, options).unwrap();
    writer.write(&rows).unwrap();
    writer.finish_to(dest).unwrap()
}

#[test]
fn test_read_meta() -> Result<()> {
    let mut buf = Vec::new();
    let expected_meta = write_data(&mut buf, Compression::LZ4);

    let mut reader = std::io::Cursor::new(buf);
    let meta = read_meta(&mut reader)?;
    assert_eq!(expected_meta, meta);

    // the reader is left at the first payload
    assert_eq!(reader.position(), meta.row_groups[0].offset);
    Ok(())
}

#[test]
fn test_offsets_resolve_to_payloads() -> Result<()> {
    for compression in [
        Compression::LZ4,
        Compression::ZSTD,
        Compression::SNAPPY,
        Compression::None,
    ] {
        let mut buf = Vec::new();
        let meta = write_data(&mut buf, compression);
        let reader = FileReader::try_new(buf.clone())?;

        let mut expected_offset = 4 + u32::from_le_bytes(buf[0..4].try_into().unwrap()) as u64;
        for (i, group) in meta.row_groups.iter().enumerate() {
            assert_eq!(group.offset, expected_offset);
            let start = group.offset as usize;
            let end = start + group.compressed_length as usize;
            assert_eq!(&reader.row_group_payload(i)?[..], &buf[start..end]);

            let mut decompressed = vec![0u8; group.uncompressed_length as usize];
            compression.decompress(&buf[start..end], &mut decompressed)?;
            assert_eq!(decompressed, reader.decompress_row_group(i)?);
            expected_offset += group.compressed_length;
        }
        assert_eq!(expected_offset, buf.len() as u64);
    }
    Ok(())
}

#[test]
fn test_metadata_wire_format() -> Result<()> {
    let mut buf = Vec::new();
    write_data(&mut buf, Compression::ZSTD);
    let len = u32::from_le_bytes(buf[0..4].try_into().unwrap()) as usize;
    let json: serde_json::Value = serde_json::from_slice(&buf[4..4 + len])?;

    assert_eq!(json["version"], 1);
    assert_eq!(json["compression"], "zstd");
    assert_eq!(json["totalRowCount"], 1000);
    assert_eq!(json["schema"][0]["name"], "index");
    assert_eq!(json["schema"][0]["type"], "int32");
    assert_eq!(json["schema"][3]["type"], "utf8");

    let group = &json["rowGroups"][1];
    assert_eq!(group["rowCount"], WRITE_GROUP);
    assert_eq!(group["stats"][0]["min"], 128);
    assert_eq!(group["stats"][0]["max"], 255);
    assert_eq!(group["stats"][0]["nullCount"], 0);
    assert!(group["offset"].is_u64());
    assert!(group["compressedLength"].is_u64());
    assert!(group["uncompressedLength"].is_u64());
    Ok(())
}
