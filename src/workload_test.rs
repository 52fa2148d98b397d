use std::io::Cursor;

use super::*;

#[test]
fn test_write_then_read_round_trip() {
    let records = vec![
        Record { op: Op::BulkLoad, key: 1_i32, value: 10_i32 },
        Record { op: Op::Query, key: 2, value: 0 },
        Record { op: Op::Update, key: 3, value: 30 },
        Record { op: Op::Insert, key: 4, value: 40 },
        Record { op: Op::Delete, key: 5, value: 0 },
    ];

    let mut buf = Vec::new();
    write(&mut buf, &records).unwrap();

    let mut cursor = Cursor::new(buf);
    let read_back: Vec<Record<i32, i32>> = read(&mut cursor).unwrap();

    assert_eq!(read_back.len(), records.len());
    for (a, b) in records.iter().zip(read_back.iter()) {
        assert_eq!(a.op, b.op);
        assert_eq!(a.key, b.key);
        assert_eq!(a.value, b.value);
    }
}

#[test]
fn test_empty_workload_round_trips() {
    let records: Vec<Record<i64, i64>> = Vec::new();
    let mut buf = Vec::new();
    write(&mut buf, &records).unwrap();

    let mut cursor = Cursor::new(buf);
    let read_back: Vec<Record<i64, i64>> = read(&mut cursor).unwrap();
    assert!(read_back.is_empty());
}

#[test]
fn test_unknown_op_code_is_an_error() {
    // count = 1, op = 9 (invalid), then 8 garbage bytes for a u32 key/value.
    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(&1_i32.to_le_bytes());
    buf.push(9);
    buf.extend_from_slice(&0_u32.to_le_bytes());
    buf.extend_from_slice(&0_u32.to_le_bytes());

    let mut cursor = Cursor::new(buf);
    let result: Result<Vec<Record<u32, u32>>> = read(&mut cursor);
    assert!(result.is_err());
}

#[test]
fn test_truncated_file_is_an_error() {
    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(&1_i32.to_le_bytes());
    // no record bytes follow.
    let mut cursor = Cursor::new(buf);
    let result: Result<Vec<Record<i64, i64>>> = read(&mut cursor);
    assert!(result.is_err());
}
