//! End-to-end tests: frames written through the in-memory backend and
//! read back as frames.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tabula_rdbc::prelude::*;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

fn timestamp(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    date(y, mo, d).and_hms_opt(h, mi, s).unwrap()
}

fn setup() -> (MemoryDb, MemoryConnection, TypeRegistry) {
    let db = MemoryDb::new();
    let conn = db.connect();
    (db, conn, TypeRegistry::default())
}

// ==================== Full Type Surface Tests ====================

/// Every writable element type crosses the boundary and comes back.
/// Unsigned widths land in the next wider signed type; everything else
/// keeps its type exactly. The middle row is missing in every column,
/// and the last row deliberately stores values that collide with the
/// columns' storage sentinels, which must stay present.
#[tokio::test]
async fn test_all_types_roundtrip() {
    let (_db, conn, registry) = setup();
    let uuid_a: Uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    let epoch_tz = Utc.timestamp_opt(0, 0).unwrap();

    let frame = DataFrame::new(vec![
        Column::from_options(
            "b",
            SemanticType::Bool,
            vec![Some(Value::Bool(true)), None, Some(Value::Bool(false))],
        )
        .unwrap(),
        Column::from_options(
            "i8",
            SemanticType::Int8,
            vec![Some(Value::Int8(-8)), None, Some(Value::Int8(127))],
        )
        .unwrap(),
        Column::from_options(
            "i16",
            SemanticType::Int16,
            vec![Some(Value::Int16(-1600)), None, Some(Value::Int16(0))],
        )
        .unwrap(),
        Column::from_options(
            "i32",
            SemanticType::Int32,
            vec![Some(Value::Int32(320_000)), None, Some(Value::Int32(-1))],
        )
        .unwrap(),
        Column::from_options(
            "i64",
            SemanticType::Int64,
            vec![
                Some(Value::Int64(i64::MAX)),
                None,
                Some(Value::Int64(i64::MIN)),
            ],
        )
        .unwrap(),
        Column::from_options(
            "u8",
            SemanticType::UInt8,
            vec![Some(Value::UInt8(200)), None, Some(Value::UInt8(0))],
        )
        .unwrap(),
        Column::from_options(
            "u16",
            SemanticType::UInt16,
            vec![Some(Value::UInt16(65_000)), None, Some(Value::UInt16(1))],
        )
        .unwrap(),
        Column::from_options(
            "u32",
            SemanticType::UInt32,
            vec![
                Some(Value::UInt32(4_000_000_000)),
                None,
                Some(Value::UInt32(7)),
            ],
        )
        .unwrap(),
        Column::from_options(
            "u64",
            SemanticType::UInt64,
            vec![
                Some(Value::UInt64(9_000_000_000)),
                None,
                Some(Value::UInt64(3)),
            ],
        )
        .unwrap(),
        Column::from_options(
            "f32",
            SemanticType::Float32,
            vec![
                Some(Value::Float32(1.5)),
                None,
                Some(Value::Float32(-2.25)),
            ],
        )
        .unwrap(),
        Column::from_options(
            "f64",
            SemanticType::Float64,
            vec![
                Some(Value::Float64(std::f64::consts::PI)),
                None,
                Some(Value::Float64(-0.5)),
            ],
        )
        .unwrap(),
        Column::from_options(
            "s",
            SemanticType::Utf8,
            vec![
                Some(Value::Utf8("alpha".into())),
                None,
                Some(Value::Utf8(String::new())),
            ],
        )
        .unwrap(),
        Column::from_options(
            "txt",
            SemanticType::Text,
            vec![
                Some(Value::Utf8("a longer body of text".into())),
                None,
                Some(Value::Utf8("x".into())),
            ],
        )
        .unwrap(),
        Column::from_options(
            "u",
            SemanticType::Uuid,
            vec![Some(Value::Uuid(uuid_a)), None, Some(Value::Uuid(Uuid::nil()))],
        )
        .unwrap(),
        Column::from_options(
            "d",
            SemanticType::LocalDate,
            vec![
                Some(Value::Date(date(2024, 1, 2))),
                None,
                Some(Value::Date(date(1970, 1, 1))),
            ],
        )
        .unwrap(),
        Column::from_options(
            "t",
            SemanticType::LocalTime,
            vec![
                Some(Value::Time(time(9, 30, 0))),
                None,
                Some(Value::Time(time(0, 0, 0))),
            ],
        )
        .unwrap(),
        Column::from_options(
            "ts",
            SemanticType::Instant,
            vec![
                Some(Value::Timestamp(timestamp(2024, 1, 2, 9, 30, 0))),
                None,
                Some(Value::Timestamp(timestamp(1970, 1, 1, 0, 0, 0))),
            ],
        )
        .unwrap(),
        Column::from_options(
            "tstz",
            SemanticType::ZonedDateTime,
            vec![
                Some(Value::TimestampTz(
                    Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap(),
                )),
                None,
                Some(Value::TimestampTz(epoch_tz)),
            ],
        )
        .unwrap(),
        Column::from_options(
            "dur",
            SemanticType::Duration,
            vec![
                Some(Value::Duration(86_400_000_000)),
                None,
                Some(Value::Duration(0)),
            ],
        )
        .unwrap(),
    ])
    .unwrap()
    .with_name("every_type");

    let options = WriteOptions::new();
    assert!(ensure_table(&conn, &registry, &frame, &options).await.unwrap());
    let written = write_dataset(&conn, &frame, &registry, &options).await.unwrap();
    assert_eq!(written, 3);

    let back = read_table(&conn, "every_type", &registry).await.unwrap();
    assert_eq!(back.row_count(), 3);
    assert_eq!(back.column_count(), frame.column_count());

    let expect = |label: &str, datatype: SemanticType, rows: Vec<Option<Value>>| {
        let column = back.column(label).unwrap_or_else(|| panic!("no column {label}"));
        assert_eq!(column.datatype(), datatype, "datatype of {label}");
        assert_eq!(column.to_options(), rows, "rows of {label}");
    };

    expect(
        "b",
        SemanticType::Bool,
        vec![Some(Value::Bool(true)), None, Some(Value::Bool(false))],
    );
    expect(
        "i8",
        SemanticType::Int8,
        vec![Some(Value::Int8(-8)), None, Some(Value::Int8(127))],
    );
    expect(
        "i16",
        SemanticType::Int16,
        vec![Some(Value::Int16(-1600)), None, Some(Value::Int16(0))],
    );
    expect(
        "i32",
        SemanticType::Int32,
        vec![Some(Value::Int32(320_000)), None, Some(Value::Int32(-1))],
    );
    expect(
        "i64",
        SemanticType::Int64,
        vec![
            Some(Value::Int64(i64::MAX)),
            None,
            Some(Value::Int64(i64::MIN)),
        ],
    );
    // Unsigned widths come back in the next wider signed type.
    expect(
        "u8",
        SemanticType::Int16,
        vec![Some(Value::Int16(200)), None, Some(Value::Int16(0))],
    );
    expect(
        "u16",
        SemanticType::Int32,
        vec![Some(Value::Int32(65_000)), None, Some(Value::Int32(1))],
    );
    expect(
        "u32",
        SemanticType::Int64,
        vec![
            Some(Value::Int64(4_000_000_000)),
            None,
            Some(Value::Int64(7)),
        ],
    );
    expect(
        "u64",
        SemanticType::Int64,
        vec![
            Some(Value::Int64(9_000_000_000)),
            None,
            Some(Value::Int64(3)),
        ],
    );
    expect(
        "f32",
        SemanticType::Float32,
        vec![
            Some(Value::Float32(1.5)),
            None,
            Some(Value::Float32(-2.25)),
        ],
    );
    expect(
        "f64",
        SemanticType::Float64,
        vec![
            Some(Value::Float64(std::f64::consts::PI)),
            None,
            Some(Value::Float64(-0.5)),
        ],
    );
    expect(
        "s",
        SemanticType::Utf8,
        vec![
            Some(Value::Utf8("alpha".into())),
            None,
            Some(Value::Utf8(String::new())),
        ],
    );
    expect(
        "txt",
        SemanticType::Text,
        vec![
            Some(Value::Utf8("a longer body of text".into())),
            None,
            Some(Value::Utf8("x".into())),
        ],
    );
    expect(
        "u",
        SemanticType::Uuid,
        vec![Some(Value::Uuid(uuid_a)), None, Some(Value::Uuid(Uuid::nil()))],
    );
    expect(
        "d",
        SemanticType::LocalDate,
        vec![
            Some(Value::Date(date(2024, 1, 2))),
            None,
            Some(Value::Date(date(1970, 1, 1))),
        ],
    );
    expect(
        "t",
        SemanticType::LocalTime,
        vec![
            Some(Value::Time(time(9, 30, 0))),
            None,
            Some(Value::Time(time(0, 0, 0))),
        ],
    );
    expect(
        "ts",
        SemanticType::Instant,
        vec![
            Some(Value::Timestamp(timestamp(2024, 1, 2, 9, 30, 0))),
            None,
            Some(Value::Timestamp(timestamp(1970, 1, 1, 0, 0, 0))),
        ],
    );
    expect(
        "tstz",
        SemanticType::ZonedDateTime,
        vec![
            Some(Value::TimestampTz(
                Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap(),
            )),
            None,
            Some(Value::TimestampTz(epoch_tz)),
        ],
    );
    expect(
        "dur",
        SemanticType::Duration,
        vec![
            Some(Value::Duration(86_400_000_000)),
            None,
            Some(Value::Duration(0)),
        ],
    );
}

// ==================== Scale and Batch Boundary Tests ====================

fn thousand_rows() -> DataFrame {
    let mut id = Column::new("id", SemanticType::Int64).unwrap();
    let mut val = Column::new("val", SemanticType::Float64).unwrap();
    let mut tag = Column::new("tag", SemanticType::Utf8).unwrap();
    for i in 0..1000i64 {
        id.push(Value::Int64(i)).unwrap();
        if i % 7 == 0 || i == 999 {
            val.push_missing();
        } else {
            val.push(Value::Float64(i as f64 / 4.0)).unwrap();
        }
        if i % 13 == 0 {
            tag.push_missing();
        } else {
            tag.push(Value::Utf8(format!("row-{i}"))).unwrap();
        }
    }
    DataFrame::new(vec![id, val, tag])
        .unwrap()
        .with_name("big")
        .with_primary_key(vec!["id".to_string()])
}

#[tokio::test]
async fn test_thousand_rows_with_missing_cells() {
    let (db, conn, registry) = setup();
    let frame = thousand_rows();

    let options = WriteOptions::new().with_batch_size(128);
    ensure_table(&conn, &registry, &frame, &options).await.unwrap();
    let written = write_dataset(&conn, &frame, &registry, &options).await.unwrap();
    assert_eq!(written, 1000);
    assert_eq!(db.row_count("big"), Some(1000));

    let back = read_dataset(
        &conn,
        "SELECT * FROM big ORDER BY id",
        &registry,
        &ReadOptions::new().with_batch_size(256),
    )
    .await
    .unwrap();
    assert_eq!(back.row_count(), 1000);

    let id = back.column("id").unwrap();
    let val = back.column("val").unwrap();
    let tag = back.column("tag").unwrap();
    assert_eq!(val.missing_count(), 144);
    assert!(val.is_missing(0));
    assert!(val.is_missing(999));
    for i in 0..1000usize {
        assert_eq!(id.value(i), Some(Value::Int64(i as i64)));
        if i % 7 == 0 || i == 999 {
            assert_eq!(val.value(i), None);
        } else {
            assert_eq!(val.value(i), Some(Value::Float64(i as f64 / 4.0)));
        }
        if i % 13 == 0 {
            assert_eq!(tag.value(i), None);
        } else {
            assert_eq!(tag.value(i), Some(Value::Utf8(format!("row-{i}"))));
        }
    }
}

#[tokio::test]
async fn test_empty_frame_roundtrip() {
    let (db, conn, registry) = setup();
    let frame = DataFrame::new(vec![
        Column::new("id", SemanticType::Int64).unwrap(),
        Column::new("name", SemanticType::Utf8).unwrap(),
    ])
    .unwrap()
    .with_name("nothing");

    let options = WriteOptions::new();
    ensure_table(&conn, &registry, &frame, &options).await.unwrap();
    let written = write_dataset(&conn, &frame, &registry, &options).await.unwrap();
    assert_eq!(written, 0);
    assert_eq!(db.row_count("nothing"), Some(0));

    // An empty result still reads back with the full column structure.
    let back = read_table(&conn, "nothing", &registry).await.unwrap();
    assert_eq!(back.row_count(), 0);
    assert_eq!(back.column_names(), vec!["id", "name"]);
    assert_eq!(back.column("id").unwrap().datatype(), SemanticType::Int64);
    assert_eq!(back.column("name").unwrap().datatype(), SemanticType::Utf8);
}

// ==================== Price Series Scenario Tests ====================

fn ohlcv(rows: &[(NaiveDate, &str, f64)]) -> DataFrame {
    let mut d = Column::new("date", SemanticType::LocalDate).unwrap();
    let mut s = Column::new("symbol", SemanticType::Utf8).unwrap();
    let mut p = Column::new("price", SemanticType::Float64).unwrap();
    for (day, symbol, price) in rows {
        d.push(Value::Date(*day)).unwrap();
        s.push(Value::Utf8((*symbol).into())).unwrap();
        p.push(Value::Float64(*price)).unwrap();
    }
    DataFrame::new(vec![d, s, p])
        .unwrap()
        .with_name("ohlcv")
        .with_primary_key(vec!["date".to_string(), "symbol".to_string()])
}

#[tokio::test]
async fn test_price_series_upsert_roundtrip() {
    let (db, conn, registry) = setup();
    let first = ohlcv(&[
        (date(2024, 1, 2), "AAPL", 185.64),
        (date(2024, 1, 2), "MSFT", 370.87),
        (date(2024, 1, 3), "AAPL", 184.25),
    ]);

    let options = WriteOptions::new().with_upsert(true);
    ensure_table(&conn, &registry, &first, &options).await.unwrap();
    assert_eq!(
        db.primary_key("ohlcv"),
        Some(vec!["date".to_string(), "symbol".to_string()])
    );
    assert_eq!(
        db.declared_columns("ohlcv"),
        Some(vec![
            ("date".to_string(), "date".to_string()),
            ("symbol".to_string(), "varchar(4096)".to_string()),
            ("price".to_string(), "double precision".to_string()),
        ])
    );

    write_dataset(&conn, &first, &registry, &options).await.unwrap();
    assert_eq!(db.row_count("ohlcv"), Some(3));

    // A correction for one row plus one new row.
    let second = ohlcv(&[
        (date(2024, 1, 3), "AAPL", 181.91),
        (date(2024, 1, 3), "MSFT", 372.52),
    ]);
    write_dataset(&conn, &second, &registry, &options).await.unwrap();
    assert_eq!(db.row_count("ohlcv"), Some(4));

    let back = read_dataset(
        &conn,
        "SELECT * FROM ohlcv ORDER BY date, symbol",
        &registry,
        &ReadOptions::new(),
    )
    .await
    .unwrap();
    assert_eq!(back.row_count(), 4);

    let prices = back.column("price").unwrap().to_options();
    assert_eq!(
        prices,
        vec![
            Some(Value::Float64(185.64)),
            Some(Value::Float64(370.87)),
            Some(Value::Float64(181.91)),
            Some(Value::Float64(372.52)),
        ]
    );
    let symbols = back.column("symbol").unwrap().to_options();
    assert_eq!(
        symbols,
        vec![
            Some(Value::Utf8("AAPL".into())),
            Some(Value::Utf8("MSFT".into())),
            Some(Value::Utf8("AAPL".into())),
            Some(Value::Utf8("MSFT".into())),
        ]
    );
}

/// Two months of one ticker: create, insert, read back ordered.
#[tokio::test]
async fn test_two_row_price_history() {
    let (_db, conn, registry) = setup();
    let frame = ohlcv(&[
        (date(2000, 1, 1), "MSFT", 39.81),
        (date(2000, 2, 1), "MSFT", 36.35),
    ]);

    let options = WriteOptions::new();
    ensure_table(&conn, &registry, &frame, &options).await.unwrap();
    write_dataset(&conn, &frame, &registry, &options).await.unwrap();

    let back = read_dataset(
        &conn,
        "SELECT * FROM ohlcv ORDER BY date, symbol",
        &registry,
        &ReadOptions::new(),
    )
    .await
    .unwrap();
    assert_eq!(back.row_count(), 2);

    let prices = back.column("price").unwrap();
    for (row, expected) in [39.81f64, 36.35].into_iter().enumerate() {
        let got = prices.value(row).and_then(|v| v.as_f64()).unwrap();
        assert!((got - expected).abs() < 1e-9, "row {row}: {got}");
    }
    assert_eq!(
        back.column("date").unwrap().value(0),
        Some(Value::Date(date(2000, 1, 1)))
    );
    assert_eq!(
        back.column("symbol").unwrap().value(1),
        Some(Value::Utf8("MSFT".into()))
    );
}

// ==================== Missing Versus Sentinel Tests ====================

/// NULL in the database is the only thing that becomes a missing row;
/// values equal to a column's storage sentinel stay present.
#[tokio::test]
async fn test_missing_rows_survive_and_sentinels_do_not_leak() {
    let (_db, conn, registry) = setup();
    let frame = DataFrame::new(vec![Column::from_options(
        "n",
        SemanticType::Int64,
        vec![Some(Value::Int64(i64::MIN)), None, Some(Value::Int64(42))],
    )
    .unwrap()])
    .unwrap()
    .with_name("edge");

    let options = WriteOptions::new();
    ensure_table(&conn, &registry, &frame, &options).await.unwrap();
    write_dataset(&conn, &frame, &registry, &options).await.unwrap();

    let back = read_table(&conn, "edge", &registry).await.unwrap();
    let n = back.column("n").unwrap();
    assert_eq!(n.value(0), Some(Value::Int64(i64::MIN)));
    assert!(!n.is_missing(0));
    assert_eq!(n.value(1), None);
    assert!(n.is_missing(1));
    assert_eq!(n.value(2), Some(Value::Int64(42)));
    assert_eq!(n.missing_count(), 1);
}
