#![cfg(feature = "sqlite")]

use std::io::Write;

use sql_portable::prelude::*;
use tempfile::{NamedTempFile, tempdir};

fn memory_conn() -> Result<Connection<SqliteDriver>, SqlPortableError> {
    let mut conn = SqliteOptions::new(":memory:".into()).build()?;
    conn.query(
        "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE, team TEXT, score REAL)",
        &[],
    )?;
    Ok(conn)
}

fn text(s: &str) -> RowValues {
    RowValues::Text(s.to_string())
}

#[test]
fn bind_insert_and_read_back() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = memory_conn()?;
    let stmt = conn.prepare("INSERT INTO people (id, name, team, score) VALUES (?, ?, ?, ?)");
    conn.execute_multiple(
        stmt,
        &[
            vec![RowValues::Int(1), text("o'neil"), text("red"), RowValues::Float(3.5)],
            vec![RowValues::Int(2), text("bob"), text("blue"), RowValues::Null],
            vec![RowValues::Int(3), text("cy"), text("red"), RowValues::Float(1.25)],
        ],
    )?;
    conn.free_prepared(stmt, true);

    let name = conn.get_one("SELECT name FROM people WHERE id = ?", &[RowValues::Int(1)])?;
    assert_eq!(name, Some(text("o'neil")));
    let score = conn.get_one("SELECT score FROM people WHERE id = 1", &[])?;
    assert_eq!(score, Some(RowValues::Float(3.5)));

    let teams = conn.get_assoc(
        "SELECT name, team FROM people ORDER BY id",
        &[],
        false,
        FetchMode::Default,
        false,
    )?;
    assert_eq!(teams["bob"].as_scalar(), Some(&text("blue")));

    let by_team = conn.get_assoc(
        "SELECT team, name FROM people ORDER BY id",
        &[],
        false,
        FetchMode::Default,
        true,
    )?;
    assert_eq!(by_team["red"].as_group().map(<[_]>::len), Some(2));

    let flipped = conn.get_all("SELECT id, name FROM people ORDER BY id", &[], FetchMode::OrderedFlipped)?;
    let columns = flipped.columns().expect("column-major");
    assert_eq!(
        columns[&ColumnKey::Index(0)],
        vec![RowValues::Int(1), RowValues::Int(2), RowValues::Int(3)]
    );
    Ok(())
}

#[test]
fn constraint_errors_map_to_portable_codes() -> Result<(), SqlPortableError> {
    let mut conn = memory_conn()?;
    conn.auto_execute(
        "people",
        &[("id", RowValues::Int(1)), ("name", text("ann"))],
        AutoQueryMode::Insert,
        None,
    )?;

    let dup = [("id", RowValues::Int(2)), ("name", text("ann"))];
    let err = conn
        .auto_execute("people", &dup, AutoQueryMode::Insert, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    assert!(err.user_info().unwrap().contains("[nativecode=2067"));

    conn.set_option("portability", Portability::ERRORS)?;
    let err = conn
        .auto_execute("people", &dup, AutoQueryMode::Insert, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Constraint);

    let err = conn
        .query("INSERT INTO people (id, name) VALUES (?, !)", &[RowValues::Int(9), RowValues::Null])
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConstraintNotNull);

    let err = conn.query("SELECT * FROM nope", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoSuchTable);
    let err = conn.query("SELECT salary FROM people", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoSuchField);
    let err = conn.query("SELEC 1", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Syntax);
    Ok(())
}

#[test]
fn update_reports_affected_rows() -> Result<(), SqlPortableError> {
    let mut conn = memory_conn()?;
    for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
        conn.query(
            "INSERT INTO people (id, name, team) VALUES (?, ?, 'red')",
            &[RowValues::Int(id), text(name)],
        )?;
    }

    conn.auto_execute(
        "people",
        &[("team", text("blue"))],
        AutoQueryMode::Update,
        Some("id > 1"),
    )?;
    assert_eq!(conn.affected_rows()?, 2);

    conn.set_option("portability", Portability::DELETE_COUNT)?;
    conn.query("DELETE FROM people", &[])?;
    assert_eq!(conn.last_query(), "DELETE FROM people WHERE 1=1");
    assert_eq!(conn.affected_rows()?, 3);
    Ok(())
}

#[test]
fn sequences_are_created_on_demand() -> Result<(), SqlPortableError> {
    let mut conn = SqliteOptions::new(":memory:".into()).build()?;

    let err = conn.next_id("orders", false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoSuchTable);

    assert_eq!(conn.next_id("orders", true)?, 1);
    assert_eq!(conn.next_id("orders", true)?, 2);
    let left = conn.get_one("SELECT COUNT(*) FROM orders_seq", &[])?;
    assert_eq!(left, Some(RowValues::Int(1)));

    conn.drop_sequence("orders")?;
    conn.set_option("seqname_format", "seq_%s")?;
    conn.create_sequence("line-items")?;
    assert_eq!(conn.get_sequence_name("line-items"), "seq_line_items");
    assert_eq!(conn.next_id("line-items", false)?, 1);
    Ok(())
}

#[test]
fn transactions_roll_back() -> Result<(), SqlPortableError> {
    let mut conn = memory_conn()?;
    conn.begin()?;
    conn.query("INSERT INTO people (id, name) VALUES (1, 'temp')", &[])?;
    conn.rollback()?;
    assert_eq!(conn.get_one("SELECT COUNT(*) FROM people", &[])?, Some(RowValues::Int(0)));

    conn.begin()?;
    conn.query("INSERT INTO people (id, name) VALUES (1, 'kept')", &[])?;
    conn.commit()?;
    assert_eq!(conn.get_one("SELECT COUNT(*) FROM people", &[])?, Some(RowValues::Int(1)));
    Ok(())
}

#[test]
fn opaque_placeholder_stores_file_contents() -> Result<(), Box<dyn std::error::Error>> {
    let mut text_file = NamedTempFile::new()?;
    write!(text_file, "line one\nit's line two")?;
    let mut blob_file = NamedTempFile::new()?;
    blob_file.write_all(&[0xff, 0x00, 0xfe])?;

    let mut conn = SqliteOptions::new(":memory:".into()).build()?;
    conn.query("CREATE TABLE docs (id INTEGER, body)", &[])?;
    let stmt = conn.prepare("INSERT INTO docs VALUES (?, &)");
    conn.execute(stmt, &[RowValues::Int(1), text(&text_file.path().to_string_lossy())])?;
    conn.execute(stmt, &[RowValues::Int(2), text(&blob_file.path().to_string_lossy())])?;

    let bodies = conn.get_col("SELECT body FROM docs ORDER BY id", &[], "body")?;
    assert_eq!(
        bodies,
        vec![
            text("line one\nit's line two"),
            RowValues::Blob(vec![0xff, 0x00, 0xfe])
        ]
    );
    Ok(())
}

#[test]
fn limit_query_and_portability_on_real_rows() -> Result<(), SqlPortableError> {
    let mut conn = SqliteOptionsBuilder::new(":memory:".into())
        .portability(Portability::LOWERCASE | Portability::RTRIM | Portability::NULL_TO_EMPTY)
        .fetch_mode(FetchMode::Associative)
        .build()?;
    conn.query("CREATE TABLE t (ID INTEGER, Label TEXT)", &[])?;
    for i in 0..10 {
        let label = if i == 4 { RowValues::Null } else { text(&format!("row {i}   ")) };
        conn.query("INSERT INTO t VALUES (?, ?)", &[RowValues::Int(i), label])?;
    }

    let mut result = conn
        .limit_query("SELECT ID, Label FROM t ORDER BY ID", 3, 2, &[])?
        .into_result()
        .expect("rows");
    assert_eq!(result.num_rows()?, 2);
    let Some(FetchedRow::Associative(first)) = result.fetch_row(FetchMode::Default)? else {
        panic!("expected associative row");
    };
    assert_eq!(first.get("label"), Some(&text("row 3")));
    let Some(FetchedRow::Associative(second)) = result.fetch_row(FetchMode::Default)? else {
        panic!("expected associative row");
    };
    assert_eq!(second.get("label"), Some(&text("")));
    assert!(result.fetch_row(FetchMode::Default)?.is_none());
    Ok(())
}

#[test]
fn huge_buffering_hint_still_reads_rows() -> Result<(), SqlPortableError> {
    let mut conn = memory_conn()?;
    conn.set_option("result_buffering", i64::MAX)?;
    assert_eq!(conn.get_one("SELECT 1", &[])?, Some(RowValues::Int(1)));

    conn.set_option("result_buffering", -5i64)?;
    conn.query("INSERT INTO people (id, name) VALUES (1, 'ann')", &[])?;
    assert_eq!(conn.get_col("SELECT name FROM people", &[], 0usize)?, vec![text("ann")]);
    Ok(())
}

#[test]
fn file_database_persists_between_connections() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("portable.db").to_string_lossy().into_owned();

    let mut conn = Connection::<SqliteDriver>::sqlite_builder(path.clone())
        .option("autofree", true)?
        .build()?;
    assert_eq!(conn.get_option("autofree")?, OptionValue::Bool(true));
    conn.query("CREATE TABLE kv (k TEXT PRIMARY KEY, v TEXT)", &[])?;
    conn.query("INSERT INTO kv VALUES (?, ?)", &[text("a"), text("1")])?;
    drop(conn);

    let mut conn = SqliteOptions::new(path).build()?;
    assert_eq!(conn.get_one("SELECT v FROM kv WHERE k = 'a'", &[])?, Some(text("1")));
    Ok(())
}

#[test]
fn unopenable_path_is_connect_failed() {
    let err = SqliteOptionsBuilder::new("/no/such/dir/at/all/x.db".into())
        .finish()
        .build()
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConnectFailed);
    assert!(err.native().is_some());
}
