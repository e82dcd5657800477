use std::io::Write;

use sql_portable::prelude::*;
use sql_portable::test_utils::{MockDriver, Scripted, create_result_set};
use tempfile::NamedTempFile;

fn mock_conn(driver: MockDriver) -> Connection<MockDriver> {
    Connection::new(driver)
}

#[test]
fn mixed_placeholders_bind_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "blob'data")?;
    let path = file.path().to_string_lossy().into_owned();

    let mut conn = mock_conn(MockDriver::new());
    let stmt = conn.prepare("INSERT INTO tbl (a,b,c) VALUES (?, !, &)");
    let outcome = conn.execute(stmt, &["it's".into(), "NOW()".into(), path.into()])?;

    assert!(outcome.is_ack());
    assert_eq!(
        conn.driver().executed(),
        ["INSERT INTO tbl (a,b,c) VALUES ('it''s', NOW(), 'blob''data')"]
    );
    assert!(conn.last_query_was_manip());
    assert_eq!(conn.last_parameters().len(), 3);
    assert!(conn.free_prepared(stmt, true));
    assert!(!conn.free_prepared(stmt, true));
    assert_eq!(conn.prepared_count(), 0);
    Ok(())
}

#[test]
fn value_count_mismatch_never_reaches_backend() {
    let mut conn = mock_conn(MockDriver::new());
    let stmt = conn.prepare("SELECT * FROM t WHERE a = ? AND b = ?");

    conn.query("SELECT 1", &[]).unwrap();
    let err = conn.execute(stmt, &[RowValues::Int(1)]).unwrap_err();
    assert!(err.is(ErrorCode::Mismatch));
    assert_eq!(conn.driver().executed(), ["SELECT 1"]);
    assert!(conn.last_query().starts_with("SELECT * FROM t WHERE a ="));
    assert!(conn.last_query().contains("AND b ="));
    assert_eq!(conn.last_parameters(), [RowValues::Int(1)]);

    conn.free_prepared(stmt, false);
    let err = conn
        .execute(stmt, &[RowValues::Int(1), RowValues::Int(2)])
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Invalid);
}

#[test]
fn missing_opaque_file_is_access_violation() {
    let mut conn = mock_conn(MockDriver::new());
    let err = conn
        .query("INSERT INTO t VALUES (&)", &["/definitely/not/here.bin".into()])
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AccessViolation);
    assert_eq!(conn.prepared_count(), 0);
    assert!(conn.driver().executed().is_empty());
}

#[test]
fn execute_multiple_stops_at_first_failure() {
    let driver = MockDriver::new()
        .with(Scripted::Manip)
        .with(Scripted::Fail(NativeError::new(3, "duplicate key")))
        .with(Scripted::Manip);
    let mut conn = mock_conn(driver);
    let stmt = conn.prepare("INSERT INTO t VALUES (?)");
    let rows = vec![
        vec![RowValues::Int(1)],
        vec![RowValues::Int(2)],
        vec![RowValues::Int(3)],
    ];

    let err = conn.execute_multiple(stmt, &rows).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Constraint);
    assert_eq!(conn.driver().executed().len(), 2);

    let info = err.user_info().unwrap();
    assert!(info.starts_with("INSERT INTO t VALUES (2)"), "{info}");
    assert!(info.contains("[nativecode=3 ** duplicate key]"), "{info}");
    assert!(info.contains("[last parameters: [Int(2)]]"), "{info}");
    assert_eq!(err.native().map(|n| n.code), Some(3));
}

#[test]
fn query_keeps_diagnostics_on_both_paths() -> Result<(), SqlPortableError> {
    let mut conn = mock_conn(MockDriver::new());
    conn.query("UPDATE t SET a = ?", &[RowValues::Int(5)])?;
    assert_eq!(conn.last_query(), "UPDATE t SET a = 5");
    assert_eq!(conn.last_parameters(), [RowValues::Int(5)]);
    assert_eq!(conn.prepared_count(), 0);

    conn.query("UPDATE t SET a = 6", &[])?;
    assert_eq!(conn.last_query(), "UPDATE t SET a = 6");
    assert!(conn.last_parameters().is_empty());
    Ok(())
}

#[test]
fn raise_error_formats_and_passes_through() -> Result<(), SqlPortableError> {
    let mut conn = mock_conn(MockDriver::new());
    conn.query("SELECT 1", &[])?;

    let err = conn.raise_error(ErrorCode::NotFound, None, None);
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.user_info(), Some("SELECT 1 [DB Error: not found]"));

    let err = conn.raise_error(
        ErrorCode::Syntax,
        Some(NativeError::new(1, "near FROM")),
        Some("custom"),
    );
    assert_eq!(err.user_info(), Some("custom [nativecode=1 ** near FROM]"));

    let prior = SqlPortableError::with_info(ErrorCode::Truncated, "kept");
    let again = conn.raise_error(prior, None, Some("ignored"));
    assert_eq!(again.code(), ErrorCode::Truncated);
    assert_eq!(again.user_info(), Some("kept"));
    Ok(())
}

#[test]
fn native_codes_map_with_fallback_and_overrides() -> Result<(), SqlPortableError> {
    let driver = MockDriver::new()
        .with(Scripted::Fail(NativeError::new(999, "odd")))
        .with(Scripted::Fail(NativeError::new(4, "exists")))
        .with(Scripted::Fail(NativeError::new(4, "exists")));
    let mut conn = mock_conn(driver);

    let err = conn.query("SELECT 1", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Error);

    let err = conn.query("SELECT 1", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);

    conn.set_option("portability", Portability::ERRORS)?;
    let err = conn.query("SELECT 1", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Constraint);

    assert_eq!(
        conn.error_code(&NativeError::new(2, "gone")),
        ErrorCode::NoSuchTable
    );
    Ok(())
}

#[test]
fn delete_count_rewrites_bare_deletes() -> Result<(), SqlPortableError> {
    let mut conn = mock_conn(MockDriver::new());
    conn.query("DELETE FROM users", &[])?;
    conn.set_option("portability", Portability::DELETE_COUNT)?;
    conn.query("DELETE FROM users", &[])?;
    conn.query("DELETE FROM users WHERE id = 1", &[])?;
    assert_eq!(
        conn.driver().executed(),
        [
            "DELETE FROM users",
            "DELETE FROM users WHERE 1=1",
            "DELETE FROM users WHERE id = 1"
        ]
    );
    Ok(())
}

#[test]
fn forced_manip_releases_returned_rows() -> Result<(), SqlPortableError> {
    let set = create_result_set(&["n"], vec![vec![RowValues::Int(1)]]);
    let driver = MockDriver::new().with(Scripted::Rows(set));
    let releases = driver.release_counter();
    let mut conn = mock_conn(driver);

    conn.next_query_is_manip(true);
    let outcome = conn.query("SELECT n FROM t", &[])?;
    assert!(outcome.is_ack());
    assert!(conn.last_query_was_manip());
    assert_eq!(releases.get(), 1);
    assert!(conn.driver().contexts()[0].is_manip);

    conn.query("SELECT n FROM t", &[])?;
    assert!(!conn.last_query_was_manip());
    Ok(())
}

#[test]
fn auto_execute_builds_insert_and_update() -> Result<(), SqlPortableError> {
    let mut conn = mock_conn(MockDriver::new());
    let fields = [("name", RowValues::from("ann")), ("age", RowValues::Int(30))];

    conn.auto_execute("people", &fields, AutoQueryMode::Insert, None)?;
    conn.auto_execute(
        "people",
        &[("age", RowValues::Int(31))],
        AutoQueryMode::Update,
        Some("name = 'ann'"),
    )?;
    assert_eq!(
        conn.driver().executed(),
        [
            "INSERT INTO people (name,age) VALUES ('ann',30)",
            "UPDATE people SET age = 31 WHERE name = 'ann'"
        ]
    );
    assert_eq!(conn.prepared_count(), 0);
    Ok(())
}

#[test]
fn unguarded_update_needs_opt_in() -> Result<(), SqlPortableError> {
    let mut conn = mock_conn(MockDriver::new());
    let fields = [("age", RowValues::Int(0))];

    let err = conn
        .auto_execute("people", &fields, AutoQueryMode::Update, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PossibleUnintendedConsequences);
    let err = conn
        .auto_execute("people", &fields, AutoQueryMode::Update, Some("  "))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PossibleUnintendedConsequences);
    assert!(conn.driver().executed().is_empty());

    conn.allow_unguarded_update(true);
    conn.auto_execute("people", &fields, AutoQueryMode::Update, None)?;
    assert_eq!(conn.driver().executed(), ["UPDATE people SET age = 0"]);

    let empty: [(&str, RowValues); 0] = [];
    let err = conn
        .auto_execute("people", &empty, AutoQueryMode::Insert, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NeedMoreData);
    Ok(())
}

#[test]
fn auto_prepare_registers_reusable_statement() -> Result<(), SqlPortableError> {
    let mut conn = mock_conn(MockDriver::new());
    let stmt = conn.auto_prepare("t", &["a", "b"], AutoQueryMode::Insert, None)?;
    conn.execute_multiple(
        stmt,
        &[
            [RowValues::Int(1), RowValues::Null],
            [RowValues::Int(2), RowValues::Bool(true)],
        ],
    )?;
    assert_eq!(
        conn.driver().executed(),
        [
            "INSERT INTO t (a,b) VALUES (1,NULL)",
            "INSERT INTO t (a,b) VALUES (2,1)"
        ]
    );
    assert_eq!(conn.prepared_count(), 1);
    Ok(())
}

#[test]
fn auto_query_mode_parsing() {
    assert_eq!(
        "insert".parse::<AutoQueryMode>().unwrap(),
        AutoQueryMode::Insert
    );
    assert_eq!(AutoQueryMode::try_from(2i32).unwrap(), AutoQueryMode::Update);
    assert_eq!(
        AutoQueryMode::try_from(7i32).unwrap_err().code(),
        ErrorCode::Syntax
    );
}

#[test]
fn limit_query_appends_limit_clause() -> Result<(), SqlPortableError> {
    let mut conn = mock_conn(MockDriver::new());
    conn.limit_query("SELECT * FROM t WHERE a = ?", 10, 5, &[RowValues::Int(1)])?;
    assert_eq!(
        conn.driver().executed(),
        ["SELECT * FROM t WHERE a = 1 LIMIT 5 OFFSET 10"]
    );
    Ok(())
}

#[test]
fn missing_capabilities_report_not_capable() {
    let mut conn = mock_conn(MockDriver::new());

    let err = conn.affected_rows().unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotCapable);
    let err = conn.next_id("orders", true).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotCapable);
    assert!(err.user_info().unwrap().starts_with("mock cannot do sequences"));
    assert_eq!(conn.begin().unwrap_err().code(), ErrorCode::NotCapable);
}
