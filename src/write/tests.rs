//! Tests for the writing path, including write/read round trips.

use std::collections::HashMap;

use proptest::prelude::*;

use super::*;
use crate::common::Error;
use crate::dialect::{Dialect, Quoting};
use crate::read::reader;

fn write_one(dialect: Dialect, row: Vec<Value>) -> Result<String, Error> {
    let mut out = Vec::new();
    {
        let mut w = Writer::with_dialect(&mut out, dialect)?;
        w.write_row(row)?;
    }
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_plain_row() {
    let mut out = Vec::new();
    let mut w = writer(&mut out);
    w.write_row(["name", "age", "city"]).unwrap();
    w.write_row(["Alice", "28", "Seattle"]).unwrap();
    drop(w);
    assert_eq!(out, b"name,age,city\r\nAlice,28,Seattle\r\n");
}

#[test]
fn test_minimal_quotes_delimiter_and_quotechar() {
    let line = write_one(Dialect::excel(), vec![Value::from("a,b"), Value::from("c")]).unwrap();
    assert_eq!(line, "\"a,b\",c\r\n");

    let line = write_one(Dialect::excel(), vec![Value::from("say \"hi\"")]).unwrap();
    assert_eq!(line, "\"say \"\"hi\"\"\"\r\n");
}

#[test]
fn test_minimal_quotes_embedded_newline() {
    let line = write_one(Dialect::excel(), vec![Value::from("line1\nline2")]).unwrap();
    assert_eq!(line, "\"line1\nline2\"\r\n");
}

#[test]
fn test_minimal_leaves_plain_fields_bare() {
    let line = write_one(Dialect::excel(), vec![Value::from("plain")]).unwrap();
    assert_eq!(line, "plain\r\n");
}

#[test]
fn test_quote_all() {
    let dialect = Dialect::excel().with_quoting(Quoting::All);
    let line = write_one(dialect, vec![Value::from("a"), Value::Int(1)]).unwrap();
    assert_eq!(line, "\"a\",\"1\"\r\n");
}

#[test]
fn test_quote_nonnumeric_keeps_numbers_bare() {
    let dialect = Dialect::excel().with_quoting(Quoting::NonNumeric);
    let line = write_one(
        dialect,
        vec![Value::from("label"), Value::Int(30), Value::Float(2.5)],
    )
    .unwrap();
    assert_eq!(line, "\"label\",30,2.5\r\n");
}

#[test]
fn test_quote_none_escapes_specials() {
    let dialect = Dialect::excel()
        .with_quoting(Quoting::None)
        .with_escapechar(Some(b'\\'));
    let line = write_one(dialect, vec![Value::from("a,b"), Value::from("c\"d")]).unwrap();
    assert_eq!(line, "a\\,b,c\\\"d\r\n");
}

#[test]
fn test_quote_none_without_escapechar_fails() {
    let dialect = Dialect::excel().with_quoting(Quoting::None);
    let mut out = Vec::new();
    let mut w = Writer::with_dialect(&mut out, dialect).unwrap();
    let err = w.write_row(["a,b"]).unwrap_err();
    assert!(matches!(err, Error::UnquotableField(_)));
    drop(w);
    // The failed row wrote nothing
    assert!(out.is_empty());
}

#[test]
fn test_single_empty_field_is_quoted() {
    let line = write_one(Dialect::excel(), vec![Value::from("")]).unwrap();
    assert_eq!(line, "\"\"\r\n");

    // Two empty fields need no quoting to survive a round trip
    let line = write_one(Dialect::excel(), vec![Value::from(""), Value::from("")]).unwrap();
    assert_eq!(line, ",\r\n");
}

#[test]
fn test_single_empty_field_unquotable_under_quote_none() {
    let dialect = Dialect::excel().with_quoting(Quoting::None);
    let mut w = Writer::with_dialect(Vec::new(), dialect).unwrap();
    assert!(matches!(
        w.write_row([""]),
        Err(Error::UnquotableField(_))
    ));
}

#[test]
fn test_skipinitialspace_forces_quotes_on_edge_spaces() {
    let dialect = Dialect::excel().with_skipinitialspace(true);
    let line = write_one(dialect, vec![Value::from(" padded"), Value::from("x ")]).unwrap();
    assert_eq!(line, "\" padded\",\"x \"\r\n");
}

#[test]
fn test_escapechar_replaces_doubling_inside_quotes() {
    let dialect = Dialect::excel()
        .with_doublequote(false)
        .with_escapechar(Some(b'\\'));
    let line = write_one(dialect, vec![Value::from("a\"b")]).unwrap();
    assert_eq!(line, "\"a\\\"b\"\r\n");
}

#[test]
fn test_quote_without_doubling_or_escape_fails() {
    let dialect = Dialect::excel().with_doublequote(false);
    let mut w = Writer::with_dialect(Vec::new(), dialect).unwrap();
    assert!(matches!(
        w.write_row(["a\"b"]),
        Err(Error::UnquotableField(_))
    ));
}

#[test]
fn test_unix_dialect_terminator() {
    let line = write_one(Dialect::unix(), vec![Value::from("a"), Value::from("b")]).unwrap();
    assert_eq!(line, "\"a\",\"b\"\n");
}

#[test]
fn test_write_rows() {
    let mut out = Vec::new();
    let mut w = writer(&mut out);
    w.write_rows([["a", "b"], ["c", "d"]]).unwrap();
    drop(w);
    assert_eq!(out, b"a,b\r\nc,d\r\n");
}

#[test]
fn test_invalid_dialect_rejected_before_rows() {
    let bad = Dialect::excel().with_quotechar(Some(b','));
    assert!(matches!(
        Writer::with_dialect(Vec::new(), bad),
        Err(Error::Dialect(_))
    ));
}

#[test]
fn test_dict_writer_header_and_rows() {
    let mut out = Vec::new();
    let mut w = DictWriter::new(&mut out, ["name", "age"]);
    w.write_header().unwrap();
    let row = HashMap::from([
        ("name".to_string(), Value::from("Bob")),
        ("age".to_string(), Value::from(35)),
    ]);
    w.write_row(&row).unwrap();
    drop(w);
    assert_eq!(out, b"name,age\r\nBob,35\r\n");
}

#[test]
fn test_dict_writer_restval_for_missing_keys() {
    let mut out = Vec::new();
    let mut w = DictWriter::new(&mut out, ["a", "b"]).with_restval("?");
    let row = HashMap::from([("a".to_string(), Value::from("1"))]);
    w.write_row(&row).unwrap();
    drop(w);
    assert_eq!(out, b"1,?\r\n");
}

#[test]
fn test_dict_writer_extras_raise() {
    let mut w = DictWriter::new(Vec::new(), ["a"]);
    let row = HashMap::from([
        ("a".to_string(), Value::from("1")),
        ("stray".to_string(), Value::from("2")),
    ]);
    match w.write_row(&row) {
        Err(Error::ExtraFields(keys)) => assert_eq!(keys, vec!["stray"]),
        other => panic!("expected ExtraFields, got {other:?}"),
    }
}

#[test]
fn test_dict_writer_extras_ignore() {
    let mut out = Vec::new();
    let mut w = DictWriter::new(&mut out, ["a"]).with_extras_action(ExtrasAction::Ignore);
    let row = HashMap::from([
        ("a".to_string(), Value::from("1")),
        ("stray".to_string(), Value::from("2")),
    ]);
    w.write_row(&row).unwrap();
    drop(w);
    assert_eq!(out, b"1\r\n");
}

fn roundtrip(dialect: Dialect, row: &[String]) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    {
        let mut w = Writer::with_dialect(&mut out, dialect.clone()).unwrap();
        w.write_row(row.iter()).unwrap();
    }
    crate::read::Reader::with_dialect(out.as_slice(), dialect)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_plain_fields_round_trip(
        row in proptest::collection::vec("[a-zA-Z0-9_ .;:-]{0,16}", 1..6)
    ) {
        let rows = roundtrip(Dialect::excel(), &row);
        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0], &row);
    }

    #[test]
    fn prop_special_fields_round_trip(
        value in "[a-zA-Z0-9,\" \n]{0,24}"
    ) {
        let row = vec![value];
        let rows = roundtrip(Dialect::excel(), &row);
        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0], &row);
    }

    #[test]
    fn prop_round_trip_under_unix_dialect(
        row in proptest::collection::vec("[a-zA-Z0-9,\"]{0,12}", 1..5)
    ) {
        let rows = roundtrip(Dialect::unix(), &row);
        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0], &row);
    }
}

#[test]
fn test_reader_example_matches_writer_output() {
    let mut out = Vec::new();
    let mut w = writer(&mut out);
    w.write_row(["x", "a\"b", "c,d"]).unwrap();
    drop(w);
    let rows: Vec<_> = reader(out.as_slice()).collect::<Result<_, _>>().unwrap();
    assert_eq!(rows, vec![vec!["x", "a\"b", "c,d"]]);
}
