/*
 * Created on Fri Mar 12 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use ipf::ies::{
    column::{ColumnType, IesColumn},
    file::{IesFile, IesHeader},
    row::{IesRow, IesValue},
    IesErrorKind
};

fn sample_file() -> IesFile {
    let mut file = IesFile::new(IesHeader::new("item_table".into()));

    file.add_column(IesColumn::new("N".into(), "N".into(), ColumnType::Float, 0));
    file.add_column(IesColumn::new("S".into(), "S".into(), ColumnType::String, 0));

    let mut first = IesRow::new(1, "a".into());
    first.set("N", IesValue::Number(1.5));
    first.set("S", IesValue::Text("foo".into()));
    file.add_row(first);

    let mut second = IesRow::new(2, "b".into());
    second.set("N", IesValue::Number(2.5));
    second.set("S", IesValue::Text("bar".into()));
    file.add_row(second);

    file
}

#[test]
fn roundtrip() {
    let blob = sample_file().to_bytes().unwrap();
    let parsed = IesFile::from_bytes(&blob).unwrap();

    assert_eq!(parsed.header().name(), "item_table");
    assert_eq!(parsed.header().row_count(), 2);
    assert_eq!(parsed.header().column_count(), 2);
    assert_eq!(parsed.header().number_column_count(), 1);
    assert_eq!(parsed.header().string_column_count(), 1);

    // Numeric column sorts ahead of the string column.
    assert_eq!(parsed.columns()[0].name(), "N");
    assert_eq!(parsed.columns()[0].column_type(), ColumnType::Float);
    assert_eq!(parsed.columns()[1].name(), "S");
    assert_eq!(parsed.columns()[1].column_type(), ColumnType::String);

    assert_eq!(parsed.rows().len(), 2);

    let first = &parsed.rows()[0];
    assert_eq!(first.class_id(), 1);
    assert_eq!(first.class_name(), "a");
    assert_eq!(first.number("N").unwrap(), 1.5);
    assert_eq!(first.text("S").unwrap(), "foo");

    let second = &parsed.rows()[1];
    assert_eq!(second.class_id(), 2);
    assert_eq!(second.class_name(), "b");
    assert_eq!(second.number("N").unwrap(), 2.5);
    assert_eq!(second.text("S").unwrap(), "bar");
}

#[test]
fn reparse_is_stable() {
    let blob = sample_file().to_bytes().unwrap();
    let once = IesFile::from_bytes(&blob).unwrap();

    let again = IesFile::from_bytes(&once.to_bytes().unwrap()).unwrap();

    assert_eq!(once.header().row_count(), again.header().row_count());
    assert_eq!(once.columns().len(), again.columns().len());
    for (left, right) in once.columns().iter().zip(again.columns().iter()) {
        assert_eq!(left.name(), right.name());
        assert_eq!(left.column_type(), right.column_type());
        assert_eq!(left.position(), right.position());
    }
    for (left, right) in once.rows().iter().zip(again.rows().iter()) {
        assert_eq!(left.class_id(), right.class_id());
        assert_eq!(left.class_name(), right.class_name());
        assert_eq!(left.values(), right.values());
    }
}

#[test]
fn duplicate_column_names_dedup_in_read_order() {
    let mut file = IesFile::new(IesHeader::new("dup".into()));
    file.add_column(IesColumn::new("x".into(), "x".into(), ColumnType::Float, 0));
    file.add_column(IesColumn::new("x".into(), "x".into(), ColumnType::Float, 1));
    file.add_column(IesColumn::new("x".into(), "x".into(), ColumnType::Float, 2));

    let parsed = IesFile::from_bytes(&file.to_bytes().unwrap()).unwrap();

    let names: Vec<&str> = parsed
        .columns()
        .iter()
        .map(|column| column.name().as_str())
        .collect();

    assert_eq!(names, ["x", "x_1", "x_2"]);
}

#[test]
fn use_scr_flag_is_written() {
    let mut file = IesFile::new(IesHeader::new("scr".into()));
    file.add_column(IesColumn::new("S".into(), "S".into(), ColumnType::String, 0));

    let mut row = IesRow::new(1, "a".into());
    row.set("S", IesValue::Text("call()".into()));
    row.set_use_scr("S", true);
    file.add_row(row);

    // The flag region closes the row region, which closes the file.
    let blob = file.to_bytes().unwrap();
    assert_eq!(blob.last(), Some(&1));

    let mut plain = IesFile::new(IesHeader::new("scr".into()));
    plain.add_column(IesColumn::new("S".into(), "S".into(), ColumnType::String, 0));
    plain.add_row(IesRow::new(1, "a".into()));

    let blob = plain.to_bytes().unwrap();
    assert_eq!(blob.last(), Some(&0));
}

#[test]
fn missing_cells_serialize_as_defaults() {
    let mut file = sample_file();
    file.add_row(IesRow::new(3, "c".into()));

    let parsed = IesFile::from_bytes(&file.to_bytes().unwrap()).unwrap();

    let third = &parsed.rows()[2];
    assert_eq!(third.number("N").unwrap(), 0.0);
    assert_eq!(third.text("S").unwrap(), "");
}

#[test]
fn wrong_value_type_fails_serialization() {
    let mut file = IesFile::new(IesHeader::new("bad".into()));
    file.add_column(IesColumn::new("N".into(), "N".into(), ColumnType::Float, 0));

    let mut row = IesRow::new(1, "a".into());
    row.set("N", IesValue::Text("not a number".into()));
    file.add_row(row);

    let err = file.to_bytes().unwrap_err();
    assert!(matches!(err.kind(), IesErrorKind::TypeMismatch));
}

#[test]
fn mismatched_counts_rejected() {
    let mut blob = sample_file().to_bytes().unwrap();

    // Bump number_column_count so the counts no longer add up.
    blob[150] += 1;

    let err = IesFile::from_bytes(&blob).unwrap_err();
    assert!(matches!(err.kind(), IesErrorKind::InvalidHeader));
}

#[test]
fn string2_counts_as_string() {
    let mut file = IesFile::new(IesHeader::new("mixed".into()));
    file.add_column(IesColumn::new("c1".into(), "c1".into(), ColumnType::String, 5));
    file.add_column(IesColumn::new("c2".into(), "c2".into(), ColumnType::String2, 3));
    file.add_column(IesColumn::new("c3".into(), "c3".into(), ColumnType::Float, 7));

    let parsed = IesFile::from_bytes(&file.to_bytes().unwrap()).unwrap();

    assert_eq!(parsed.header().number_column_count(), 1);
    assert_eq!(parsed.header().string_column_count(), 2);

    // Both string kinds order by position among themselves.
    let names: Vec<&str> = parsed
        .columns()
        .iter()
        .map(|column| column.name().as_str())
        .collect();
    assert_eq!(names, ["c3", "c2", "c1"]);
}
