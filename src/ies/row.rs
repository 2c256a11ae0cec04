/*
 * Created on Wed Mar 10 2021
 *
 * Copyright (c) storycraft. Licensed under the Apache Licence 2.0.
 */

use std::collections::HashMap;

use super::{IesError, IesErrorKind};

/// One typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum IesValue {

    Number(f32),
    Text(String)

}

impl IesValue {

    /// Numeric value. A text cell is a type error, never a coercion.
    pub fn as_number(&self) -> Result<f32, IesError> {
        match self {
            IesValue::Number(value) => Ok(*value),
            IesValue::Text(_) => Err(IesError::new(IesErrorKind::TypeMismatch, None))
        }
    }

    /// Text value.
    pub fn as_text(&self) -> Result<&str, IesError> {
        match self {
            IesValue::Text(value) => Ok(value),
            IesValue::Number(_) => Err(IesError::new(IesErrorKind::TypeMismatch, None))
        }
    }

}

/// One table row keyed by class id. Cell values are looked up by column
/// name; a column missing from the map serializes as zero / empty.
#[derive(Debug, Clone, Default)]
pub struct IesRow {

    class_id: i32,
    class_name: String,

    values: HashMap<String, IesValue>,
    use_scr: HashMap<String, bool>

}

impl IesRow {

    pub fn new(class_id: i32, class_name: String) -> Self {
        Self {
            class_id,
            class_name,
            values: HashMap::new(),
            use_scr: HashMap::new()
        }
    }

    pub fn class_id(&self) -> i32 {
        self.class_id
    }

    pub fn set_class_id(&mut self, class_id: i32) {
        self.class_id = class_id;
    }

    pub fn class_name(&self) -> &String {
        &self.class_name
    }

    pub fn set_class_name(&mut self, class_name: String) {
        self.class_name = class_name;
    }

    pub fn values(&self) -> &HashMap<String, IesValue> {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&IesValue> {
        self.values.get(column)
    }

    pub fn set(&mut self, column: &str, value: IesValue) {
        self.values.insert(column.to_string(), value);
    }

    /// Numeric cell accessor.
    pub fn number(&self, column: &str) -> Result<f32, IesError> {
        self.get(column)
            .ok_or_else(|| IesError::new(IesErrorKind::FieldNotFound, None))?
            .as_number()
    }

    /// Text cell accessor.
    pub fn text(&self, column: &str) -> Result<&str, IesError> {
        self.get(column)
            .ok_or_else(|| IesError::new(IesErrorKind::FieldNotFound, None))?
            .as_text()
    }

    /// Script flag of a string column. Defaults to false.
    pub fn use_scr(&self, column: &str) -> bool {
        self.use_scr.get(column).copied().unwrap_or(false)
    }

    pub fn set_use_scr(&mut self, column: &str, flag: bool) {
        self.use_scr.insert(column.to_string(), flag);
    }

}

#[cfg(test)]
mod tests {
    use crate::ies::IesErrorKind;

    use super::{IesRow, IesValue};

    #[test]
    fn typed_accessors() {
        let mut row = IesRow::new(10001, "sword".into());
        row.set("Level", IesValue::Number(15.0));
        row.set("Name", IesValue::Text("Sword".into()));

        assert_eq!(row.number("Level").unwrap(), 15.0);
        assert_eq!(row.text("Name").unwrap(), "Sword");
    }

    #[test]
    fn text_cell_is_not_a_number() {
        let mut row = IesRow::new(1, "a".into());
        row.set("Name", IesValue::Text("Sword".into()));

        let err = row.number("Name").unwrap_err();
        assert!(matches!(err.kind(), IesErrorKind::TypeMismatch));
    }

    #[test]
    fn missing_column() {
        let row = IesRow::new(1, "a".into());

        let err = row.number("Level").unwrap_err();
        assert!(matches!(err.kind(), IesErrorKind::FieldNotFound));
    }

    #[test]
    fn use_scr_defaults_false() {
        let mut row = IesRow::new(1, "a".into());
        assert!(!row.use_scr("Script"));

        row.set_use_scr("Script", true);
        assert!(row.use_scr("Script"));
    }
}
