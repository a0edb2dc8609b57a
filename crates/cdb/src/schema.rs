//! The schema of a cinema table.
//!
//! Every column is text.  What differs between columns is their role: a parameter is a dimension of the sweep, and an
//! extract is a value (usually a relative path) produced for one combination of parameter values.  Roles are not
//! stored on disk; everything starts life as a parameter and callers move columns to the extract role afterward.
//!
//! Three orders are tracked:
//!
//! - The physical column order, which is the order columns were created and the order the CSV is written in.
//! - The parameter order, which is the order segments appear in an extract path.
//! - The extract order, which is the order the extract query projects in and follows reclassification calls.
use crate::error::{Error, Result};

/// Name of the hidden column carrying row identity.
///
/// This never shows up in the CSV and user columns may not take it.
pub(crate) const ROW_ID_COLUMN: &str = "__cinema_row_id";

/// The role a column plays.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColumnRole {
    Parameter,
    Extract,
}

/// A column in the table.
#[derive(Clone, Debug)]
pub struct ColumnDescriptor {
    name: String,
    role: ColumnRole,
}

impl ColumnDescriptor {
    fn new(name: String) -> Self {
        ColumnDescriptor {
            name,
            role: ColumnRole::Parameter,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_role(&self) -> ColumnRole {
        self.role
    }
}

/// What [Schema::ensure_column] had to do.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum SchemaChange {
    /// The column was already known.
    Unchanged,
    /// This was the first column, so the table has to be created.
    Created,
    /// The table exists and has to grow by a column.
    Added,
}

#[derive(Clone, Debug, Default)]
pub struct Schema {
    columns: Vec<ColumnDescriptor>,
    parameters: Vec<String>,
    extracts: Vec<String>,
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.eq_ignore_ascii_case(ROW_ID_COLUMN) {
        return Err(Error::InvalidColumnName(name.to_string()));
    }
    Ok(())
}

impl Schema {
    /// Build a schema where every column is a parameter, in the given order.
    pub(crate) fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Schema> {
        let mut schema = Schema::default();
        for n in names {
            if schema.contains(n) {
                return Err(Error::DuplicateColumn(n.to_string()));
            }
            schema.ensure_column(n)?;
        }
        Ok(schema)
    }

    /// Work out what [Schema::ensure_column] would do, without doing it.
    ///
    /// Sqlite compares column names case-insensitively, so a new name differing from an existing one only by ASCII
    /// case is a duplicate.
    pub(crate) fn column_change(&self, name: &str) -> Result<SchemaChange> {
        if self.contains(name) {
            return Ok(SchemaChange::Unchanged);
        }
        check_name(name)?;
        if self
            .columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
        {
            return Err(Error::DuplicateColumn(name.to_string()));
        }

        if self.columns.is_empty() {
            Ok(SchemaChange::Created)
        } else {
            Ok(SchemaChange::Added)
        }
    }

    /// Make sure a column exists, adding it as a parameter if it doesn't.
    ///
    /// Existing columns keep whatever role they have.
    pub(crate) fn ensure_column(&mut self, name: &str) -> Result<SchemaChange> {
        let change = self.column_change(name)?;
        if change != SchemaChange::Unchanged {
            self.columns.push(ColumnDescriptor::new(name.to_string()));
            self.parameters.push(name.to_string());
        }
        Ok(change)
    }

    /// Move the named columns from the parameter role to the extract role, in the order given.
    ///
    /// Either every name moves or, if any of them isn't currently a parameter, none do.
    pub(crate) fn set_extracts(&mut self, names: &[&str]) -> Result<()> {
        for (i, n) in names.iter().enumerate() {
            // A name given twice would be a parameter at validation time but not by the time we got to it.
            if !self.is_parameter(n) || names[..i].contains(n) {
                return Err(Error::UnknownParameter(n.to_string()));
            }
        }

        for n in names {
            self.parameters.retain(|p| p != n);
            self.extracts.push(n.to_string());
            if let Some(c) = self.columns.iter_mut().find(|c| c.name == *n) {
                c.role = ColumnRole::Extract;
            }
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p == name)
    }

    pub fn is_extract(&self, name: &str) -> bool {
        self.extracts.iter().any(|e| e == name)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in physical order.
    pub fn iter_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    /// Parameters in path order.
    pub fn iter_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|x| x.as_str())
    }

    /// Extracts in projection order.
    pub fn iter_extracts(&self) -> impl Iterator<Item = &str> {
        self.extracts.iter().map(|x| x.as_str())
    }
}
