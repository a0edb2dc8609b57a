//! The cinema database wraps an in-memory rusqlite connection mirroring `data.csv`.
//!
//! Nothing touches disk except [CinemaDatabase::initialize], [CinemaDatabase::load] and [CinemaDatabase::persist].
//! Entries are added and removed against the in-memory table, and the schema grows as entries name new columns.
use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use log::*;

use crate::config::CinemaConfig;
use crate::csv_io;
use crate::error::{Error, Result};
use crate::extract_path::ExtractQuery;
use crate::schema::{Schema, SchemaChange};
use crate::statements::Statements;

/// Identity of a row.
///
/// Ids are handed out in insertion order and never reused, so deleting a row leaves every other id valid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RowId(i64);

impl RowId {
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> RowId {
        RowId(value)
    }
}

pub struct CinemaDatabase {
    config: CinemaConfig,
    conn: rusqlite::Connection,
    statements: Statements,
    schema: Schema,

    /// Resolved extracts from [CinemaDatabase::get_extracts], keyed by extract path.
    ///
    /// Cleared whenever rows or roles change.
    extracts: HashMap<String, Vec<Utf8PathBuf>>,
}

fn collect_parameters<K, V>(parameters: impl IntoIterator<Item = (K, V)>) -> HashMap<String, String>
where
    K: AsRef<str>,
    V: ToString,
{
    parameters
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.to_string()))
        .collect()
}

impl CinemaDatabase {
    /// A database rooted at `root`, with the default layout.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        CinemaDatabase::with_config(CinemaConfig::new(root))
    }

    pub fn with_config(config: CinemaConfig) -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Ok(CinemaDatabase {
            statements: Statements::new(config.get_table()),
            config,
            conn,
            schema: Default::default(),
            extracts: Default::default(),
        })
    }

    pub fn get_config(&self) -> &CinemaConfig {
        &self.config
    }

    pub fn get_root(&self) -> &Utf8Path {
        self.config.get_root()
    }

    pub fn get_data_path(&self) -> Utf8PathBuf {
        self.config.get_data_path()
    }

    pub fn get_schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the table has been created, which happens with the first column.
    pub fn is_initialized(&self) -> bool {
        !self.schema.is_empty()
    }

    /// Whether both the root directory and the CSV file exist.
    pub fn exists(&self) -> bool {
        self.get_root().exists() && self.get_data_path().exists()
    }

    /// Create the root directory for a brand new database.
    ///
    /// It is an error for the directory to exist already.
    pub fn initialize(&self) -> Result<()> {
        let root = self.get_root();
        if root.exists() {
            return Err(Error::AlreadyExists(root.to_owned()));
        }

        std::fs::create_dir_all(root).map_err(|source| Error::Initialization {
            path: root.to_owned(),
            source,
        })?;
        info!("Initialized cinema database at {}", root);
        Ok(())
    }

    /// Replace the in-memory table with the contents of the CSV file.
    ///
    /// Every column comes back as a parameter; callers reassign extracts with
    /// [CinemaDatabase::set_extract_parameter_names].
    pub fn load(&mut self) -> Result<()> {
        let data_path = self.get_data_path();
        if !self.exists() {
            return Err(Error::NotFound {
                root: self.get_root().to_owned(),
                data_file: data_path,
            });
        }

        let table = csv_io::read_table(&data_path)?;
        let schema = Schema::from_names(table.header.iter().map(|x| x.as_str()))?;
        let names = schema
            .iter_columns()
            .map(|c| c.get_name())
            .collect::<Vec<_>>();

        let drop_sql = self.statements.drop_table()?;
        let create_sql = self.statements.create(names.iter().copied())?;
        let insert_sql = self.statements.insert(names.iter().copied())?;

        let transaction = self.conn.transaction()?;
        transaction.execute(&drop_sql, [])?;
        if !schema.is_empty() {
            transaction.execute(&create_sql, [])?;
            let mut statement = transaction.prepare(&insert_sql)?;
            for row in table.rows.iter() {
                statement.execute(rusqlite::params_from_iter(row.iter()))?;
            }
        }
        transaction.commit()?;

        info!(
            "Loaded {} rows with columns [{}] from {}",
            table.rows.len(),
            names.iter().join(", "),
            data_path
        );
        self.schema = schema;
        self.extracts.clear();
        Ok(())
    }

    pub fn parameter_exists(&self, name: &str) -> bool {
        self.schema.is_parameter(name)
    }

    pub fn extract_exists(&self, name: &str) -> bool {
        self.schema.is_extract(name)
    }

    /// Move columns from the parameter role to the extract role.
    ///
    /// Every name must currently be a parameter.  If one isn't, nothing moves.
    pub fn set_extract_parameter_names(&mut self, names: &[&str]) -> Result<()> {
        self.schema.set_extracts(names)?;
        self.extracts.clear();
        Ok(())
    }

    pub fn iter_parameter_names(&self) -> impl Iterator<Item = &str> {
        self.schema.iter_parameters()
    }

    pub fn iter_extract_names(&self) -> impl Iterator<Item = &str> {
        self.schema.iter_extracts()
    }

    /// All columns, in the order they are written to the CSV.
    pub fn iter_column_names(&self) -> impl Iterator<Item = &str> {
        self.schema.iter_columns().map(|c| c.get_name())
    }

    /// Add a column as a parameter if it doesn't exist, creating the table if this is the first one.
    fn ensure_column(&mut self, name: &str) -> Result<()> {
        let sql = match self.schema.column_change(name)? {
            SchemaChange::Unchanged => return Ok(()),
            SchemaChange::Created => self.statements.create([name])?,
            SchemaChange::Added => self.statements.alter_add(name)?,
        };
        self.conn.execute(&sql, [])?;
        self.schema.ensure_column(name)?;
        debug!("Added column {}", name);
        Ok(())
    }

    /// Insert a row, growing the schema to fit any fields it hasn't seen yet.
    ///
    /// Columns missing from `fields` are left empty.
    pub fn add_entry<K, V>(&mut self, fields: impl IntoIterator<Item = (K, V)>) -> Result<RowId>
    where
        K: AsRef<str>,
        V: ToString,
    {
        let mut columns: Vec<String> = vec![];
        let mut values: Vec<String> = vec![];
        for (k, v) in fields {
            let k = k.as_ref();
            if columns.iter().any(|c| c == k) {
                return Err(Error::DuplicateColumn(k.to_string()));
            }
            columns.push(k.to_string());
            values.push(v.to_string());
        }

        if columns.is_empty() && self.schema.is_empty() {
            return Err(Error::EmptySchema);
        }

        // Reconcile the whole schema first, so a bad name fails before anything is altered.
        let mut planned = self.schema.clone();
        for c in columns.iter() {
            planned.ensure_column(c)?;
        }
        for c in columns.iter() {
            self.ensure_column(c)?;
        }

        let insert_sql = self.statements.insert(columns.iter().map(|x| x.as_str()))?;
        self.conn
            .prepare_cached(&insert_sql)?
            .execute(rusqlite::params_from_iter(values.iter()))?;
        let id = RowId(self.conn.last_insert_rowid());

        self.extracts.clear();
        Ok(id)
    }

    /// Delete a row.  Deleting an id which doesn't exist does nothing.
    pub fn delete_entry(&mut self, id: RowId) -> Result<()> {
        if self.schema.is_empty() {
            return Ok(());
        }

        let delete_sql = self.statements.delete()?;
        let deleted = self
            .conn
            .prepare_cached(&delete_sql)?
            .execute([id.get()])?;
        debug!("Deleting row {}: {} rows affected", id.get(), deleted);

        self.extracts.clear();
        Ok(())
    }

    /// The extract path for a set of parameter values, e.g. `/0/90` for a `/phi/theta` database.
    pub fn extract_path<K, V>(&self, parameters: impl IntoIterator<Item = (K, V)>) -> String
    where
        K: AsRef<str>,
        V: ToString,
    {
        let parameters = collect_parameters(parameters);
        ExtractQuery::new(&self.schema, &parameters, self.config.get_unbound_marker()).path
    }

    /// Get the extracts matching some parameter values, resolved against the root directory.
    ///
    /// Parameters which aren't given match anything.  The result holds every extract column of every matching row, row
    /// by row in insertion order.
    pub fn get_extracts<K, V>(
        &mut self,
        parameters: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Vec<Utf8PathBuf>>
    where
        K: AsRef<str>,
        V: ToString,
    {
        let parameters = collect_parameters(parameters);
        let query = ExtractQuery::new(&self.schema, &parameters, self.config.get_unbound_marker());

        let extract_count = self.schema.iter_extracts().count();
        if self.schema.is_empty() || extract_count == 0 {
            return Ok(vec![]);
        }

        let select_sql = self.statements.select(
            self.schema.iter_extracts(),
            query.filters.iter().map(|x| x.as_str()),
        )?;
        let root = self.config.get_root();
        let mut resolved = vec![];
        {
            let mut statement = self.conn.prepare_cached(&select_sql)?;
            let mut rows = statement.query(rusqlite::params_from_iter(query.values.iter()))?;
            while let Some(r) = rows.next()? {
                // Column 0 is the row id.
                for i in 1..=extract_count {
                    let value: String = r.get(i)?;
                    resolved.push(root.join(value));
                }
            }
        }

        debug!("{} resolved to {} extracts", query.path, resolved.len());
        self.extracts.insert(query.path, resolved.clone());
        Ok(resolved)
    }

    /// Extracts previously resolved for an extract path, if nothing has changed since.
    pub fn cached_extracts(&self, extract_path: &str) -> Option<&[Utf8PathBuf]> {
        self.extracts.get(extract_path).map(|x| &x[..])
    }

    pub fn row_count(&self) -> Result<usize> {
        if self.schema.is_empty() {
            return Ok(0);
        }

        let count_sql = self.statements.count()?;
        let count: i64 = self.conn.query_row(&count_sql, [], |r| r.get(0))?;
        Ok(count as usize)
    }

    /// Every row, in id order, with values in [CinemaDatabase::iter_column_names] order.
    pub fn rows(&self) -> Result<Vec<(RowId, Vec<String>)>> {
        if self.schema.is_empty() {
            return Ok(vec![]);
        }

        let column_count = self.schema.iter_columns().count();
        let select_sql = self
            .statements
            .select(self.iter_column_names(), std::iter::empty())?;
        let mut statement = self.conn.prepare_cached(&select_sql)?;
        let mut rows = statement.query([])?;

        let mut ret = vec![];
        while let Some(r) = rows.next()? {
            let id = RowId(r.get(0)?);
            let values = (1..=column_count)
                .map(|i| r.get(i))
                .collect::<rusqlite::Result<Vec<String>>>()?;
            ret.push((id, values));
        }
        Ok(ret)
    }

    /// Write the whole table to the CSV file, replacing it.
    pub fn persist(&self) -> Result<()> {
        let data_path = self.get_data_path();
        let header = self.iter_column_names().collect::<Vec<_>>();
        let rows = self.rows()?;
        let row_count = rows.len();

        csv_io::write_table(&data_path, &header, rows.into_iter().map(|(_, values)| values))?;
        info!("Wrote {} rows to {}", row_count, data_path);
        Ok(())
    }
}
