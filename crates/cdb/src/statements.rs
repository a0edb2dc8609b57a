//! SQL for the cinema table.
//!
//! Column names come from CSV headers and callers, so every identifier is quoted.  Values never appear in statement
//! text: inserts, deletes and filters all use positional parameters, which the caller binds in the same order as the
//! columns passed here.
use log::*;

use crate::error::Result;
use crate::schema::ROW_ID_COLUMN;

/// Quote an identifier for sqlite, doubling any embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

const CREATE_TEMPLATE: &str = r#"
CREATE TABLE {{ table }} (
    {{ row_id }} INTEGER PRIMARY KEY AUTOINCREMENT
    {%- for c in columns -%}
    , {{ c }} TEXT NOT NULL DEFAULT ''
    {%- endfor %}
)
"#;

const ALTER_TEMPLATE: &str = r#"
ALTER TABLE {{ table }} ADD COLUMN {{ column }} TEXT NOT NULL DEFAULT ''
"#;

const INSERT_TEMPLATE: &str = r#"
INSERT INTO {{ table }}
{%- if columns %}(
    {{ columns | join(sep=", ") }}
) VALUES (
    {%- for c in columns -%}
    ?{{ loop.index }}{% if not loop.last %}, {% endif -%}
    {%- endfor -%}
)
{%- else %} DEFAULT VALUES
{%- endif %}
"#;

const DELETE_TEMPLATE: &str = r#"
DELETE FROM {{ table }} WHERE {{ row_id }} = ?1
"#;

const SELECT_TEMPLATE: &str = r#"
SELECT {{ row_id }}{% for c in columns %}, {{ c }}{% endfor %}
FROM {{ table }}
{%- if filters %}
WHERE {% for f in filters %}{{ f }} = ?{{ loop.index }}{% if not loop.last %} AND {% endif %}{% endfor %}
{%- endif %}
ORDER BY {{ row_id }}
"#;

const COUNT_TEMPLATE: &str = r#"
SELECT COUNT(*) FROM {{ table }}
"#;

const DROP_TEMPLATE: &str = r#"
DROP TABLE IF EXISTS {{ table }}
"#;

/// Renders statements against one table.
#[derive(Debug)]
pub(crate) struct Statements {
    table: String,
    row_id: String,
}

fn quote_all<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    names.into_iter().map(quote_ident).collect()
}

impl Statements {
    pub(crate) fn new(table: &str) -> Self {
        Statements {
            table: quote_ident(table),
            row_id: quote_ident(ROW_ID_COLUMN),
        }
    }

    fn context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("table", &self.table);
        context.insert("row_id", &self.row_id);
        context
    }

    fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        let stmt = tera::Tera::one_off(template, context, false)?;
        let stmt = stmt.trim().to_string();
        debug!("Rendered statement for {}: {}", self.table, stmt);
        Ok(stmt)
    }

    /// Create the table with the given columns.
    pub(crate) fn create<'a>(&self, columns: impl IntoIterator<Item = &'a str>) -> Result<String> {
        let mut context = self.context();
        context.insert("columns", &quote_all(columns));
        self.render(CREATE_TEMPLATE, &context)
    }

    /// Add one column to an existing table.
    pub(crate) fn alter_add(&self, column: &str) -> Result<String> {
        let mut context = self.context();
        context.insert("column", &quote_ident(column));
        self.render(ALTER_TEMPLATE, &context)
    }

    /// Insert one row, binding `?1..?n` to the columns in order.
    pub(crate) fn insert<'a>(&self, columns: impl IntoIterator<Item = &'a str>) -> Result<String> {
        let mut context = self.context();
        context.insert("columns", &quote_all(columns));
        self.render(INSERT_TEMPLATE, &context)
    }

    /// Delete by row id, bound to `?1`.
    pub(crate) fn delete(&self) -> Result<String> {
        self.render(DELETE_TEMPLATE, &self.context())
    }

    /// Select the row id followed by `columns`, keeping rows where every filter column equals its bound parameter.
    ///
    /// Rows come back in row id order.
    pub(crate) fn select<'a, 'b>(
        &self,
        columns: impl IntoIterator<Item = &'a str>,
        filters: impl IntoIterator<Item = &'b str>,
    ) -> Result<String> {
        let mut context = self.context();
        context.insert("columns", &quote_all(columns));
        context.insert("filters", &quote_all(filters));
        self.render(SELECT_TEMPLATE, &context)
    }

    pub(crate) fn count(&self) -> Result<String> {
        self.render(COUNT_TEMPLATE, &self.context())
    }

    pub(crate) fn drop_table(&self) -> Result<String> {
        self.render(DROP_TEMPLATE, &self.context())
    }
}
