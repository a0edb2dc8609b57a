use camino::Utf8PathBuf;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("No cinema database at {root}: expected the directory and {data_file} to exist")]
    NotFound {
        root: Utf8PathBuf,
        data_file: Utf8PathBuf,
    },

    #[error("Can't initialize cinema database at {0}: the directory already exists")]
    AlreadyExists(Utf8PathBuf),

    #[error("Can't create cinema database directory {path}: {source}")]
    Initialization {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a parameter of this database")]
    UnknownParameter(String),

    #[error("Column {0} was specified more than once")]
    DuplicateColumn(String),

    #[error("Invalid column name {0:?}")]
    InvalidColumnName(String),

    #[error("Can't insert an entry with no fields before any column exists")]
    EmptySchema,

    #[error("Unsupported database kind: {0}")]
    UnsupportedKind(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::config::CinemaConfigBuilderError),

    #[error("Sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
