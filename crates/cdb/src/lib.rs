//! The cinema database crate.
//!
//! A cinema database is a directory holding one `data.csv`.  Each row binds values for some *parameters* (the
//! dimensions of a sweep, such as camera angles or time steps) to some *extracts* (usually relative paths to the images
//! or other artifacts produced for that combination).  The CSV doesn't say which columns are which: callers load it
//! and then name the extract columns.
//!
//! The table lives in an in-memory sqlite database while it's being worked on.  Entries may introduce new columns at
//! any time and the schema grows to fit.  Nothing is written back until [CinemaDatabase::persist].
//!
//! Looking up extracts goes through an *extract path*, one `/`-separated segment per parameter, e.g. `/0/90` for a
//! database with parameters `phi` and `theta`.  Parameters left out of a lookup match anything.
mod config;
mod csv_io;
mod database;
mod error;
mod extract_path;
mod factory;
mod schema;
mod statements;

pub use config::*;
pub use database::*;
pub use error::*;
pub use factory::*;
pub use schema::{ColumnDescriptor, ColumnRole, Schema};
