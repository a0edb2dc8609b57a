//! Configuration for a [crate::CinemaDatabase].
//!
//! The only thing a caller must supply is the root directory.  Everything else has a default matching the on-disk
//! layout other cinema tools expect.
use camino::{Utf8Path, Utf8PathBuf};

#[derive(Clone, Debug, derive_builder::Builder)]
pub struct CinemaConfig {
    /// Directory holding the database.
    #[builder(setter(into))]
    root: Utf8PathBuf,

    /// Name of the CSV file under the root.
    #[builder(setter(into), default = "\"data.csv\".into()")]
    data_file: String,

    /// Name of the in-memory table mirroring the CSV.
    #[builder(setter(into), default = "\"CINEMA\".into()")]
    table: String,

    /// Path segment standing in for a parameter the caller didn't supply.
    #[builder(setter(into), default = "\"*\".into()")]
    unbound_marker: String,
}

impl CinemaConfig {
    /// A config with every default, rooted at `root`.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        CinemaConfig {
            root: root.into(),
            data_file: "data.csv".into(),
            table: "CINEMA".into(),
            unbound_marker: "*".into(),
        }
    }

    pub fn get_root(&self) -> &Utf8Path {
        &self.root
    }

    /// Full path to the CSV file.
    pub fn get_data_path(&self) -> Utf8PathBuf {
        self.root.join(&self.data_file)
    }

    pub fn get_table(&self) -> &str {
        &self.table
    }

    pub fn get_unbound_marker(&self) -> &str {
        &self.unbound_marker
    }
}
