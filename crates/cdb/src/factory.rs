//! Build databases from loose, string-keyed arguments, for callers that pick what to open at runtime.
use std::collections::HashMap;

use log::*;

use crate::database::CinemaDatabase;
use crate::error::{Error, Result};

/// The only kind this crate builds.
pub const CDB_KIND: &str = "cdb";

/// Build a database of the given kind.
///
/// For `"cdb"`, the root comes from the `"path"` argument; without one there is nothing to build and this returns
/// `None`.
pub fn new(kind: &str, args: &HashMap<String, String>) -> Result<Option<CinemaDatabase>> {
    if kind != CDB_KIND {
        error!("Unsupported database kind: {}", kind);
        return Err(Error::UnsupportedKind(kind.to_string()));
    }

    match args.get("path") {
        Some(path) => Ok(Some(CinemaDatabase::new(path.as_str())?)),
        None => {
            warn!("Asked for a {} without a path", CDB_KIND);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn builds_cdb_from_path() {
        let db = new("cdb", &args(&[("path", "some/where.cdb")]))
            .unwrap()
            .expect("Should build a database");
        assert_eq!(db.get_root().as_str(), "some/where.cdb");
        assert_eq!(db.get_data_path().as_str(), "some/where.cdb/data.csv");
    }

    #[test]
    fn missing_path_builds_nothing() {
        assert!(new("cdb", &args(&[("root", "x")])).unwrap().is_none());
    }

    #[test]
    fn other_kinds_are_errors() {
        assert!(matches!(
            new("cview", &args(&[("path", "x")])),
            Err(Error::UnsupportedKind(k)) if k == "cview"
        ));
    }
}
