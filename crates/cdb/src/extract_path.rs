//! Extract paths.
//!
//! A parameter path is the ordered list of parameter columns, e.g. `/phi/theta/variable`.  An extract path is one
//! instance of it with a value for each parameter, e.g. `/0/90/temperature`.  The same walk over the parameters also
//! yields the filter that finds the extracts for that combination.
//!
//! Parameters the caller leaves out match anything: their predicate is dropped and their path segment is the
//! configured unbound marker.
use std::collections::HashMap;

use log::*;

use crate::schema::Schema;

/// A path plus the filter selecting the rows it names.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ExtractQuery {
    /// The extract path, e.g. `/0/*`.
    pub(crate) path: String,
    /// Parameter columns that must match, in parameter order.
    pub(crate) filters: Vec<String>,
    /// The value each filter column must equal.  Same length and order as `filters`.
    pub(crate) values: Vec<String>,
}

impl ExtractQuery {
    pub(crate) fn new(
        schema: &Schema,
        parameters: &HashMap<String, String>,
        unbound_marker: &str,
    ) -> ExtractQuery {
        let mut path = String::new();
        let mut filters = vec![];
        let mut values = vec![];

        for p in schema.iter_parameters() {
            path.push('/');
            match parameters.get(p) {
                Some(v) => {
                    path.push_str(v);
                    filters.push(p.to_string());
                    values.push(v.clone());
                }
                None => path.push_str(unbound_marker),
            }
        }

        if path.is_empty() {
            path.push('/');
        }

        for k in parameters.keys().filter(|k| !schema.is_parameter(k)) {
            warn!("Ignoring {}: not a parameter of this database", k);
        }

        ExtractQuery {
            path,
            filters,
            values,
        }
    }
}
