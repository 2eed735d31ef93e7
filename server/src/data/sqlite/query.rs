//! Predicate to SQL translation
//!
//! Builds a parameterized `WHERE` fragment over the JSON `body` column.
//! Every leaf is guarded by `json_type` so that a missing field or a value of
//! the wrong JSON type never matches, mirroring `Predicate::matches`.
//! Case-insensitive leaves compare against the `folded` column, which holds
//! the text fields already lower-cased with full Unicode rules.
//! Field names come from the listing compiler and are embedded as JSON paths;
//! all values are bound as parameters.

use crate::data::predicate::{Predicate, Scalar};
use crate::utils::sql::contains_pattern;

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<Scalar>,
}

impl SqlParams {
    fn push(&mut self, value: Scalar) {
        self.values.push(value);
    }

    /// Push the JSON path twice (type guard, then extraction)
    fn push_path(&mut self, field: &str) {
        let path = format!("$.{}", field);
        self.values.push(Scalar::Text(path.clone()));
        self.values.push(Scalar::Text(path));
    }
}

/// Generate SQL WHERE clause fragment
/// Returns the SQL clause with ? placeholders and updates params
pub fn to_sql(predicate: &Predicate, params: &mut SqlParams) -> String {
    match predicate {
        Predicate::Equals { field, value } => compare(field, "=", value, params),
        Predicate::RangeGte { field, value } => compare(field, ">=", value, params),
        Predicate::RangeLte { field, value } => compare(field, "<=", value, params),
        Predicate::EqualsCi { field, value } => {
            params.push_path(field);
            params.push(Scalar::Text(value.to_lowercase()));
            "(json_type(body, ?) = 'text' AND json_extract(folded, ?) = ?)".to_string()
        }
        Predicate::ContainsCi { field, value } => {
            params.push_path(field);
            params.push(Scalar::Text(contains_pattern(value)));
            r"(json_type(body, ?) = 'text' AND json_extract(folded, ?) LIKE ? ESCAPE '\')"
                .to_string()
        }
        Predicate::Or(branches) => join(branches, " OR ", "1=0", params),
        Predicate::And(branches) => join(branches, " AND ", "1=1", params),
    }
}

fn compare(field: &str, op: &str, value: &Scalar, params: &mut SqlParams) -> String {
    let type_guard = match value {
        Scalar::Text(_) => "= 'text'",
        Scalar::Integer(_) | Scalar::Number(_) => "IN ('integer', 'real')",
    };
    params.push_path(field);
    params.push(value.clone());
    format!(
        "(json_type(body, ?) {} AND json_extract(body, ?) {} ?)",
        type_guard, op
    )
}

fn join(branches: &[Predicate], op: &str, empty: &str, params: &mut SqlParams) -> String {
    if branches.is_empty() {
        return empty.to_string();
    }
    let parts: Vec<String> = branches.iter().map(|p| to_sql(p, params)).collect();
    format!("({})", parts.join(op))
}
