//! Search criteria to predicate compilation

use crate::data::predicate::Predicate;

use super::criteria::SearchCriteria;

/// Fields searched by the free-text `q` parameter
pub const TEXT_SEARCH_FIELDS: [&str; 4] = ["title", "city", "state", "address"];

/// Compile criteria into a single predicate
///
/// Always returns an `And` whose first branch is the status equality; each
/// present criterion appends one branch. Contradictory price bounds are kept
/// as-is and simply match nothing. Stored prices never exceed `i64::MAX`, so a
/// larger minimum compiles to an empty `Or` and a larger maximum to no branch.
pub fn compile(criteria: &SearchCriteria) -> Predicate {
    let mut branches = vec![Predicate::equals("status", criteria.status.as_str())];

    if let Some(q) = &criteria.q {
        branches.push(Predicate::Or(
            TEXT_SEARCH_FIELDS
                .iter()
                .map(|field| Predicate::contains_ci(field, q))
                .collect(),
        ));
    }

    if let Some(min) = criteria.min_price {
        branches.push(match i64::try_from(min) {
            Ok(min) => Predicate::gte("price", min),
            Err(_) => Predicate::Or(Vec::new()),
        });
    }
    if let Some(max) = criteria.max_price
        && let Ok(max) = i64::try_from(max)
    {
        branches.push(Predicate::lte("price", max));
    }
    if let Some(bedrooms) = criteria.bedrooms {
        branches.push(Predicate::gte("bedrooms", i64::from(bedrooms)));
    }
    if let Some(bathrooms) = criteria.bathrooms {
        branches.push(Predicate::gte("bathrooms", bathrooms));
    }

    for (field, value) in [
        ("city", &criteria.city),
        ("state", &criteria.state),
        ("property_type", &criteria.property_type),
    ] {
        if let Some(value) = value {
            branches.push(Predicate::equals_ci(field, value));
        }
    }

    Predicate::And(branches)
}
