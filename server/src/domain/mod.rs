//! Domain logic
//!
//! - `listings` - property listing search and creation

pub mod listings;

pub use listings::{ListingError, ListingService};
