//! Property listing search
//!
//! - `criteria` - optional search filters for one request
//! - `compiler` - criteria to store predicate
//! - `normalize` - lenient extraction and defaulting of stored records
//! - `service` - search, create and diagnostics over a `DocumentStore`

pub mod compiler;
pub mod criteria;
pub mod normalize;
pub mod property;
pub mod service;

pub use compiler::compile;
pub use criteria::SearchCriteria;
pub use normalize::{RawProperty, normalize};
pub use property::{NewProperty, Property, PropertyStatus};
pub use service::{ListingError, ListingService, StoreDiagnostics};
