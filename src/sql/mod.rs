//! Safe SQL builder: identifiers from fixed table definitions only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
