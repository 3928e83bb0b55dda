//! Selection engine
//!
//! Picks tracks from a music library:
//! - `walk`: enumerate candidate paths under the library root
//! - `query`: evaluate the term query against each root-relative path
//! - `order`: optional recency sort and limit
//! - `engine`: the pipeline tying them together

pub mod engine;
pub mod error;
pub mod order;
pub mod query;
pub mod walk;

pub use engine::{select, SelectRequest, Selection};
pub use error::SelectError;
