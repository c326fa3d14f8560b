pub mod envelope;

pub use envelope::{unwrap_collection, unwrap_item};
