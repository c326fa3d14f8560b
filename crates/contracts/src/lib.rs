pub mod aggregates;
pub mod api;
pub mod domain;
pub mod list;
pub mod list_rows;
pub mod roles;
pub mod sync;
pub mod system;
pub mod validation;
