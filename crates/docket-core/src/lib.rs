pub mod deadline;
pub mod document;
pub mod stats;

pub use document::{Document, DocumentKind, Priority, Status};
