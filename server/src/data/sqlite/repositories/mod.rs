//! SQLite repositories

pub mod document;

pub use document::{find_documents, insert_document, list_collections};
