//! LSP Protocol Implementation
//!
//! Publishes indentation violations of open Java documents as diagnostics.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;
pub mod watcher;

pub use backend::Backend;
