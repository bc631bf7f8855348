//! sheetq Format - Core primitives for windowed sheet retrieval
//!
//! This crate provides the data model shared by the sheetq crates with no I/O
//! dependencies. It includes:
//!
//! - Reserved envelope keys and header names
//! - Tables and positional windows
//! - Document classification (single-table vs. multi-table)
//! - Filter parameters and metadata conventions
//! - Transport-neutral responses
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod document;
pub mod error;
pub mod params;
pub mod response;
pub mod table;

// Re-export commonly used types
pub use document::{Document, MultiSheet};
pub use error::{Result, SheetError};
pub use params::{FilterParams, MetadataMode};
pub use response::{clean_header_value, Response};
pub use table::{Table, Window};
