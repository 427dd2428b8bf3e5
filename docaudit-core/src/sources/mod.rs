//! Document Sources
//!
//! This module supplies raw document text to the audit engine. The engine never
//! touches the filesystem itself; it asks a `DocumentSource` for each identifier.
//!
//! ## Architecture
//!
//! ```text
//! Identifier list (explicit or discovered)
//!     ↓
//! [DocumentSource]  -- NotFound / Decode errors become skip entries
//!     ↓
//! Document text
//!     ↓
//! [RuleEngine]
//!     ↓
//! DocumentRecord
//! ```
//!
//! ## Available Sources
//!
//! - `DirectorySource` - Markdown files under a root directory
//! - `MemorySource` - In-memory documents (library callers, tests)

pub mod directory;
pub mod memory;
pub mod source;

pub use directory::DirectorySource;
pub use memory::MemorySource;
pub use source::{decode_text, DocumentSource};
