// All core functionality is in docaudit-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod render;

// Re-export core types for convenience
pub use docaudit_core::*;
