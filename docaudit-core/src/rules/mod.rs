// Main rules module - delegates to semantic sub-modules
// This file coordinates the rule system but actual implementations are in:
// - engine.rs: RuleEngine, compiled rules and per-document evaluation
// - section_detection.rs: Marker detection and section spans
// - scoped_counter.rs: Nested-item counting inside a span
// - validation.rs: Schema contract checks and data-quality warnings

pub mod engine;
pub mod scoped_counter;
pub mod section_detection;
pub mod validation;

pub use engine::*;
pub use section_detection::{SectionDetector, SectionMatch};
