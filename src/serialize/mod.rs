//! Argument values and their cycle-safe serialization.
//!
//! # Data Flow
//! ```text
//! caller args (Value graph, possibly cyclic)
//!     → SafeSerializer::to_json_args  → compact JSON array (wire payload)
//!     → SafeSerializer::stringify_arguments → indented text (sinks)
//! ```
//!
//! # Design Decisions
//! - Cycles are detected with a per-call side table of node addresses
//! - A node revisited on the current path becomes "[Circular]"
//! - Serialization never fails

pub mod safe;
pub mod value;

pub use safe::{SafeSerializer, CIRCULAR, DEFAULT_INDENT};
pub use value::Value;
