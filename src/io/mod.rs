//! IO modules - output adapters
//!
//! - `render` - Plain-text rendering of the cabin to stdout
//! - `egress` - Episode summaries to file (JSONL format)

pub mod egress;
pub mod render;

pub use egress::Egress;
pub use render::TerminalRenderer;
