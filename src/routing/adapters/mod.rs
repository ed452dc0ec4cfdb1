//! Adapter implementations of the completion provider port.

pub mod memory;
pub mod openai;
