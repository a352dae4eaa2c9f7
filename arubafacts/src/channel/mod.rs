//! Channel layer for prompt framing over an interactive shell.
//!
//! This module handles the interactive session management,
//! including prompt detection, pager handling and ANSI stripping.

mod buffer;
mod patterns;
mod session;

pub use buffer::PatternBuffer;
pub use patterns::compile_prompt_pattern;
pub use session::{ChannelConfig, SessionChannel, send_command};
