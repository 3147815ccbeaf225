//! Command handler infrastructure.
//!
//! A command is a regular expression bound to a [`CommandHandler`]. The
//! [`CommandRegistry`] keeps bindings in registration order; the stream
//! dispatcher asks it for the first binding whose pattern is found in an
//! event's content.

pub mod builtin;
mod handler;
mod registry;

pub use builtin::register_builtin;
pub use handler::{CommandHandler, FnHandler};
pub use registry::{CommandBinding, CommandRegistry};
