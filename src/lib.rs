pub use crate::diagnostics::{ErrorContext, StateError};
pub use crate::syntax::{Classification, Node, NodeKind, Span, ValueKind};

pub mod cli;
pub mod diagnostics;
pub mod discovery;
pub mod engine;
pub mod syntax;
pub mod validation;
