//! SQL Parser
//!
//! A hand-written backtracking recursive descent parser with Pratt
//! expression parsing. Alternatives are tried under a [`TokenCursor`] mark
//! and rolled back on failure.

mod cursor;
mod ddl;
mod error;
mod expr;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;

pub use cursor::TokenCursor;
pub use error::{ParseError, SqlError};
pub use parser::Parser;
pub use pratt::{infix_binding_power, prefix_binding_power};
