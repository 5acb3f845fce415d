//! SQL text utilities
//!
//! Provides anchor-based splicing, predicate building, query assembly and
//! identifier/literal sanitization.

pub mod clause;
pub mod query;
pub mod sanitize;
pub mod statement;

pub use clause::{Anchor, ClauseCursor};
pub use query::{JoinType, QueryBuilder, WHERE_SENTINEL};
pub use sanitize::{TSQL_RESERVED_WORDS, quote_literal, validate_identifier};
pub use statement::{StatementBuilder, normalize_parameters};
