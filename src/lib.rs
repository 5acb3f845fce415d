//! # sql-splice
//!
//! Parameterized SQL text assembly from entity metadata and composable
//! predicate fragments.
//!
//! Queries are plain strings threaded through pure mutators. Each mutator
//! finds an anchor keyword (FROM, WHERE, GROUP BY, ORDER BY, ...) in the text
//! and splices its clause in the right place, so selectors, joins, filters,
//! ordering and paging can be added without a syntax tree. Predicates carry
//! their own `@n` bindings and are renumbered when combined.
//!
//! ## Features
//!
//! - **Static Entity Metadata**: table name, primary keys and settable columns registered per type
//! - **Composable Filters**: AND/OR folding with contiguous placeholder numbering
//! - **Clause-Aware Splicing**: filters land before GROUP BY/ORDER BY, joins before WHERE
//! - **Paging**: `OFFSET … ROWS FETCH NEXT … ROWS ONLY`, with `ORDER BY 1` when unordered
//! - **Key-Based UPDATE/DELETE**: parameterized by default, literal embedding on request
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::LazyLock;
//! use sql_splice::{
//!     BuilderConfig, Entity, EntityMetadata, OrderContract, QueryBuilder, SqlValue,
//!     Statement, StatementBuilder,
//! };
//!
//! struct Person;
//!
//! static PERSON: LazyLock<EntityMetadata> = LazyLock::new(|| {
//!     EntityMetadata::builder("Person")
//!         .primary_key("Id")
//!         .column("Name")
//!         .column("Age")
//!         .build()
//!         .expect("valid metadata")
//! });
//!
//! impl Entity for Person {
//!     fn metadata() -> &'static EntityMetadata {
//!         &PERSON
//!     }
//!
//!     fn column_value(&self, _column: &str) -> Option<SqlValue> {
//!         None
//!     }
//! }
//!
//! let config = BuilderConfig::builder().single_line().build();
//! let qb = QueryBuilder::new(&config);
//! let sb = StatementBuilder::new();
//!
//! let adults = sb.build_statement::<Person>("Age", 18, sql_splice::Operator::MoreOrEquals);
//! let statement = qb.apply_filter(Statement::new(qb.where_sentinel()), &adults);
//!
//! let sql = qb.set_selector::<Person>(&statement.sql, &["Id", "Name"]);
//! let sql = qb.insert_orders::<Person>(&sql, &[OrderContract::asc("Name")]);
//! let sql = qb.insert_paging(&sql, 0, 20);
//!
//! assert_eq!(
//!     sql,
//!     "SELECT Person.Id, Person.Name FROM Person AS Person WHERE Person.Age >= @0 \
//!      ORDER BY Person.Name ASC OFFSET 0 ROWS FETCH NEXT 20 ROWS ONLY"
//! );
//! assert_eq!(statement.values(), vec![&SqlValue::Int(18)]);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use sql_splice::{BuilderConfig, KeyBinding};
//!
//! let config = BuilderConfig::builder()
//!     .line_separator("\r\n")   // Clause separator (default: "\n")
//!     .literal_keys()           // Embed key values instead of binding them
//!     .build();
//!
//! assert_eq!(config.key_binding, KeyBinding::Literal);
//! ```
//!
//! ## Thread Safety
//!
//! Every operation is a pure function of its inputs. The only shared state
//! is the per-type static metadata and a compiled placeholder pattern, both
//! read-only, so builders can be used from any number of threads.

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod sql;
pub mod types;

// Re-export main types for convenience
pub use config::{BuilderConfig, BuilderConfigBuilder, KeyBinding};
pub use entity::{ColumnMetadata, ColumnRole, Entity, EntityMetadata, EntityMetadataBuilder};
pub use error::{QueryBuilderError, Result};
pub use filter::{ColumnFilter, Connective, Operator};
pub use sql::{Anchor, ClauseCursor, JoinType, QueryBuilder, StatementBuilder};
pub use types::{OrderContract, OrderDirection, Parameter, SqlValue, Statement};
