//! Query text assembly
//!
//! [`QueryBuilder`] threads a query string through pure mutations: selectors,
//! joins, filters, ordering and paging. Each mutator finds its anchor keyword
//! with a [`ClauseCursor`] and splices around it, so callers may start from
//! an empty string, a bare `WHERE` sentinel or a partial query and still end
//! up with clauses in SELECT, FROM, JOIN, WHERE, GROUP BY, ORDER BY, paging
//! order. Anchors are located once per call; apply mutators in clause order.

use crate::config::{BuilderConfig, KeyBinding};
use crate::entity::{Entity, key_values, settable_columns, table_name};
use crate::error::{QueryBuilderError, Result};
use crate::filter::ColumnFilter;
use crate::sql::clause::{Anchor, ClauseCursor};
use crate::sql::statement::normalize_parameters;
use crate::types::{OrderContract, Parameter, SqlValue, Statement};

/// Starting text for a query that only carries filters
pub const WHERE_SENTINEL: &str = "WHERE";

/// Join flavours accepted by [`QueryBuilder::insert_join_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
        }
    }
}

/// Query text builder
pub struct QueryBuilder<'a> {
    config: &'a BuilderConfig,
}

impl<'a> QueryBuilder<'a> {
    /// Create a new query builder with the given configuration
    pub fn new(config: &'a BuilderConfig) -> Self {
        Self { config }
    }

    pub fn where_sentinel(&self) -> &'static str {
        WHERE_SENTINEL
    }

    fn separator(&self) -> &str {
        &self.config.line_separator
    }

    fn cursor<'q>(&'q self, query: &'q str) -> ClauseCursor<'q> {
        ClauseCursor::new(query, &self.config.line_separator)
    }

    // =========================================================================
    // UPDATE / DELETE
    // =========================================================================

    /// `DELETE FROM <table> WHERE <where_clause> `
    pub fn delete_statement(&self, table: &str, where_clause: &str) -> String {
        format!("DELETE FROM {} WHERE {} ", table, where_clause)
    }

    /// `UPDATE <table> SET <set_clause> WHERE <where_clause> `
    pub fn update_statement(&self, table: &str, set_clause: &str, where_clause: &str) -> String {
        format!("UPDATE {} SET {} WHERE {} ", table, set_clause, where_clause)
    }

    /// `<pk> = <value>` for every primary-key column, joined by AND
    ///
    /// Fails when the entity type declares no primary key.
    pub fn where_from_keys<E: Entity>(&self, entity: &E) -> Result<Statement> {
        let keys = key_values(entity);
        if keys.is_empty() {
            return Err(QueryBuilderError::configuration(format!(
                "No primary key column declared on {}",
                E::metadata().type_name
            )));
        }

        Ok(self.assignments(keys, " AND "))
    }

    /// `<col> = <value>` for every settable column, joined by commas
    ///
    /// Fails when the entity type declares no settable column.
    pub fn set_from_columns<E: Entity>(&self, entity: &E) -> Result<Statement> {
        let columns = settable_columns(entity);
        if columns.is_empty() {
            return Err(QueryBuilderError::configuration(format!(
                "No settable column declared on {}",
                E::metadata().type_name
            )));
        }

        Ok(self.assignments(columns, " , "))
    }

    fn assignments(&self, columns: Vec<(&str, SqlValue)>, joiner: &str) -> Statement {
        match self.config.key_binding {
            KeyBinding::Literal => {
                tracing::debug!(columns = columns.len(), "embedding literal values");
                let text = columns
                    .iter()
                    .map(|(name, value)| format!("{} = {}", name, value.to_literal()))
                    .collect::<Vec<_>>()
                    .join(joiner);
                Statement::new(text)
            }
            KeyBinding::Parameterized => {
                let mut parts = Vec::with_capacity(columns.len());
                let mut params = Vec::with_capacity(columns.len());
                for (index, (name, value)) in columns.into_iter().enumerate() {
                    let param = Parameter::new(index, value);
                    parts.push(format!("{} = {}", name, param.placeholder()));
                    params.push(param);
                }
                Statement::with_params(parts.join(joiner), params)
            }
        }
    }

    /// DELETE for one entity, keyed on its primary-key values
    pub fn delete_entity<E: Entity>(&self, entity: &E) -> Result<Statement> {
        let where_clause = self.where_from_keys(entity)?;
        let sql = self.delete_statement(table_name::<E>(), &where_clause.sql);

        Ok(Statement::with_params(sql, where_clause.params))
    }

    /// UPDATE for one entity: every settable column, keyed on its primary key
    ///
    /// WHERE placeholders continue numbering after the SET placeholders.
    pub fn update_entity<E: Entity>(&self, entity: &E) -> Result<Statement> {
        let set_clause = self.set_from_columns(entity)?;
        let where_clause = self.where_from_keys(entity)?;

        let offset = set_clause.params.len();
        let where_sql = normalize_parameters(&where_clause.sql, offset);
        let sql = self.update_statement(table_name::<E>(), &set_clause.sql, &where_sql);

        let mut params = set_clause.params;
        params.extend(where_clause.params.iter().map(|p| p.shifted(offset)));

        Ok(Statement::with_params(sql, params))
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    /// Replace the SELECT list with `E`'s `columns`
    ///
    /// Text from the first `FROM ` onward is kept byte-for-byte. Without a
    /// `FROM `, the whole `query` is treated as trailing text (usually a
    /// filter) and a `SELECT ... FROM <table> AS <table>` is put in front.
    pub fn set_selector<E: Entity>(&self, query: &str, columns: &[&str]) -> String {
        self.selector::<E>(query, columns, false)
    }

    /// [`set_selector`](Self::set_selector) with `SELECT DISTINCT`
    pub fn set_distinct_selector<E: Entity>(&self, query: &str, columns: &[&str]) -> String {
        self.selector::<E>(query, columns, true)
    }

    fn selector<E: Entity>(&self, query: &str, columns: &[&str], distinct: bool) -> String {
        let table = table_name::<E>();
        let keyword = if distinct { "SELECT DISTINCT" } else { "SELECT" };
        let select_list = if columns.is_empty() {
            format!("{}.*", table)
        } else {
            self.qualified_list(table, columns)
        };
        let sep = self.separator();

        if let Some(tail) = self.cursor(query).tail_from(Anchor::From) {
            return format!("{} {}{}{}", keyword, select_list, sep, tail);
        }

        tracing::debug!(table, "no FROM anchor, synthesizing SELECT");
        let head = format!("{} {}{}FROM {} AS {}", keyword, select_list, sep, table, table);
        let rest = query.trim_start();
        if rest.is_empty() {
            head
        } else {
            format!("{}{}{}", head, sep, rest)
        }
    }

    fn qualified_list(&self, table: &str, columns: &[&str]) -> String {
        columns
            .iter()
            .map(|c| format!("{}.{}", table, c))
            .collect::<Vec<_>>()
            .join(format!(",{}", self.separator()).as_str())
    }

    /// Extend the SELECT list with `E`'s `columns`
    pub fn insert_selector<E: Entity>(&self, query: &str, columns: &[&str]) -> String {
        let items = self.qualified_list(table_name::<E>(), columns);
        self.splice_select_items(query, &items, columns.is_empty())
    }

    /// Extend the SELECT list with raw expressions
    pub fn insert_raw_selector(&self, query: &str, expressions: &[&str]) -> String {
        let items = expressions.join(format!(",{}", self.separator()).as_str());
        self.splice_select_items(query, &items, expressions.is_empty())
    }

    /// Extend the SELECT list with `COALESCE(<columns>) AS <alias>`
    pub fn insert_coalesce_selector(&self, query: &str, alias: &str, columns: &[&str]) -> String {
        let item = format!("COALESCE({}) AS {}", columns.join(", "), alias);
        self.splice_select_items(query, &item, columns.is_empty())
    }

    fn splice_select_items(&self, query: &str, items: &str, empty: bool) -> String {
        if empty {
            return query.to_string();
        }

        let fragment = format!(",{}{}", items, self.separator());
        match self.cursor(query).insert_before(Anchor::From, &fragment) {
            Some(spliced) => spliced,
            None => {
                tracing::warn!("no FROM anchor, select items not inserted");
                query.to_string()
            }
        }
    }

    // =========================================================================
    // Joins
    // =========================================================================

    /// `JOIN <T> AS <T> ON <E>.<key> = <T>.<target_key>`
    pub fn insert_join<E: Entity, T: Entity>(&self, query: &str, key: &str, target_key: &str) -> String {
        self.insert_join_with::<E, T>(query, key, target_key, JoinType::Inner, None)
    }

    /// `LEFT JOIN <T> AS <T> ON <E>.<key> = <T>.<target_key>`
    pub fn insert_left_join<E: Entity, T: Entity>(&self, query: &str, key: &str, target_key: &str) -> String {
        self.insert_join_with::<E, T>(query, key, target_key, JoinType::Left, None)
    }

    /// LEFT JOIN with an extra predicate ANDed into the ON clause
    pub fn insert_left_join_on<E: Entity, T: Entity>(
        &self,
        query: &str,
        key: &str,
        target_key: &str,
        predicate: &str,
    ) -> String {
        self.insert_join_with::<E, T>(query, key, target_key, JoinType::Left, Some(predicate))
    }

    /// Join `T` onto `E`
    ///
    /// A query without `FROM ` first gets `SELECT <E>.* FROM <E> AS <E>`.
    /// The join goes in front of the first WHERE, GROUP BY, ORDER BY or
    /// paging clause, or at the end when none is present.
    pub fn insert_join_with<E: Entity, T: Entity>(
        &self,
        query: &str,
        key: &str,
        target_key: &str,
        join_type: JoinType,
        predicate: Option<&str>,
    ) -> String {
        let query = if self.cursor(query).contains(Anchor::From) {
            query.to_string()
        } else {
            self.set_selector::<E>(query, &["*"])
        };

        let base = table_name::<E>();
        let target = table_name::<T>();
        let mut clause = format!(
            "{} {} AS {} ON {}.{} = {}.{}",
            join_type.keyword(),
            target,
            target,
            base,
            key,
            target,
            target_key
        );
        if let Some(predicate) = predicate.filter(|p| !p.trim().is_empty()) {
            clause.push_str(" AND ");
            clause.push_str(predicate);
        }

        let cursor = self.cursor(&query);
        cursor
            .insert_before_first(
                &[Anchor::Where, Anchor::GroupBy, Anchor::OrderBy, Anchor::Paging],
                &format!("{}{}", clause, self.separator()),
            )
            .unwrap_or_else(|| cursor.append(&clause))
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Add `fragment` to the WHERE clause, creating the clause when missing
    ///
    /// - the bare `WHERE` sentinel gets the fragment appended
    /// - without WHERE, `WHERE <fragment>` goes before GROUP BY, else before
    ///   ORDER BY, else at the end
    /// - with WHERE, `AND <fragment>` goes before GROUP BY, else before
    ///   ORDER BY, else at the end
    pub fn insert_filter_in_query(&self, query: &str, fragment: &str) -> String {
        if query.trim() == WHERE_SENTINEL {
            return format!("{} {}", WHERE_SENTINEL, fragment);
        }

        let cursor = self.cursor(query);
        let clause = if cursor.contains(Anchor::Where) {
            format!("AND {}", fragment)
        } else {
            tracing::debug!("no WHERE anchor, synthesizing WHERE clause");
            format!("{} {}", WHERE_SENTINEL, fragment)
        };

        cursor
            .insert_before_first(
                &[Anchor::GroupBy, Anchor::OrderBy],
                &format!("{}{}", clause, self.separator()),
            )
            .unwrap_or_else(|| cursor.append(&clause))
    }

    /// Insert `filter` into the statement's WHERE clause and take over its bindings
    ///
    /// The filter's placeholders are moved past the ones the statement already
    /// binds, so any number of filters can be applied one after another.
    pub fn apply_filter(&self, statement: Statement, filter: &ColumnFilter) -> Statement {
        let offset = statement.params.len();
        let fragment = normalize_parameters(&filter.render(), offset);
        let sql = self.insert_filter_in_query(&statement.sql, &fragment);

        let mut params = statement.params;
        params.extend(filter.params.iter().map(|p| p.shifted(offset)));

        Statement::with_params(sql, params)
    }

    // =========================================================================
    // Ordering and Paging
    // =========================================================================

    /// Append `ORDER BY <column> ASC|DESC`
    ///
    /// An existing ORDER BY is not merged; order a query once.
    pub fn insert_order(&self, query: &str, order: &OrderContract) -> String {
        self.cursor(query).append(&format!(
            "ORDER BY {} {}",
            order.column_name,
            order.direction.keyword()
        ))
    }

    /// Append `ORDER BY <E>.<c1> ASC, <E>.<c2> DESC, ...`
    pub fn insert_orders<E: Entity>(&self, query: &str, orders: &[OrderContract]) -> String {
        if orders.is_empty() {
            return query.to_string();
        }

        let table = table_name::<E>();
        let terms = orders
            .iter()
            .map(|o| format!("{}.{} {}", table, o.column_name, o.direction.keyword()))
            .collect::<Vec<_>>()
            .join(", ");

        self.cursor(query).append(&format!("ORDER BY {}", terms))
    }

    /// Append `OFFSET <skip> ROWS FETCH NEXT <take> ROWS ONLY`
    ///
    /// The paging clause needs an ORDER BY in front of it; `ORDER BY 1` is
    /// added when the query has none.
    pub fn insert_paging(&self, query: &str, skip: u64, take: u64) -> String {
        let ordered = if self.cursor(query).contains(Anchor::OrderBy) {
            query.to_string()
        } else {
            tracing::debug!("no ORDER BY anchor, ordering by first column for paging");
            self.cursor(query).append("ORDER BY 1")
        };

        self.cursor(&ordered).append(&format!(
            "OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            skip, take
        ))
    }
}
