//! SQL Identifier and Literal Utilities
//!
//! Identifiers are emitted bare (unquoted), so registered table and column
//! names are validated up front. Literals are single-quoted with embedded
//! quotes doubled.

use std::sync::LazyLock;

use regex::Regex;

/// Reserved keywords of the target dialect that cannot be used as bare identifiers
pub const TSQL_RESERVED_WORDS: &[&str] = &[
    "ADD",
    "ALL",
    "ALTER",
    "AND",
    "ANY",
    "AS",
    "ASC",
    "BETWEEN",
    "BY",
    "CASE",
    "CHECK",
    "COLUMN",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT",
    "DEFAULT",
    "DELETE",
    "DESC",
    "DISTINCT",
    "DROP",
    "ELSE",
    "END",
    "EXCEPT",
    "EXEC",
    "EXISTS",
    "FETCH",
    "FOR",
    "FOREIGN",
    "FROM",
    "FULL",
    "GROUP",
    "HAVING",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTO",
    "IS",
    "JOIN",
    "KEY",
    "LEFT",
    "LIKE",
    "NOT",
    "NULL",
    "OF",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "PRIMARY",
    "REFERENCES",
    "RIGHT",
    "ROWS",
    "SELECT",
    "SET",
    "TABLE",
    "THEN",
    "TO",
    "TOP",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USER",
    "VALUES",
    "VIEW",
    "WHEN",
    "WHERE",
    "WITH",
];

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Quote a text value as a SQL string literal
///
/// # Example
/// ```
/// use sql_splice::sql::quote_literal;
///
/// assert_eq!(quote_literal("Bob"), "'Bob'");
/// assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Validate a table or column name for bare use in SQL text
///
/// Rules:
/// - Must start with a letter or underscore
/// - Can only contain ASCII letters, digits and underscores
/// - Cannot be a reserved word (case-insensitive)
/// - Cannot repeat a name already in `taken` (case-insensitive)
///
/// # Example
/// ```
/// use sql_splice::sql::validate_identifier;
///
/// assert!(validate_identifier("Person", &[]).is_ok());
/// assert!(validate_identifier("Order", &[]).is_err()); // reserved keyword
/// assert!(validate_identifier("Id", &["Id"]).is_err()); // duplicate
/// ```
pub fn validate_identifier(name: &str, taken: &[&str]) -> Result<(), String> {
    if name.is_empty() {
        return Err("Identifier cannot be empty".to_string());
    }

    if !IDENTIFIER_PATTERN.is_match(name) {
        return Err(format!(
            "Identifier '{}' is invalid. Must start with a letter or underscore and contain only letters, digits, and underscores.",
            name
        ));
    }

    if TSQL_RESERVED_WORDS.contains(&name.to_uppercase().as_str()) {
        return Err(format!(
            "Identifier '{}' is a reserved keyword and cannot be used unquoted.",
            name
        ));
    }

    if taken.iter().any(|t| t.eq_ignore_ascii_case(name)) {
        return Err(format!("Identifier '{}' is declared more than once.", name));
    }

    Ok(())
}
