//! Entity metadata and resolution
//!
//! Each entity type registers its metadata statically through the [`Entity`]
//! trait. The resolver functions in this module answer the three questions
//! the builders ask: which table, which primary keys, which settable columns.

use serde::{Deserialize, Serialize};

use crate::error::{QueryBuilderError, Result};
use crate::sql::sanitize::validate_identifier;
use crate::types::SqlValue;

/// Role a column plays in generated statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    /// Part of the key used by key-based WHERE clauses
    PrimaryKey,
    /// Written by UPDATE ... SET
    Settable,
    /// Result-only column, never written
    Computed,
}

/// A named column and its role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub role: ColumnRole,
}

/// Metadata registered for an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Simple name of the entity type
    #[serde(rename = "typeName")]
    pub type_name: String,
    /// Table name override; the type name is used when absent
    #[serde(rename = "tableName", skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Columns in declaration order
    pub columns: Vec<ColumnMetadata>,
}

impl EntityMetadata {
    /// Start describing an entity type
    pub fn builder(type_name: impl Into<String>) -> EntityMetadataBuilder {
        EntityMetadataBuilder::new(type_name)
    }

    /// Resolved table name
    pub fn table(&self) -> &str {
        self.table_name.as_deref().unwrap_or(&self.type_name)
    }

    /// Primary-key column names in declaration order
    pub fn primary_keys(&self) -> Vec<&str> {
        self.columns_with(ColumnRole::PrimaryKey)
    }

    /// Settable column names in declaration order
    pub fn settable(&self) -> Vec<&str> {
        self.columns_with(ColumnRole::Settable)
    }

    fn columns_with(&self, role: ColumnRole) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.role == role)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Builder for EntityMetadata
#[derive(Debug)]
pub struct EntityMetadataBuilder {
    type_name: String,
    table_name: Option<String>,
    columns: Vec<ColumnMetadata>,
}

impl EntityMetadataBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            table_name: None,
            columns: Vec::new(),
        }
    }

    /// Override the table name
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Add a primary-key column
    pub fn primary_key(self, name: impl Into<String>) -> Self {
        self.push(name, ColumnRole::PrimaryKey)
    }

    /// Add a settable column
    pub fn column(self, name: impl Into<String>) -> Self {
        self.push(name, ColumnRole::Settable)
    }

    /// Add a computed (result-only) column
    pub fn computed(self, name: impl Into<String>) -> Self {
        self.push(name, ColumnRole::Computed)
    }

    fn push(mut self, name: impl Into<String>, role: ColumnRole) -> Self {
        self.columns.push(ColumnMetadata {
            name: name.into(),
            role,
        });
        self
    }

    /// Validate every identifier and build the metadata
    pub fn build(self) -> Result<EntityMetadata> {
        validate_identifier(&self.type_name, &[]).map_err(QueryBuilderError::configuration)?;
        if let Some(table) = &self.table_name {
            validate_identifier(table, &[]).map_err(QueryBuilderError::configuration)?;
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            validate_identifier(&column.name, &seen).map_err(|e| {
                QueryBuilderError::configuration(format!("{} in {}", e, self.type_name))
            })?;
            seen.push(&column.name);
        }

        Ok(EntityMetadata {
            type_name: self.type_name,
            table_name: self.table_name,
            columns: self.columns,
        })
    }
}

/// An entity type whose metadata is registered ahead of use
///
/// # Example
/// ```
/// use std::sync::LazyLock;
/// use sql_splice::{Entity, EntityMetadata, SqlValue};
///
/// struct Person {
///     id: i64,
///     name: String,
/// }
///
/// static PERSON: LazyLock<EntityMetadata> = LazyLock::new(|| {
///     EntityMetadata::builder("Person")
///         .table_name("People")
///         .primary_key("Id")
///         .column("Name")
///         .build()
///         .expect("valid metadata")
/// });
///
/// impl Entity for Person {
///     fn metadata() -> &'static EntityMetadata {
///         &PERSON
///     }
///
///     fn column_value(&self, column: &str) -> Option<SqlValue> {
///         match column {
///             "Id" => Some(self.id.into()),
///             "Name" => Some(self.name.as_str().into()),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(sql_splice::entity::table_name::<Person>(), "People");
/// ```
pub trait Entity {
    fn metadata() -> &'static EntityMetadata;

    /// Current value of `column` on this instance
    fn column_value(&self, column: &str) -> Option<SqlValue>;
}

/// Table name for `E`: the registered override, else the type name
pub fn table_name<E: Entity>() -> &'static str {
    E::metadata().table()
}

/// Primary-key columns of `E`; empty if none are declared
pub fn primary_key_columns<E: Entity>() -> Vec<&'static str> {
    E::metadata().primary_keys()
}

/// Settable columns of `entity` with their current values
///
/// Primary-key and computed columns are excluded. A column the instance has
/// no value for resolves to `NULL`.
pub fn settable_columns<E: Entity>(entity: &E) -> Vec<(&'static str, SqlValue)> {
    E::metadata()
        .settable()
        .into_iter()
        .map(|name| (name, entity.column_value(name).unwrap_or(SqlValue::Null)))
        .collect()
}

/// Primary-key columns of `entity` with their current values
pub fn key_values<E: Entity>(entity: &E) -> Vec<(&'static str, SqlValue)> {
    primary_key_columns::<E>()
        .into_iter()
        .map(|name| (name, entity.column_value(name).unwrap_or(SqlValue::Null)))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::{Address, AuditView, Person};
    use super::*;

    // =========================================================================
    // Resolver Tests
    // =========================================================================

    #[test]
    fn test_table_name_override() {
        assert_eq!(table_name::<Person>(), "People");
    }

    #[test]
    fn test_table_name_defaults_to_type_name() {
        assert_eq!(table_name::<Address>(), "Address");
    }

    #[test]
    fn test_primary_key_columns_ordered() {
        assert_eq!(primary_key_columns::<Person>(), vec!["Id"]);
        assert_eq!(primary_key_columns::<Address>(), vec!["PersonId", "Kind"]);
        assert!(primary_key_columns::<AuditView>().is_empty());
    }

    #[test]
    fn test_settable_columns_exclude_keys_and_computed() {
        let person = Person {
            id: 7,
            name: "Ann".to_string(),
            age: 30,
        };

        let columns = settable_columns(&person);
        assert_eq!(
            columns,
            vec![("Name", SqlValue::from("Ann")), ("Age", SqlValue::from(30))]
        );
    }

    #[test]
    fn test_missing_value_resolves_to_null() {
        let address = Address {
            person_id: 1,
            kind: "home".to_string(),
            city: None,
        };

        assert_eq!(settable_columns(&address), vec![("City", SqlValue::Null)]);
    }

    #[test]
    fn test_key_values() {
        let address = Address {
            person_id: 3,
            kind: "work".to_string(),
            city: Some("Oslo".to_string()),
        };

        assert_eq!(
            key_values(&address),
            vec![("PersonId", SqlValue::from(3i64)), ("Kind", SqlValue::from("work"))]
        );
    }

    // =========================================================================
    // Builder Validation Tests
    // =========================================================================

    #[test]
    fn test_build_rejects_reserved_table() {
        let result = EntityMetadata::builder("Order").build();
        assert!(matches!(result, Err(QueryBuilderError::Configuration(_))));

        let result = EntityMetadata::builder("Orders").table_name("Order").build();
        assert!(matches!(result, Err(QueryBuilderError::Configuration(_))));
    }

    #[test]
    fn test_build_rejects_duplicate_column() {
        let result = EntityMetadata::builder("Item")
            .primary_key("Id")
            .column("Id")
            .build();

        let err = result.unwrap_err().to_string();
        assert!(err.contains("more than once"));
        assert!(err.contains("Item"));
    }

    #[test]
    fn test_build_rejects_column_differing_only_in_case() {
        let result = EntityMetadata::builder("Item")
            .primary_key("Id")
            .column("ID")
            .build();

        assert!(matches!(result, Err(QueryBuilderError::Configuration(_))));
    }

    #[test]
    fn test_build_rejects_bad_column_name() {
        let result = EntityMetadata::builder("Item").column("Name; DROP").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_serializes() {
        let json = serde_json::to_value(Person::metadata()).unwrap();

        assert_eq!(json["typeName"], "Person");
        assert_eq!(json["tableName"], "People");
        assert_eq!(json["columns"][0]["role"], "primaryKey");
        assert_eq!(json["columns"][3]["role"], "computed");
    }
}
