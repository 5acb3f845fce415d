//! Predicate building and combination
//!
//! Builds single-column [`ColumnFilter`]s for an entity and folds several of
//! them into one with AND/OR, renumbering placeholders so the combined
//! fragment binds `@0..@n-1` in order.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::entity::{Entity, table_name};
use crate::error::{QueryBuilderError, Result};
use crate::filter::{ColumnFilter, Connective, Operator};
use crate::types::{Parameter, SqlValue};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\d+)").expect("placeholder pattern is valid"));

/// Rewrite every `@<n>` placeholder in `fragment` to `@<n + offset>`
///
/// # Example
/// ```
/// use sql_splice::sql::normalize_parameters;
///
/// assert_eq!(normalize_parameters("@0 AND @1", 3), "@3 AND @4");
/// ```
pub fn normalize_parameters(fragment: &str, offset: usize) -> String {
    if offset == 0 {
        return fragment.to_string();
    }

    PLACEHOLDER
        .replace_all(fragment, |caps: &Captures| {
            match caps[1].parse::<usize>().ok().and_then(|n| n.checked_add(offset)) {
                Some(n) => format!("@{}", n),
                // Not a placeholder we could have produced
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Builds parameterized predicate fragments
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementBuilder;

impl StatementBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Apply `operator` to a key and value fragment
    pub fn build(&self, key: &str, value: &str, operator: Operator) -> String {
        operator.render(key, value)
    }

    /// Predicate on `E`'s `column` with `value` bound to a single placeholder
    ///
    /// The key is qualified with the entity's table name. The returned filter
    /// is fully rendered, so its operator is [`Operator::Non`].
    pub fn build_statement<E: Entity>(
        &self,
        column: &str,
        value: impl Into<SqlValue>,
        operator: Operator,
    ) -> ColumnFilter {
        let key_name = format!("{}.{}", table_name::<E>(), column);
        let param = Parameter::new(0, value);
        let filter = operator.render(&key_name, &param.placeholder());

        ColumnFilter::new(key_name, Operator::Non, filter, vec![param])
    }

    /// `build_statement` with [`Operator::Equals`]
    pub fn build_equals<E: Entity>(&self, column: &str, value: impl Into<SqlValue>) -> ColumnFilter {
        self.build_statement::<E>(column, value, Operator::Equals)
    }

    /// `column IN (@0, @1, ...)` with one placeholder per value, in input order
    pub fn build_in_statement<E, I, V>(&self, column: &str, values: I) -> Result<ColumnFilter>
    where
        E: Entity,
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let params: Vec<Parameter> = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Parameter::new(i, v))
            .collect();

        if params.is_empty() {
            return Err(QueryBuilderError::empty_input(format!(
                "IN filter on '{}' requires at least one value",
                column
            )));
        }

        let key_name = format!("{}.{}", table_name::<E>(), column);
        let placeholders = params
            .iter()
            .map(Parameter::placeholder)
            .collect::<Vec<_>>()
            .join(", ");
        let filter = Operator::In.render(&key_name, &placeholders);

        Ok(ColumnFilter::new(key_name, Operator::Non, filter, params))
    }

    /// Combine filters with AND, wrapped in parentheses
    pub fn build_and_statement(&self, filters: &[ColumnFilter]) -> Result<ColumnFilter> {
        self.combine(filters, Connective::And)
    }

    /// Combine filters with OR, wrapped in parentheses
    pub fn build_or_filters(&self, filters: &[ColumnFilter]) -> Result<ColumnFilter> {
        self.combine(filters, Connective::Or)
    }

    /// Fold `filters` into one fragment joined by `connective`
    ///
    /// The first filter keeps its placeholders. Every later filter is shifted
    /// by the number of parameters already collected, so the result binds a
    /// contiguous `@0..@n-1` range in input order.
    pub fn combine(&self, filters: &[ColumnFilter], connective: Connective) -> Result<ColumnFilter> {
        let Some((first, rest)) = filters.split_first() else {
            return Err(QueryBuilderError::empty_input(format!(
                "{} combination requires at least one filter",
                connective.keyword().trim()
            )));
        };

        let mut fragment = first.render();
        let mut params = first.params.clone();
        let mut offset = params.len();

        for filter in rest {
            let shifted = ColumnFilter {
                filter: normalize_parameters(&filter.filter, offset),
                ..filter.clone()
            };
            fragment.push_str(connective.keyword());
            fragment.push_str(&shifted.render());
            params.extend(filter.params.iter().map(|p| p.shifted(offset)));
            offset += filter.param_count();
        }

        tracing::trace!(
            filters = filters.len(),
            params = params.len(),
            connective = ?connective,
            "combined filters"
        );

        Ok(ColumnFilter::raw(format!("({})", fragment), params))
    }

    /// See [`normalize_parameters`]
    pub fn normalize_parameters(&self, fragment: &str, offset: usize) -> String {
        normalize_parameters(fragment, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::fixtures::Person;

    fn name_filter() -> ColumnFilter {
        ColumnFilter::compare("Name", Operator::Like, "MyName")
    }

    fn age_filter() -> ColumnFilter {
        ColumnFilter::compare("Age", Operator::MoreOrEquals, 18)
    }

    fn placeholder_indices(fragment: &str) -> Vec<usize> {
        PLACEHOLDER
            .captures_iter(fragment)
            .map(|c| c[1].parse().unwrap())
            .collect()
    }

    // ==================== normalize_parameters ====================

    #[test]
    fn test_normalize_parameters_shifts() {
        assert_eq!(normalize_parameters("@0 AND @1", 3), "@3 AND @4");
    }

    #[test]
    fn test_normalize_parameters_zero_offset() {
        assert_eq!(normalize_parameters("a = @0", 0), "a = @0");
    }

    #[test]
    fn test_normalize_parameters_multi_digit_and_other_text() {
        assert_eq!(
            normalize_parameters("x IN (@9, @10) AND y = 'z'", 5),
            "x IN (@14, @15) AND y = 'z'"
        );
    }

    #[test]
    fn test_normalize_parameters_overflow_left_unchanged() {
        let max = format!("@{}", usize::MAX);
        assert_eq!(normalize_parameters(&max, 1), max);
        assert_eq!(
            normalize_parameters(&format!("{} AND @2", max), 1),
            format!("{} AND @3", max)
        );
    }

    // ==================== build_statement ====================

    #[test]
    fn test_build_statement_qualifies_key() {
        let builder = StatementBuilder::new();
        let filter = builder.build_statement::<Person>("Age", 21, Operator::Less);

        assert_eq!(filter.key_name, "People.Age");
        assert_eq!(filter.render(), "People.Age < @0");
        assert_eq!(filter.params, vec![Parameter::new(0, 21)]);
    }

    #[test]
    fn test_build_equals_default_operator() {
        let builder = StatementBuilder::new();
        let filter = builder.build_equals::<Person>("Name", "Ann");

        assert_eq!(filter.render(), "People.Name = @0");
        assert_eq!(filter.params[0].value, SqlValue::from("Ann"));
    }

    #[test]
    fn test_build_raw_operator() {
        let builder = StatementBuilder::new();
        assert_eq!(builder.build("a", "@0", Operator::NotEquals), "a != @0");
    }

    #[test]
    fn test_build_in_statement_one_placeholder_per_value() {
        let builder = StatementBuilder::new();
        let filter = builder
            .build_in_statement::<Person, _, _>("Name", ["a", "b", "c"])
            .unwrap();

        assert_eq!(filter.render(), "People.Name IN (@0, @1, @2)");
        assert_eq!(
            filter.params,
            vec![Parameter::new(0, "a"), Parameter::new(1, "b"), Parameter::new(2, "c")]
        );
    }

    #[test]
    fn test_build_in_statement_empty_fails() {
        let builder = StatementBuilder::new();
        let result = builder.build_in_statement::<Person, _, i64>("Id", Vec::new());

        assert!(matches!(result, Err(QueryBuilderError::EmptyInput(_))));
    }

    // ==================== build_and_statement / build_or_filters ====================

    #[test]
    fn test_and_statement_combines_and_renumbers() {
        let builder = StatementBuilder::new();
        let result = builder
            .build_and_statement(&[name_filter(), age_filter()])
            .unwrap();

        assert_eq!(result.filter, "(Name LIKE '%' + @0 + '%' AND Age >= @1)");
        assert_eq!(result.params.len(), 2);
        assert_eq!(result.params[0], Parameter::new(0, "MyName"));
        assert_eq!(result.params[1], Parameter::new(1, 18));
    }

    #[test]
    fn test_and_statement_empty_fails() {
        let builder = StatementBuilder::new();
        let result = builder.build_and_statement(&[]);

        assert!(matches!(result, Err(QueryBuilderError::EmptyInput(_))));
    }

    #[test]
    fn test_and_statement_single_filter_is_wrapped() {
        let builder = StatementBuilder::new();
        let result = builder.build_and_statement(&[name_filter()]).unwrap();

        assert_eq!(result.render(), "(Name LIKE '%' + @0 + '%')");
        assert_eq!(result.params, name_filter().params);
    }

    #[test]
    fn test_or_filters() {
        let builder = StatementBuilder::new();
        let result = builder
            .build_or_filters(&[
                builder.build_equals::<Person>("Name", "a"),
                builder.build_equals::<Person>("Name", "b"),
            ])
            .unwrap();

        assert_eq!(result.render(), "(People.Name = @0 OR People.Name = @1)");
        assert_eq!(result.params[1], Parameter::new(1, "b"));
    }

    #[test]
    fn test_or_filters_empty_fails() {
        let builder = StatementBuilder::new();
        let err = builder.build_or_filters(&[]).unwrap_err();

        assert!(err.to_string().contains("OR combination"));
    }

    #[test]
    fn test_combination_does_not_modify_inputs() {
        let builder = StatementBuilder::new();
        let filters = vec![name_filter(), age_filter()];
        builder.build_and_statement(&filters).unwrap();

        assert_eq!(filters[1].filter, "@0");
        assert_eq!(filters[1].params[0].index, 0);
    }

    #[test]
    fn test_placeholders_contiguous_across_multi_param_filters() {
        let builder = StatementBuilder::new();
        let filters = vec![
            builder
                .build_in_statement::<Person, _, _>("Id", [1, 2, 3])
                .unwrap(),
            builder.build_equals::<Person>("Name", "x"),
            builder
                .build_in_statement::<Person, _, _>("Age", [40, 50])
                .unwrap(),
        ];

        let result = builder.build_and_statement(&filters).unwrap();
        let total: usize = filters.iter().map(ColumnFilter::param_count).sum();

        assert_eq!(result.params.len(), total);
        assert_eq!(placeholder_indices(&result.filter), (0..total).collect::<Vec<_>>());
        assert_eq!(
            result.params.iter().map(|p| p.index).collect::<Vec<_>>(),
            (0..total).collect::<Vec<_>>()
        );
        assert_eq!(result.params[5].value, SqlValue::from(50));
    }

    #[test]
    fn test_nested_combination() {
        let builder = StatementBuilder::new();
        let either = builder
            .build_or_filters(&[
                builder.build_equals::<Person>("Name", "a"),
                builder.build_equals::<Person>("Name", "b"),
            ])
            .unwrap();
        let result = builder
            .build_and_statement(&[builder.build_statement::<Person>("Age", 18, Operator::More), either])
            .unwrap();

        assert_eq!(
            result.render(),
            "(People.Age > @0 AND (People.Name = @1 OR People.Name = @2))"
        );
        assert_eq!(placeholder_indices(&result.filter), vec![0, 1, 2]);
    }
}
