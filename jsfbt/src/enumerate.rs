//! Combination enumerator: the cartesian product of a phrase's axes.
//!
//! Axes bound to the same runtime expression (same kind and source identity)
//! are not independent. The first occurrence branches over its candidates,
//! every later occurrence is bound to whatever the first one chose and is
//! marked collapsible, so it adds neither combinations nor tree depth.
//!
//! ```ignore
//! // [NUMBER(id=n), GENDER(id=u), NUMBER(id=n)]
//! // compact axes: [NUMBER(id=n), GENDER(id=u)]
//! // combinations: 2 (number) x |gender candidates|
//! ```

use crate::axis::{AxisValue, VariationAxis, VariationKind};
use crate::error::{FbtError, FbtResult};
use std::collections::HashMap;

/// Default upper bound on the number of combinations of one phrase
pub const DEFAULT_MAX_COMBINATIONS: usize = 256;

/// Enumeration limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerateOptions {
    pub max_combinations: usize,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        EnumerateOptions {
            max_combinations: DEFAULT_MAX_COMBINATIONS,
        }
    }
}

impl EnumerateOptions {
    pub fn with_max_combinations(mut self, max_combinations: usize) -> Self {
        self.max_combinations = max_combinations;
        self
    }
}

/// Value chosen for one input axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Position of the axis in the input list
    pub axis_index: usize,
    pub value: AxisValue,
    /// Bound by an earlier axis with the same identity
    pub collapsible: bool,
}

/// One value per input axis, in input order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Combination {
    bindings: Vec<Binding>,
}

impl Combination {
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Value bound to the input axis at `axis_index`
    pub fn value_of(&self, axis_index: usize) -> Option<&AxisValue> {
        self.bindings
            .iter()
            .find(|b| b.axis_index == axis_index)
            .map(|b| &b.value)
    }

    /// Table keys of the compact axes, root first
    pub fn key_path(&self) -> Vec<String> {
        self.bindings
            .iter()
            .filter(|b| !b.collapsible)
            .map(|b| b.value.table_key())
            .collect()
    }
}

/// Output of [`enumerate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub combinations: Vec<Combination>,
    /// Axes left after de-duplication, in first-occurrence order
    pub compact_axes: Vec<VariationAxis>,
}

/// Enumerate all combinations with the default options
pub fn enumerate(axes: &[VariationAxis]) -> FbtResult<Enumeration> {
    enumerate_with_options(axes, &EnumerateOptions::default())
}

/// Enumerate every combination of `axes` in input order.
///
/// The first axis varies slowest. Axes sharing kind and source identity with
/// an earlier axis are bound to the earlier axis's value.
///
/// # Arguments
/// * `axes` - Variation axes of the phrase, in source order
/// * `options` - Limits applied before any combination is built
///
/// # Returns
/// * `Ok(Enumeration)` - All combinations plus the de-duplicated axes
/// * `Err(FbtError::TooManyCombinations)` - If the product exceeds `options.max_combinations`
/// * `Err(FbtError)` - If two independent axes share a token or an enum axis
///   is reused with different keys
pub fn enumerate_with_options(
    axes: &[VariationAxis],
    options: &EnumerateOptions,
) -> FbtResult<Enumeration> {
    let compact_axes = compact_axes(axes);
    check_token_names(&compact_axes)?;

    let count = count_combinations(&compact_axes, options.max_combinations)?;
    if count > options.max_combinations {
        return Err(FbtError::TooManyCombinations {
            count,
            limit: options.max_combinations,
        });
    }

    let mut combinations = Vec::with_capacity(count);
    let mut used = HashMap::new();
    let mut current = Vec::with_capacity(axes.len());
    enumerate_recursive(axes, 0, &mut used, &mut current, &mut combinations)?;

    Ok(Enumeration {
        combinations,
        compact_axes,
    })
}

fn compact_axes(axes: &[VariationAxis]) -> Vec<VariationAxis> {
    let mut seen: Vec<(VariationKind, &str)> = Vec::new();
    let mut compact = Vec::new();
    for axis in axes {
        let identity = (axis.kind(), axis.source_identity());
        if !seen.contains(&identity) {
            seen.push(identity);
            compact.push(axis.clone());
        }
    }
    compact
}

/// Two independent axes may not render into the same placeholder
fn check_token_names(compact_axes: &[VariationAxis]) -> FbtResult<()> {
    let mut tokens: HashMap<&str, &str> = HashMap::new();
    for axis in compact_axes {
        let Some(token) = axis.token() else {
            continue;
        };
        match tokens.get(token) {
            Some(identity) if *identity != axis.source_identity() => {
                return Err(FbtError::DuplicateToken {
                    token: token.to_string(),
                });
            }
            _ => {
                tokens.insert(token, axis.source_identity());
            }
        }
    }
    Ok(())
}

/// Product of the candidate counts; an overflowing product is reported as
/// `usize::MAX` against `limit`
fn count_combinations(compact_axes: &[VariationAxis], limit: usize) -> FbtResult<usize> {
    let mut total = 1usize;
    for axis in compact_axes {
        total = total
            .checked_mul(axis.candidates().len())
            .ok_or(FbtError::TooManyCombinations {
                count: usize::MAX,
                limit,
            })?;
    }
    Ok(total)
}

type UsedValues<'a> = HashMap<(VariationKind, &'a str), AxisValue>;

fn enumerate_recursive<'a>(
    axes: &'a [VariationAxis],
    depth: usize,
    used: &mut UsedValues<'a>,
    current: &mut Vec<Binding>,
    results: &mut Vec<Combination>,
) -> FbtResult<()> {
    let Some(axis) = axes.get(depth) else {
        results.push(Combination {
            bindings: current.clone(),
        });
        return Ok(());
    };

    let identity = (axis.kind(), axis.source_identity());
    if let Some(value) = used.get(&identity).cloned() {
        if axis.kind() == VariationKind::Enum && !axis.accepts(&value) {
            return Err(FbtError::IncompatibleEnumReuse {
                identity: axis.source_identity().to_string(),
                key: value.table_key(),
                range: axis.candidates().iter().map(AxisValue::table_key).collect(),
            });
        }
        tracing::debug!(
            kind = %axis.kind(),
            identity = axis.source_identity(),
            value = %value,
            "collapsing repeated variation axis"
        );
        current.push(Binding {
            axis_index: depth,
            value,
            collapsible: true,
        });
        enumerate_recursive(axes, depth + 1, used, current, results)?;
        current.pop();
        return Ok(());
    }

    for candidate in axis.candidates() {
        used.insert(identity, candidate.clone());
        current.push(Binding {
            axis_index: depth,
            value: candidate.clone(),
            collapsible: false,
        });
        let outcome = enumerate_recursive(axes, depth + 1, used, current, results);
        current.pop();
        used.remove(&identity);
        outcome?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{GenderValue, NumberValue};
    use crate::variations::{Gender, NumberVariation};
    use proptest::prelude::*;

    fn genders() -> Vec<GenderValue> {
        vec![
            GenderValue::Gender(Gender::Male),
            GenderValue::Gender(Gender::Female),
            GenderValue::Gender(Gender::Unknown),
        ]
    }

    // ========== Basic Enumeration Tests ==========

    #[test]
    fn test_no_axes_single_combination() -> FbtResult<()> {
        let result = enumerate(&[])?;
        assert_eq!(result.combinations.len(), 1);
        assert!(result.combinations[0].key_path().is_empty());
        assert!(result.compact_axes.is_empty());
        Ok(())
    }

    #[test]
    fn test_cartesian_product_order() -> FbtResult<()> {
        let axes = vec![
            VariationAxis::gender("name", "user", &genders())?,
            VariationAxis::plural(Some("count"), "n", &[])?,
        ];
        let result = enumerate(&axes)?;
        let paths: Vec<Vec<String>> = result.combinations.iter().map(Combination::key_path).collect();
        assert_eq!(
            paths,
            vec![
                vec!["1", "*"],
                vec!["1", "_1"],
                vec!["2", "*"],
                vec!["2", "_1"],
                vec!["3", "*"],
                vec!["3", "_1"],
            ]
        );
        Ok(())
    }

    // ========== De-duplication Tests ==========

    #[test]
    fn test_same_identity_collapses() -> FbtResult<()> {
        let axes = vec![
            VariationAxis::plural(None, "A", &[])?,
            VariationAxis::plural(None, "A", &[])?,
        ];
        let result = enumerate(&axes)?;
        assert_eq!(result.combinations.len(), 2);
        assert_eq!(result.compact_axes.len(), 1);
        for combination in &result.combinations {
            let bindings = combination.bindings();
            assert_eq!(bindings.len(), 2);
            assert!(bindings[1].collapsible);
            assert_eq!(bindings[0].value, bindings[1].value);
            assert_eq!(combination.key_path().len(), 1);
        }
        Ok(())
    }

    #[test]
    fn test_same_identity_different_kind_is_independent() -> FbtResult<()> {
        let axes = vec![
            VariationAxis::plural(None, "x", &[])?,
            VariationAxis::enumeration("x", &["a", "b", "c"])?,
        ];
        let result = enumerate(&axes)?;
        assert_eq!(result.combinations.len(), 6);
        assert_eq!(result.compact_axes.len(), 2);
        Ok(())
    }

    #[test]
    fn test_compact_axes_first_occurrence_order() -> FbtResult<()> {
        let axes = vec![
            VariationAxis::enumeration("e", &["a", "b"])?,
            VariationAxis::plural(None, "n", &[])?,
            VariationAxis::enumeration("e", &["a", "b"])?,
        ];
        let result = enumerate(&axes)?;
        let kinds: Vec<VariationKind> = result.compact_axes.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec![VariationKind::Enum, VariationKind::Number]);
        assert_eq!(
            result.combinations[1].value_of(2),
            Some(&AxisValue::Enum("a".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_incompatible_enum_reuse() -> FbtResult<()> {
        let axes = vec![
            VariationAxis::enumeration("kind", &["groups", "photos"])?,
            VariationAxis::enumeration("kind", &["groups"])?,
        ];
        let err = enumerate(&axes).unwrap_err();
        assert!(matches!(
            err,
            FbtError::IncompatibleEnumReuse { ref key, .. } if key == "photos"
        ));
        Ok(())
    }

    #[test]
    fn test_duplicate_token_rejected() -> FbtResult<()> {
        let axes = vec![
            VariationAxis::gender("name", "viewer", &[GenderValue::Any])?,
            VariationAxis::gender("name", "owner", &[GenderValue::Any])?,
        ];
        assert!(matches!(
            enumerate(&axes),
            Err(FbtError::DuplicateToken { token }) if token == "name"
        ));
        Ok(())
    }

    // ========== Bound Tests ==========

    #[test]
    fn test_too_many_combinations() -> FbtResult<()> {
        let keys: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let axes = vec![
            VariationAxis::enumeration("a", &keys)?,
            VariationAxis::enumeration("b", &keys)?,
            VariationAxis::enumeration("c", &keys)?,
        ];
        let err = enumerate(&axes).unwrap_err();
        assert!(matches!(
            err,
            FbtError::TooManyCombinations { count: 1000, limit: 256 }
        ));
        let options = EnumerateOptions::default().with_max_combinations(1000);
        assert_eq!(enumerate_with_options(&axes, &options)?.combinations.len(), 1000);
        Ok(())
    }

    #[test]
    fn test_overflowing_product_reports_configured_limit() -> FbtResult<()> {
        let keys: Vec<String> = (0..300).map(|i| i.to_string()).collect();
        let axes = (0..8)
            .map(|i| VariationAxis::enumeration(format!("e{i}"), &keys))
            .collect::<FbtResult<Vec<_>>>()?;
        let options = EnumerateOptions::default().with_max_combinations(5000);
        let err = enumerate_with_options(&axes, &options).unwrap_err();
        assert!(matches!(
            err,
            FbtError::TooManyCombinations { count: usize::MAX, limit: 5000 }
        ));
        Ok(())
    }

    #[test]
    fn test_extended_number_keys() -> FbtResult<()> {
        let axes = vec![VariationAxis::plural(
            Some("count"),
            "n",
            &[NumberVariation::Zero, NumberVariation::Few],
        )?];
        let result = enumerate(&axes)?;
        let values: Vec<&AxisValue> = result
            .combinations
            .iter()
            .filter_map(|c| c.value_of(0))
            .collect();
        assert_eq!(
            values,
            vec![
                &AxisValue::Number(NumberValue::Any),
                &AxisValue::Number(NumberValue::Category(NumberVariation::Zero)),
                &AxisValue::Number(NumberValue::Category(NumberVariation::Few)),
                &AxisValue::Number(NumberValue::ExactlyOne),
            ]
        );
        Ok(())
    }

    // ========== Property Tests ==========

    fn enum_axis(identity: u8, size: usize) -> VariationAxis {
        let keys: Vec<String> = (0..size).map(|i| format!("k{}", i)).collect();
        VariationAxis::enumeration(format!("id{}", identity), &keys).unwrap()
    }

    proptest! {
        #[test]
        fn prop_duplicates_never_add_combinations(
            specs in proptest::collection::vec((0u8..4, 1usize..4), 0..5)
        ) {
            let axes: Vec<VariationAxis> = specs
                .iter()
                .map(|(id, size)| enum_axis(*id, *size))
                .collect();
            // re-used identities must keep the range of their first occurrence
            let axes: Vec<VariationAxis> = axes
                .iter()
                .map(|axis| {
                    axes.iter()
                        .find(|a| a.source_identity() == axis.source_identity())
                        .cloned()
                        .unwrap()
                })
                .collect();
            let result = enumerate(&axes).unwrap();
            let expected: usize = result
                .compact_axes
                .iter()
                .map(|a| a.candidates().len())
                .product();
            prop_assert_eq!(result.combinations.len(), expected);

            let mut doubled = axes.clone();
            doubled.extend(axes.iter().cloned());
            let again = enumerate(&doubled).unwrap();
            prop_assert_eq!(again.combinations.len(), result.combinations.len());
        }

        #[test]
        fn prop_enumeration_is_deterministic(
            specs in proptest::collection::vec((0u8..6, 1usize..4), 0..4)
        ) {
            let axes: Vec<VariationAxis> = specs
                .iter()
                .enumerate()
                .map(|(i, (_, size))| enum_axis(i as u8, *size))
                .collect();
            prop_assert_eq!(enumerate(&axes).unwrap(), enumerate(&axes).unwrap());
        }
    }
}
