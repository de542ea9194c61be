//! Tree assembler: one leaf per combination, keyed by the compact axes.

use crate::enumerate::{Combination, Enumeration};
use crate::error::FbtResult;
use crate::tree::{JsFbt, JsFbtLeaf, JsFbtTree};

/// Build the variation table of a phrase.
///
/// # Arguments
/// * `enumeration` - Combinations and compact axes from [`enumerate`](crate::enumerate)
/// * `render_leaf` - Produces the leaf text and description of one combination
///
/// # Returns
/// * `Ok(JsFbt)` - Metadata of every compact axis plus the nested table,
///   or a bare leaf when the phrase has no axes
/// * `Err(FbtError::DuplicateLeaf)` - If two combinations resolve to the same key path
/// * `Err(FbtError)` - Any error returned by `render_leaf`
pub fn assemble<F>(enumeration: &Enumeration, mut render_leaf: F) -> FbtResult<JsFbt>
where
    F: FnMut(&Combination) -> FbtResult<JsFbtLeaf>,
{
    let metadata = enumeration
        .compact_axes
        .iter()
        .map(|axis| Some(axis.metadata()))
        .collect();

    if enumeration.compact_axes.is_empty() {
        let tree = match enumeration.combinations.first() {
            Some(combination) => JsFbtTree::Leaf(render_leaf(combination)?),
            None => JsFbtTree::Leaf(render_leaf(&Combination::default())?),
        };
        return Ok(JsFbt { m: metadata, t: tree });
    }

    let mut tree = JsFbtTree::new_branch();
    for combination in &enumeration.combinations {
        let leaf = render_leaf(combination)?;
        tree.add_leaf(&combination.key_path(), leaf)?;
    }
    Ok(JsFbt { m: metadata, t: tree })
}
