//! The JSFBT tree: nested variation keys ending in leaves.

use crate::error::{FbtError, FbtResult};
use crate::metadata::AxisMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rendered text of one combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsFbtLeaf {
    pub text: String,
    #[serde(alias = "description")]
    pub desc: String,
    /// Clear token name -> internal alias used in the rendered text
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub token_aliases: BTreeMap<String, String>,
    /// Token under which an inner string is embedded in its parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_token_name: Option<String>,
}

impl JsFbtLeaf {
    pub fn new(text: impl Into<String>, desc: impl Into<String>) -> Self {
        JsFbtLeaf {
            text: text.into(),
            desc: desc.into(),
            token_aliases: BTreeMap::new(),
            outer_token_name: None,
        }
    }

    pub fn with_token_alias(mut self, clear: &str, alias: &str) -> Self {
        self.token_aliases.insert(clear.to_string(), alias.to_string());
        self
    }
}

/// Either a leaf or a map from variation key to subtree.
///
/// Branch keys are kept sorted so the serialized table is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsFbtTree<L = JsFbtLeaf> {
    Leaf(L),
    Branch(BTreeMap<String, JsFbtTree<L>>),
}

impl<L> JsFbtTree<L> {
    pub fn new_branch() -> Self {
        JsFbtTree::Branch(BTreeMap::new())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, JsFbtTree::Leaf(_))
    }

    /// Insert `leaf` at `path`, creating intermediate branches on demand.
    ///
    /// Reaching an occupied terminal key, or passing through a leaf, is a
    /// [`FbtError::DuplicateLeaf`].
    pub fn add_leaf(&mut self, path: &[String], leaf: L) -> FbtResult<()> {
        let Some((last, parents)) = path.split_last() else {
            return Err(FbtError::DuplicateLeaf { path: Vec::new() });
        };
        let mut node = self;
        for key in parents {
            let JsFbtTree::Branch(children) = node else {
                return Err(FbtError::DuplicateLeaf {
                    path: path.to_vec(),
                });
            };
            node = children
                .entry(key.clone())
                .or_insert_with(JsFbtTree::new_branch);
        }
        let JsFbtTree::Branch(children) = node else {
            return Err(FbtError::DuplicateLeaf {
                path: path.to_vec(),
            });
        };
        if children.contains_key(last) {
            return Err(FbtError::DuplicateLeaf {
                path: path.to_vec(),
            });
        }
        children.insert(last.clone(), JsFbtTree::Leaf(leaf));
        Ok(())
    }

    /// Visit every leaf in key order
    pub fn on_each_leaf<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a L),
    {
        match self {
            JsFbtTree::Leaf(leaf) => f(leaf),
            JsFbtTree::Branch(children) => {
                for child in children.values() {
                    child.on_each_leaf(f);
                }
            }
        }
    }

    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.on_each_leaf(&mut |leaf| out.push(leaf));
        out
    }

    /// Rebuild the tree with the same shape and converted leaves
    pub fn try_map_leaves<M, F>(&self, f: &mut F) -> FbtResult<JsFbtTree<M>>
    where
        F: FnMut(&L) -> FbtResult<M>,
    {
        match self {
            JsFbtTree::Leaf(leaf) => Ok(JsFbtTree::Leaf(f(leaf)?)),
            JsFbtTree::Branch(children) => {
                let mut mapped = BTreeMap::new();
                for (key, child) in children {
                    mapped.insert(key.clone(), child.try_map_leaves(f)?);
                }
                Ok(JsFbtTree::Branch(mapped))
            }
        }
    }

    /// Number of branch levels down the first path
    pub fn depth(&self) -> usize {
        match self {
            JsFbtTree::Leaf(_) => 0,
            JsFbtTree::Branch(children) => {
                1 + children.values().next().map_or(0, JsFbtTree::depth)
            }
        }
    }
}

/// A phrase's variation table plus its per-level metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsFbt {
    pub m: Vec<Option<AxisMetadata>>,
    pub t: JsFbtTree,
}

impl JsFbt {
    pub fn metadata(&self) -> &[Option<AxisMetadata>] {
        &self.m
    }

    pub fn tree(&self) -> &JsFbtTree {
        &self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_add_leaf_creates_branches() -> FbtResult<()> {
        let mut tree: JsFbtTree<&str> = JsFbtTree::new_branch();
        tree.add_leaf(&path(&["*", "_1"]), "a")?;
        tree.add_leaf(&path(&["*", "*"]), "b")?;
        tree.add_leaf(&path(&["1", "*"]), "c")?;
        assert_eq!(tree.leaves(), vec![&"b", &"a", &"c"]);
        assert_eq!(tree.depth(), 2);
        Ok(())
    }

    #[test]
    fn test_add_leaf_rejects_overwrite() -> FbtResult<()> {
        let mut tree: JsFbtTree<&str> = JsFbtTree::new_branch();
        tree.add_leaf(&path(&["*", "_1"]), "a")?;
        let err = tree.add_leaf(&path(&["*", "_1"]), "b").unwrap_err();
        assert!(matches!(err, FbtError::DuplicateLeaf { path } if path == ["*", "_1"]));
        // nothing was merged
        assert_eq!(tree.leaves(), vec![&"a"]);
        Ok(())
    }

    #[test]
    fn test_add_leaf_through_leaf_rejected() -> FbtResult<()> {
        let mut tree: JsFbtTree<&str> = JsFbtTree::new_branch();
        tree.add_leaf(&path(&["*"]), "a")?;
        assert!(tree.add_leaf(&path(&["*", "_1"]), "b").is_err());
        Ok(())
    }

    #[test]
    fn test_leaf_serialization() {
        let leaf = JsFbtLeaf::new("{name} liked this", "like").with_token_alias("name", "=m0");
        assert_eq!(
            serde_json::to_value(&leaf).unwrap(),
            json!({"text": "{name} liked this", "desc": "like", "tokenAliases": {"name": "=m0"}})
        );
        let parsed: JsFbtLeaf =
            serde_json::from_value(json!({"text": "hi", "description": "greet"})).unwrap();
        assert_eq!(parsed, JsFbtLeaf::new("hi", "greet"));
    }

    #[test]
    fn test_tree_deserialization() {
        let tree: JsFbtTree = serde_json::from_value(json!({
            "*": {"text": "many", "desc": "d"},
            "_1": {"text": "one", "desc": "d"}
        }))
        .unwrap();
        let texts: Vec<&str> = tree.leaves().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["many", "one"]);

        let bare: JsFbtTree = serde_json::from_value(json!({"text": "hi", "desc": "d"})).unwrap();
        assert!(bare.is_leaf());
    }

    #[test]
    fn test_try_map_leaves_keeps_shape() -> FbtResult<()> {
        let mut tree: JsFbtTree<u32> = JsFbtTree::new_branch();
        tree.add_leaf(&path(&["a", "b"]), 1)?;
        tree.add_leaf(&path(&["c", "d"]), 2)?;
        let mapped = tree.try_map_leaves(&mut |n| Ok(n.to_string()))?;
        assert_eq!(
            serde_json::to_value(&mapped).unwrap(),
            json!({"a": {"b": "1"}, "c": {"d": "2"}})
        );
        Ok(())
    }
}
