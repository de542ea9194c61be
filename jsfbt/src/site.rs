//! Phrase sites: a phrase's table with leaves replaced by their hashes.

use crate::error::{FbtError, FbtResult};
use crate::hash::{PatternHash, PatternHasher};
use crate::metadata::AxisMetadata;
use crate::tree::{JsFbt, JsFbtTree};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Text and description behind a pattern hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashedLeaf {
    pub text: String,
    #[serde(alias = "description")]
    pub desc: String,
}

impl HashedLeaf {
    pub fn new(text: impl Into<String>, desc: impl Into<String>) -> Self {
        HashedLeaf {
            text: text.into(),
            desc: desc.into(),
        }
    }
}

/// Hash of every distinct leaf of a table
pub fn hash_leaves<H: PatternHasher + ?Sized>(
    tree: &JsFbtTree,
    hasher: &H,
) -> BTreeMap<PatternHash, HashedLeaf> {
    let mut hash_to_leaf = BTreeMap::new();
    tree.on_each_leaf(&mut |leaf| {
        hash_to_leaf.insert(
            hasher.hash(&leaf.text, &leaf.desc),
            HashedLeaf::new(leaf.text.clone(), leaf.desc.clone()),
        );
    });
    hash_to_leaf
}

/// Everything the resolver needs to know about one phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseSite {
    hash_to_leaf: BTreeMap<PatternHash, HashedLeaf>,
    table: JsFbtTree<PatternHash>,
    metadata: Vec<Option<AxisMetadata>>,
    project: String,
    hash_to_token_aliases: BTreeMap<PatternHash, BTreeMap<String, String>>,
}

impl PhraseSite {
    /// Rebuild a site from collected output, trusting `hash_to_leaf` for
    /// the hash of every `(text, desc)` pair
    pub fn from_scan(
        hash_to_leaf: BTreeMap<PatternHash, HashedLeaf>,
        jsfbt: &JsFbt,
        project: impl Into<String>,
    ) -> FbtResult<Self> {
        let mut leaf_to_hash: HashMap<&HashedLeaf, &PatternHash> = HashMap::new();
        for (hash, leaf) in &hash_to_leaf {
            if let Some(existing) = leaf_to_hash.insert(leaf, hash) {
                return Err(FbtError::InvalidPhrase(format!(
                    "duplicate text+desc pair {:?} points to hashes `{}` and `{}`",
                    leaf, existing, hash
                )));
            }
        }

        let mut hash_to_token_aliases = BTreeMap::new();
        let table = jsfbt.t.try_map_leaves(&mut |leaf| {
            let key = HashedLeaf::new(leaf.text.clone(), leaf.desc.clone());
            let hash = leaf_to_hash.get(&key).ok_or_else(|| {
                FbtError::InvalidPhrase(format!(
                    "no hash for leaf `{}` ({})",
                    leaf.text, leaf.desc
                ))
            })?;
            if !leaf.token_aliases.is_empty() {
                hash_to_token_aliases.insert((*hash).clone(), leaf.token_aliases.clone());
            }
            Ok((*hash).clone())
        })?;

        Ok(PhraseSite {
            table,
            metadata: jsfbt.m.clone(),
            project: project.into(),
            hash_to_token_aliases,
            hash_to_leaf,
        })
    }

    /// Build a site by hashing the leaves of `jsfbt`
    pub fn from_jsfbt<H: PatternHasher + ?Sized>(
        jsfbt: &JsFbt,
        project: impl Into<String>,
        hasher: &H,
    ) -> FbtResult<Self> {
        Self::from_scan(hash_leaves(&jsfbt.t, hasher), jsfbt, project)
    }

    pub fn hash_to_leaf(&self) -> &BTreeMap<PatternHash, HashedLeaf> {
        &self.hash_to_leaf
    }

    pub fn table(&self) -> &JsFbtTree<PatternHash> {
        &self.table
    }

    pub fn metadata(&self) -> &[Option<AxisMetadata>] {
        &self.metadata
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn token_aliases(&self, hash: &str) -> Option<&BTreeMap<String, String>> {
        self.hash_to_token_aliases.get(hash)
    }

    /// Source text of a leaf hash
    pub fn source_text(&self, hash: &str) -> Option<&str> {
        self.hash_to_leaf.get(hash).map(|leaf| leaf.text.as_str())
    }
}
