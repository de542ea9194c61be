//! Content hashing of leaves and phrases.
//!
//! Leaf hashes are the join key between extracted phrases and translation
//! stores, so the extraction and resolution stages must use the same
//! [`PatternHasher`]. Every hasher carries a version string. A store built
//! with one version cannot be read with another.

use crate::error::FbtResult;
use crate::tree::JsFbtTree;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

/// Content digest of a leaf's `(text, desc)` pair
pub type PatternHash = String;

/// Stable leaf hash function
pub trait PatternHasher {
    /// Identifier of the algorithm and its input framing
    fn version(&self) -> &'static str;

    fn hash(&self, text: &str, desc: &str) -> PatternHash;
}

/// Shipped leaf hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    /// SHA-256 of the framed input, standard base64 with padding
    #[default]
    Sha256Base64,
    /// Jenkins one-at-a-time of the framed input, base 62
    JenkinsBase62,
}

impl PatternHasher for HashAlgorithm {
    fn version(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256Base64 => "sha256-b64/1",
            HashAlgorithm::JenkinsBase62 => "jenkins-b62/1",
        }
    }

    fn hash(&self, text: &str, desc: &str) -> PatternHash {
        let input = frame_leaf(text, desc);
        match self {
            HashAlgorithm::Sha256Base64 => STANDARD.encode(Sha256::digest(input.as_bytes())),
            HashAlgorithm::JenkinsBase62 => to_base62(jenkins_hash(input.as_bytes())),
        }
    }
}

/// JSON array framing keeps `("ab", "c")` and `("a", "bc")` apart
fn frame_leaf(text: &str, desc: &str) -> String {
    json!([text, desc]).to_string()
}

/// Jenkins one-at-a-time hash over UTF-8 bytes; empty input hashes to 0
pub fn jenkins_hash(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0;
    for &byte in bytes {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}

const BASE62_SYMBOLS: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn to_base62(mut number: u32) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(BASE62_SYMBOLS[(number % 62) as usize]);
        number /= 62;
        if number == 0 {
            break;
        }
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Key identifying a whole phrase table in resolver output.
///
/// When every leaf shares one description, the description is hashed once
/// after the table and leaves contribute only their text (and aliases).
pub fn phrase_hash_key(tree: &JsFbtTree) -> FbtResult<String> {
    let leaves = tree.leaves();
    let shared_desc = match leaves.split_first() {
        Some((first, rest)) if rest.iter().all(|leaf| leaf.desc == first.desc) => {
            Some(first.desc.as_str())
        }
        _ => None,
    };

    let key = match shared_desc {
        Some(desc) => {
            let input = tree.try_map_leaves(&mut |leaf| {
                Ok(if leaf.token_aliases.is_empty() {
                    Value::String(leaf.text.clone())
                } else {
                    json!({"text": leaf.text, "tokenAliases": leaf.token_aliases})
                })
            })?;
            format!("{}|{}", serde_json::to_string(&input)?, desc)
        }
        None => {
            let input = tree.try_map_leaves(&mut |leaf| {
                Ok(if leaf.token_aliases.is_empty() {
                    json!({"desc": leaf.desc, "text": leaf.text})
                } else {
                    json!({"desc": leaf.desc, "text": leaf.text, "tokenAliases": leaf.token_aliases})
                })
            })?;
            serde_json::to_string(&input)?
        }
    };
    Ok(to_base62(jenkins_hash(key.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::JsFbtLeaf;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(61, "Z")]
    #[case(62, "10")]
    #[case(u32::MAX, "4GFfc3")]
    fn test_base62(#[case] number: u32, #[case] expected: &str) {
        assert_eq!(to_base62(number), expected);
    }

    #[test]
    fn test_jenkins_known_values() {
        assert_eq!(jenkins_hash(b""), 0);
        // reference value of the one-at-a-time hash
        assert_eq!(jenkins_hash(b"a"), 0xca2e9442);
    }

    #[rstest]
    #[case(HashAlgorithm::Sha256Base64, "sha256-b64/1")]
    #[case(HashAlgorithm::JenkinsBase62, "jenkins-b62/1")]
    fn test_hash_stability(#[case] algorithm: HashAlgorithm, #[case] version: &str) {
        assert_eq!(algorithm.version(), version);
        let hash = algorithm.hash("Hello", "greet");
        assert_eq!(hash, algorithm.hash("Hello", "greet"));
        assert_ne!(hash, algorithm.hash("Hello!", "greet"));
        assert_ne!(hash, algorithm.hash("Hello", "greeting"));
        // framing separates text from description
        assert_ne!(algorithm.hash("ab", "c"), algorithm.hash("a", "bc"));
    }

    #[test]
    fn test_sha256_shape() {
        let hash = HashAlgorithm::Sha256Base64.hash("Hello", "greet");
        assert_eq!(hash.len(), 44);
        assert!(hash.ends_with('='));
    }

    #[test]
    fn test_algorithm_serde() {
        assert_eq!(
            serde_json::to_string(&HashAlgorithm::JenkinsBase62).unwrap(),
            "\"jenkins-base62\""
        );
        assert_eq!(
            serde_json::from_str::<HashAlgorithm>("\"sha256-base64\"").unwrap(),
            HashAlgorithm::Sha256Base64
        );
    }

    #[test]
    fn test_phrase_hash_key_uses_shared_description() -> FbtResult<()> {
        let leaf = JsFbtTree::Leaf(JsFbtLeaf::new("Hello", "greet"));
        let expected = to_base62(jenkins_hash(b"\"Hello\"|greet"));
        assert_eq!(phrase_hash_key(&leaf)?, expected);
        Ok(())
    }

    #[test]
    fn test_phrase_hash_key_mixed_descriptions() -> FbtResult<()> {
        let mut tree = JsFbtTree::new_branch();
        tree.add_leaf(&["*".to_string()], JsFbtLeaf::new("a", "x"))?;
        tree.add_leaf(&["_1".to_string()], JsFbtLeaf::new("b", "y"))?;
        let input = r#"{"*":{"desc":"x","text":"a"},"_1":{"desc":"y","text":"b"}}"#;
        assert_eq!(phrase_hash_key(&tree)?, to_base62(jenkins_hash(input.as_bytes())));
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_leaf_hash_is_content_only(text in ".{0,20}", desc in ".{0,20}") {
            for algorithm in [HashAlgorithm::Sha256Base64, HashAlgorithm::JenkinsBase62] {
                prop_assert_eq!(algorithm.hash(&text, &desc), algorithm.hash(&text, &desc));
            }
        }
    }
}
