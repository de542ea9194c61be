//! Token alias substitution.

use std::collections::BTreeMap;

/// `{name}` placeholder pattern of a token
pub fn token_pattern(token: &str) -> String {
    format!("{{{}}}", token)
}

/// Replace clear token placeholders with their aliases.
///
/// A phrase may not repeat an implicit token name, so only the first
/// occurrence of each clear placeholder is replaced.
pub fn replace_clear_tokens_with_aliases(text: &str, aliases: &BTreeMap<String, String>) -> String {
    aliases
        .iter()
        .fold(text.to_string(), |mangled, (clear, alias)| {
            mangled.replacen(&token_pattern(clear), &token_pattern(alias), 1)
        })
}
