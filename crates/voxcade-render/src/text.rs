//! Free text to word sequence.

use std::collections::HashSet;

use voxcade_archive::archive::fold_case;

/// Characters that separate words in free text.
pub const WORD_SEPARATORS: [char; 10] = [' ', ',', '.', '!', '?', ';', ':', '\t', '\r', '\n'];

/// Splits `text` into lower-cased words that exist in `available`.
///
/// Matching against `available` ignores case. Unknown tokens are dropped and
/// the order of the remaining tokens is preserved.
pub fn sentence_from_text<I, S>(text: &str, available: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if text.trim().is_empty() {
        return Vec::new();
    }

    let known: HashSet<String> = available
        .into_iter()
        .map(|word| fold_case(word.as_ref()))
        .collect();

    text.split(WORD_SEPARATORS)
        .filter(|token| !token.is_empty())
        .map(fold_case)
        .filter(|token| known.contains(token))
        .collect()
}
