//! Quote-aware tokenizer for chat command arguments.
//!
//! Commands such as
//! `add NinjaPanel 'Internal Tools' 'Internal Tools' 'https://x' 'np ninja'`
//! need multi-word positional arguments, so a plain space split is not enough.
//! A token is one of:
//!
//! - a maximal run of characters that are neither whitespace nor quotes;
//! - a double-quoted span `"..."`;
//! - a single-quoted span `'...'`.
//!
//! A quote with no closing partner of the same kind is dropped. Every `"` and
//! `'` left inside a token is removed afterwards, so `"it's"` becomes `its`.
//! There is no escaping.

use tracing::debug;

const DOUBLE_QUOTE: char = '"';
const SINGLE_QUOTE: char = '\'';

/// Split `input` into positional tokens.
///
/// # Examples
/// ```
/// use ownerbot::domain::tokenize;
///
/// let tokens = tokenize("delete 'Ninja Panel' now");
/// assert_eq!(tokens, vec!["delete", "Ninja Panel", "now"]);
/// assert!(tokenize("").is_empty());
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        let Some(first) = rest.chars().next() else {
            break;
        };

        if is_quote(first) {
            let (_, after_open) = rest.split_at(first.len_utf8());
            match after_open.find(first) {
                Some(close) => {
                    let (span, tail) = after_open.split_at(close);
                    tokens.push(strip_quotes(span));
                    let (_, after_close) = tail.split_at(first.len_utf8());
                    rest = after_close;
                }
                None => rest = after_open,
            }
            continue;
        }

        let end = rest
            .find(|c: char| c.is_whitespace() || is_quote(c))
            .unwrap_or(rest.len());
        let (word, tail) = rest.split_at(end);
        tokens.push(word.to_owned());
        rest = tail;
    }

    debug!(input, token_count = tokens.len(), "tokenized command arguments");
    tokens
}

const fn is_quote(c: char) -> bool {
    matches!(c, DOUBLE_QUOTE | SINGLE_QUOTE)
}

fn strip_quotes(span: &str) -> String {
    span.chars().filter(|c| !is_quote(*c)).collect()
}
