// Command-line tokenization
//
// Splits a raw command line into argument tokens. Double-quoted spans survive
// as a single token with the quotes stripped, so paths with spaces stay whole.

use once_cell::sync::Lazy;
use regex::Regex;

// A token is a maximal run of non-whitespace/non-quote characters, or a
// double-quote-delimited span. Embedded quote escaping is not supported;
// an unclosed quote falls out of the match and its contents split on
// whitespace like any unquoted text.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\s"]+|"[^"]*""#).expect("token pattern must compile"));

/// Split a command line into argument tokens
pub fn tokenize(command_line: &str) -> Vec<String> {
    TOKEN_PATTERN
        .find_iter(command_line)
        .map(|m| strip_quotes(m.as_str()))
        .collect()
}

/// Strip a single pair of enclosing double quotes, if present
fn strip_quotes(token: &str) -> String {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        token[1..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}
