//! RFC-6901 JSON pointers for navigating nested constant structures.

/// A compiled JSON pointer.
///
/// The empty pointer addresses the root. Every other pointer is a sequence
/// of `/`-separated reference tokens with `~0`/`~1` escapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum JsonPointerError {
    #[error("json pointer must be empty or start with '/'")]
    MissingLeadingSlash,
    #[error("invalid escape `~{0}`; only `~0` and `~1` are defined")]
    InvalidEscape(char),
    #[error("`~` at end of reference token")]
    TrailingTilde,
}

impl JsonPointer {
    pub fn parse(text: &str) -> Result<Self, JsonPointerError> {
        if text.is_empty() {
            return Ok(Self { tokens: Vec::new() });
        }
        let rest = text
            .strip_prefix('/')
            .ok_or(JsonPointerError::MissingLeadingSlash)?;
        let tokens = rest
            .split('/')
            .map(unescape_token)
            .collect::<Result<_, _>>()?;
        Ok(Self { tokens })
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

fn unescape_token(raw: &str) -> Result<String, JsonPointerError> {
    if !raw.contains('~') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some(other) => return Err(JsonPointerError::InvalidEscape(other)),
            None => return Err(JsonPointerError::TrailingTilde),
        }
    }
    Ok(out)
}

/// An array-index reference token: decimal digits without a superfluous
/// leading zero.
pub(crate) fn parse_array_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
