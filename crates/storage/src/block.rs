//! Locates a named object-literal declaration (`const name = {...};`) in a
//! page's inline script.

const DECLARATION_KEYWORDS: [&str; 3] = ["const", "let", "var"];

/// Byte range of the object literal, from its `{` to one past its `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
}

impl BlockSpan {
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Finds the first `const|let|var <name> = {` and its matching close brace.
pub fn find_block(source: &str, name: &str) -> Option<BlockSpan> {
    for (at, _) in source.match_indices(name) {
        if !is_declared_at(source, at) {
            continue;
        }
        let after = at + name.len();
        if source[after..].chars().next().is_some_and(is_ident_char) {
            continue;
        }
        let rest = source[after..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let literal = rest.trim_start();
        if !literal.starts_with('{') {
            continue;
        }
        let start = source.len() - literal.len();
        if let Some(end) = matching_brace(source, start) {
            return Some(BlockSpan { start, end });
        }
    }
    None
}

/// Returns `source` with the literal at `span` swapped for `literal`.
pub fn splice(source: &str, span: BlockSpan, literal: &str) -> String {
    let mut out = String::with_capacity(source.len() + literal.len());
    out.push_str(&source[..span.start]);
    out.push_str(literal);
    out.push_str(&source[span.end..]);
    out
}

fn is_declared_at(source: &str, at: usize) -> bool {
    let before = &source[..at];
    let trimmed = before.trim_end();
    if trimmed.len() == before.len() {
        // Keyword and name must be separated by whitespace.
        return false;
    }
    DECLARATION_KEYWORDS.iter().any(|kw| {
        trimmed.ends_with(kw)
            && !trimmed[..trimmed.len() - kw.len()]
                .chars()
                .next_back()
                .is_some_and(is_ident_char)
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Brace matcher aware of string literals and comments.
fn matching_brace(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}
