//! JSON Pointer (RFC 6901).
//!
//! "": корень документа; иначе путь начинается с '/', токены экранируются
//! как "~0" ('~') и "~1" ('/').

/// Escape a single reference token.
pub fn escape(token: &str) -> String {
    if !token.contains(['~', '/']) {
        return token.to_string();
    }
    token.replace('~', "~0").replace('/', "~1")
}

/// Append an escaped token to a pointer.
pub fn join(base: &str, token: &str) -> String {
    let mut out = String::with_capacity(base.len() + token.len() + 1);
    out.push_str(base);
    out.push('/');
    out.push_str(&escape(token));
    out
}

/// Split a pointer into unescaped tokens. None if it does not start with '/'
/// (and is not the root "").
pub fn parse(pointer: &str) -> Option<Vec<String>> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    let rest = pointer.strip_prefix('/')?;
    Some(rest.split('/').map(unescape).collect())
}

fn unescape(token: &str) -> String {
    if !token.contains('~') {
        return token.to_string();
    }
    // порядок важен: "~01" → "~1", а не "/"
    token.replace("~1", "/").replace("~0", "~")
}

/// Array index token: decimal without leading zeros. "-" is handled by callers.
pub fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
