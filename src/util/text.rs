//! Text primitives shared by the parser and the exporters.
//!
//! Everything here works on plain `&str` and never allocates unless it has
//! to return an owned value.

/// Check whether `s` starts with `prefix`.
///
/// Section keywords are matched case-insensitively while quoted literal
/// values are compared exactly, so the caller picks per use site.
pub fn starts_with(s: &str, prefix: &str, case_sensitive: bool) -> bool {
    match s.as_bytes().get(..prefix.len()) {
        Some(head) if case_sensitive => head == prefix.as_bytes(),
        Some(head) => head.eq_ignore_ascii_case(prefix.as_bytes()),
        None => false,
    }
}

/// Check whether `s` ends with `suffix`.
pub fn ends_with(s: &str, suffix: &str, case_sensitive: bool) -> bool {
    if suffix.len() > s.len() {
        return false;
    }

    let tail = &s.as_bytes()[s.len() - suffix.len()..];

    if case_sensitive {
        tail == suffix.as_bytes()
    } else {
        tail.eq_ignore_ascii_case(suffix.as_bytes())
    }
}

/// True when `s` is at least two characters long and wrapped in `"`.
pub fn in_quotes(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('"') && s.ends_with('"')
}

/// Strip one pair of surrounding double quotes, if present.
pub fn strip_quotes(s: &str) -> Option<&str> {
    if in_quotes(s) {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

/// Split a `key=value` data line on the first `=`.
///
/// A value wrapped in double quotes has them removed. Embedded or
/// unbalanced quotes are passed through untouched.
pub fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;

    Some((key, strip_quotes(value).unwrap_or(value)))
}

/// Extract `value` from a token shaped like `<flag>"<value>"`, e.g. `-i"../inc"`.
pub fn flag_with_quoted_value<'a>(token: &'a str, flag: &str) -> Option<&'a str> {
    let rest = token.strip_prefix(flag)?;

    strip_quotes(rest)
}

/// Build a `<flag><value>` token, optionally quoting the value.
pub fn to_option(flag: &str, value: &str, quote: bool) -> String {
    if quote {
        format!("{}\"{}\"", flag, value)
    } else {
        format!("{}{}", flag, value)
    }
}

/// Join tokens with a single separator character.
///
/// An empty sequence joins to an empty string.
pub fn join<I, S>(tokens: I, sep: char) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = String::new();

    for (i, token) in tokens.into_iter().enumerate() {
        if i > 0 {
            result.push(sep);
        }
        result.push_str(token.as_ref());
    }

    result
}

/// Split on a separator character. An empty string yields no tokens.
pub fn split(s: &str, sep: char) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    s.split(sep).map(str::to_string).collect()
}

/// Return the text between the first `from` and the next `to` after it.
pub fn between<'a>(s: &'a str, from: &str, to: &str) -> Option<&'a str> {
    let start = s.find(from)? + from.len();
    let len = s[start..].find(to)?;

    Some(&s[start..start + len])
}

/// Normalize Windows path separators to forward slashes.
pub fn fix_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Final path segment, accepting both `/` and `\` as separators.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Drop the final `.ext` of a file name, if there is one.
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}
