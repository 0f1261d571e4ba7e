//! `CALL` argument lists: `name: value, name: value`.
//!
//! Splitting happens on commas outside of double quotes and brackets. A segment that
//! does not start with `name:` continues the value of the previous argument, so values
//! such as `"a, b"` or `max(x, y)` survive unchanged.

use crate::block::CallArg;
use itertools::Itertools;

/// Parses a flat argument list. A wrapping `{ ... }` is accepted and `{}` means empty.
/// Never fails; text before the first `name:` is dropped.
pub fn parse_arg_list(text: &str) -> Vec<CallArg> {
    let mut body = text.trim();
    if body.starts_with('{') && body.ends_with('}') {
        body = body[1..body.len() - 1].trim();
    }
    if body.is_empty() {
        return Vec::new();
    }

    let mut args: Vec<CallArg> = Vec::new();
    for segment in split_top_level(body) {
        match split_name(segment) {
            Some((name, value)) => args.push(CallArg::new(name, value)),
            None => match args.last_mut() {
                Some(prev) => {
                    prev.value.push(',');
                    prev.value.push_str(segment);
                }
                None => log::debug!("dropping argument text without a name: {:?}", segment),
            },
        }
    }

    for arg in &mut args {
        let trimmed = arg.value.trim();
        if trimmed.len() != arg.value.len() {
            arg.value = trimmed.to_string();
        }
    }
    args
}

/// Renders `name: value` pairs joined by `, `. The empty list renders as an empty string.
pub fn format_arg_list(args: &[CallArg]) -> String {
    args.iter()
        .map(|a| format!("{}: {}", a.name, a.value))
        .join(", ")
}

/// `ident:` at the start of a segment, returning `(ident, rest)`.
fn split_name(segment: &str) -> Option<(&str, &str)> {
    let trimmed = segment.trim_start();
    let end = trimmed
        .find(|c: char| !is_name_char(c))
        .unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    let (name, rest) = trimmed.split_at(end);
    let rest = rest.trim_start().strip_prefix(':')?;
    Some((name, rest))
}

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits on commas at bracket depth zero and outside `"..."`.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut in_quote = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
