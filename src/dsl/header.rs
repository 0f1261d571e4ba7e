//! Document headers (`RULE ... {`, `ON ...`, `ACTION ... {`, `DESCRIPTION: ...`).
//!
//! Headers carry [`EditorMeta`], which the host normally supplies. The tree parser only
//! needs to recognise these lines; [`parse_meta`] reads them back for tools that have
//! nothing but the text.

use super::patterns::unescape;
use super::{ActionParameter, DslMode, EditorMeta, TriggerSpec};
use regex::Regex;
use std::sync::LazyLock;

static RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^RULE\s+(?P<name>.+?)\s+PRIORITY\s+(?P<priority>-?\d+)\s*\{$")
        .expect("valid RULE header pattern")
});

static ON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ON\s+(?P<kind>\w+)\s*\(\s*(?P<entity>[^.)\s]*)(?:\.(?P<property>[^)\s]*))?\s*\)$")
        .expect("valid ON header pattern")
});

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^ACTION\s+(?P<entity>[^.\s]+)\.(?P<name>[^(]+?)\s*(?:\((?P<params>.*)\))?\s*\{$",
    )
    .expect("valid ACTION header pattern")
});

static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^DESCRIPTION\s*:\s*"(?P<text>.*)"$"#).expect("valid DESCRIPTION pattern")
});

/// Whether a trimmed line is part of the document header for `mode`.
pub(crate) fn is_header_line(line: &str, mode: DslMode) -> bool {
    match mode {
        DslMode::Rule => RULE_RE.is_match(line) || ON_RE.is_match(line),
        DslMode::Action => ACTION_RE.is_match(line) || DESCRIPTION_RE.is_match(line),
    }
}

/// Reads the header of `text` back into [`EditorMeta`].
///
/// Returns `None` when the opening `RULE`/`ACTION` line is missing. Only the first
/// occurrence of each header line is used.
pub fn parse_meta(text: &str, mode: DslMode) -> Option<EditorMeta> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("//"))
        .collect();

    match mode {
        DslMode::Rule => {
            let caps = lines.iter().copied().find_map(|l| RULE_RE.captures(l))?;
            let trigger = lines.iter().copied().find_map(|l| ON_RE.captures(l)).map(|on| {
                let property = on
                    .name("property")
                    .map(|m| m.as_str().to_string())
                    .filter(|p| !p.is_empty());
                TriggerSpec {
                    kind: on["kind"].to_string(),
                    entity: on["entity"].to_string(),
                    property,
                }
            });
            Some(EditorMeta {
                name: caps["name"].to_string(),
                priority: caps["priority"].parse().ok(),
                trigger,
                ..EditorMeta::default()
            })
        }
        DslMode::Action => {
            let caps = lines.iter().copied().find_map(|l| ACTION_RE.captures(l))?;
            let parameters = caps
                .name("params")
                .map(|m| parse_parameters(m.as_str()))
                .unwrap_or_default();
            let description = lines
                .iter()
                .copied()
                .find_map(|l| DESCRIPTION_RE.captures(l))
                .map(|d| unescape(&d["text"]));
            Some(EditorMeta {
                name: caps["name"].to_string(),
                entity_type: Some(caps["entity"].to_string()),
                description,
                parameters,
                ..EditorMeta::default()
            })
        }
    }
}

fn parse_parameters(text: &str) -> Vec<ActionParameter> {
    text.split(',')
        .filter_map(|part| {
            let (name, ty) = part.split_once(':')?;
            let name = name.trim();
            let ty = ty.trim();
            if name.is_empty() || ty.is_empty() {
                return None;
            }
            Some(match ty.strip_suffix('?') {
                Some(base) => ActionParameter::optional(name, base.trim()),
                None => ActionParameter::required(name, ty),
            })
        })
        .collect()
}
