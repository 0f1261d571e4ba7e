//! Fixed surface forms recognised by the parser, one regex per line shape.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static SET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^SET\s+(?P<target>[^=]+?)\s*=\s*(?P<value>.*?)\s*;?$").expect("valid SET pattern")
});

static TRIGGER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^TRIGGER\s+(?P<entity>[^\s.]+)\.(?P<action>\S+?)\s+ON\s+(?P<target>.*?)\s*;?$",
    )
    .expect("valid TRIGGER pattern")
});

static FOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^FOR\s*\(\s*(?P<var>[^:\s]+)\s*:\s*(?P<entity>[^\s)]+)(?:\s+WHERE\s+(?P<cond>.*?))?\s*\)\s*\{$",
    )
    .expect("valid FOR pattern")
});

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^CALL\s+(?:"(?P<qprod>[^"]*)"|(?P<prod>[\w$.\-]+?))\.(?P<method>\w+)\s*\((?P<args>.*)\)\s*;?$"#,
    )
    .expect("valid CALL pattern")
});

static PRECONDITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PRECONDITION\s+(?P<label>[^:\s]+)\s*:\s*(?P<cond>.*)$")
        .expect("valid PRECONDITION pattern")
});

static ON_FAILURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^ON_FAILURE\s*:\s*"(?P<msg>.*)"\s*;?$"#).expect("valid ON_FAILURE pattern")
});

static EFFECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^EFFECT\s*\{$").expect("valid EFFECT pattern"));

/// A classified source line. Borrowed slices point into the trimmed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Line<'a> {
    Set {
        target: &'a str,
        value: &'a str,
    },
    Trigger {
        entity: &'a str,
        action: &'a str,
        target: &'a str,
    },
    ForOpen {
        variable: &'a str,
        entity: &'a str,
        conditions: Option<&'a str>,
    },
    Call {
        product: &'a str,
        method: &'a str,
        args: &'a str,
    },
    Precondition {
        label: &'a str,
        conditions: &'a str,
    },
    OnFailure {
        message: String,
    },
    Effect,
    Close,
    Unknown,
}

fn group<'a>(caps: &Captures<'a>, name: &str) -> &'a str {
    caps.name(name).map(|m| m.as_str().trim()).unwrap_or("")
}

/// Matches one trimmed, non-comment line against every known shape.
pub(super) fn classify(line: &str) -> Line<'_> {
    if line == "}" {
        return Line::Close;
    }
    if EFFECT_RE.is_match(line) {
        return Line::Effect;
    }
    if let Some(caps) = SET_RE.captures(line) {
        return Line::Set {
            target: group(&caps, "target"),
            value: group(&caps, "value"),
        };
    }
    if let Some(caps) = TRIGGER_RE.captures(line) {
        return Line::Trigger {
            entity: group(&caps, "entity"),
            action: group(&caps, "action"),
            target: group(&caps, "target"),
        };
    }
    if let Some(caps) = FOR_RE.captures(line) {
        let conditions = group(&caps, "cond");
        return Line::ForOpen {
            variable: group(&caps, "var"),
            entity: group(&caps, "entity"),
            conditions: (!conditions.is_empty()).then_some(conditions),
        };
    }
    if let Some(caps) = CALL_RE.captures(line) {
        let product = caps
            .name("qprod")
            .or_else(|| caps.name("prod"))
            .map(|m| m.as_str().trim())
            .unwrap_or("");
        return Line::Call {
            product,
            method: group(&caps, "method"),
            args: group(&caps, "args"),
        };
    }
    if let Some(caps) = PRECONDITION_RE.captures(line) {
        return Line::Precondition {
            label: group(&caps, "label"),
            conditions: group(&caps, "cond"),
        };
    }
    if let Some(caps) = ON_FAILURE_RE.captures(line) {
        let raw = caps.name("msg").map(|m| m.as_str()).unwrap_or("");
        return Line::OnFailure {
            message: unescape(raw),
        };
    }
    Line::Unknown
}

/// Escapes backslashes and double quotes for a `"..."` literal.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inverse of [`escape`]. Unknown escapes are kept verbatim.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == '"' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
