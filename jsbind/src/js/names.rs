//!
//! JavaScript Identifier Names
//!
//! `JsIdentifierName` wraps text known to be usable as a JS identifier.
//! `NameAllocator` hands out fresh `<hint>__<n>` names from one counter per
//! compilation unit; it is shared by the reference registry and member
//! synthesis so the two never collide.
//!

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

pub fn is_reserved_word(text: &str) -> bool {
    RESERVED_WORDS.contains(&text)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsIdentifierName(String);

impl JsIdentifierName {
    /// Wraps `text` without checking it. Use for names from fixed tables.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Rewrites arbitrary text into a valid, non-reserved identifier.
    pub fn massage(text: &str) -> Self {
        let mut out = String::with_capacity(text.len() + 1);
        for (i, c) in text.chars().enumerate() {
            let ok = c == '_' || c == '$' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit());
            if ok {
                out.push(c);
            } else if i == 0 && c.is_ascii_digit() {
                out.push('_');
                out.push(c);
            } else {
                out.push('_');
            }
        }
        if out.is_empty() || is_reserved_word(&out) {
            out.insert(0, '_');
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsIdentifierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JsIdentifierName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct NameAllocator {
    counter: AtomicU32,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&self, hint: &str) -> JsIdentifierName {
        let base = JsIdentifierName::massage(hint);
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        JsIdentifierName(format!("{}__{}", base.0, n))
    }

    /// Number of names handed out so far.
    pub fn allocated(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}
