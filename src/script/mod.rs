//! Inline script payloads extracted from a document.
//!
//! A [`ScriptBlock`] holds the textual content of a script element, most
//! often an embedded JSON blob, and offers slicing and cleanup transforms
//! plus a bridge into the JSON layer. The value is immutable: every
//! transform consumes the block and returns a new one, so a block can be
//! shared across threads and reused across calls without hazard.

use std::fmt;

use regex::Regex;

use crate::json::JsonDoc;

/// Immutable string-content value with a derived JSON view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScriptBlock {
    content: String,
}

impl ScriptBlock {
    pub fn new(content: impl Into<String>) -> Self {
        ScriptBlock {
            content: content.into(),
        }
    }

    pub const fn empty() -> Self {
        ScriptBlock {
            content: String::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.content.is_empty()
    }

    // #slicing

    /// Everything after the first occurrence of `sep`, or an empty block
    /// when `sep` is absent.
    pub fn after(self, sep: &str) -> Self {
        match self.content.find(sep) {
            Some(at) => ScriptBlock::new(&self.content[at + sep.len()..]),
            None => ScriptBlock::empty(),
        }
    }

    /// Everything before the first occurrence of `sep`. When `sep` is
    /// absent the block is returned unchanged.
    pub fn before(self, sep: &str) -> Self {
        match self.content.find(sep) {
            Some(at) => ScriptBlock::new(&self.content[..at]),
            None => self,
        }
    }

    /// Everything before the last occurrence of `sep`. When `sep` is
    /// absent the block is returned unchanged.
    pub fn before_last(self, sep: &str) -> Self {
        match self.content.rfind(sep) {
            Some(at) => ScriptBlock::new(&self.content[..at]),
            None => self,
        }
    }

    /// The first slice between `open` and `close`, or an empty block when
    /// either delimiter is absent.
    pub fn between(self, open: &str, close: &str) -> Self {
        let Some(start) = self.content.find(open) else {
            return ScriptBlock::empty();
        };
        let rest = &self.content[start + open.len()..];
        match rest.find(close) {
            Some(end) => ScriptBlock::new(&rest[..end]),
            None => ScriptBlock::empty(),
        }
    }

    // #editing

    pub fn prepend(self, s: &str) -> Self {
        ScriptBlock::new(format!("{s}{}", self.content))
    }

    pub fn append(self, s: &str) -> Self {
        ScriptBlock::new(format!("{}{s}", self.content))
    }

    /// Resolve JSON string escapes (`\"`, `\\`, `\/`, `\n`, `\t`, `\r`,
    /// `\b`, `\f`, `\uXXXX` with surrogate pairs). Unknown escapes are
    /// kept verbatim.
    pub fn unescape_json(self) -> Self {
        ScriptBlock::new(unescape(&self.content))
    }

    /// Replace every literal occurrence of `target`.
    pub fn replace(self, target: &str, replacement: &str) -> Self {
        if target.is_empty() {
            return self;
        }
        ScriptBlock::new(self.content.replace(target, replacement))
    }

    /// Replace every match of `pattern`.
    pub fn replace_pattern(self, pattern: &Regex, replacement: &str) -> Self {
        ScriptBlock::new(pattern.replace_all(&self.content, replacement).into_owned())
    }

    /// Remove every literal occurrence of `target`.
    pub fn remove(self, target: &str) -> Self {
        self.replace(target, "")
    }

    // #tests

    pub fn contains(&self, s: &str) -> bool {
        self.content.contains(s)
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.content.starts_with(s)
    }

    pub fn ends_with(&self, s: &str) -> bool {
        self.content.ends_with(s)
    }

    // #json

    /// Parse the content as JSON. Blank content yields the canonical
    /// empty document, as does unparseable content.
    pub fn json(&self) -> JsonDoc {
        if self.content.is_empty() {
            JsonDoc::empty()
        } else {
            JsonDoc::parse(&self.content)
        }
    }

    /// Read `path` from [`json`](Self::json) and wrap the result as a
    /// document of its own. An empty document propagates unchanged.
    pub fn sub_json(&self, path: &str) -> JsonDoc {
        let doc = self.json();
        if doc.is_empty_doc() {
            return doc;
        }
        match doc.read(path) {
            Some(value) => JsonDoc::from_value(value.clone()),
            None => JsonDoc::empty(),
        }
    }
}

impl fmt::Display for ScriptBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

// Content equality against raw strings, in both directions, so a block can
// be compared to the expected payload without wrapping it first.

impl PartialEq<str> for ScriptBlock {
    fn eq(&self, other: &str) -> bool {
        self.content == other
    }
}

impl PartialEq<&str> for ScriptBlock {
    fn eq(&self, other: &&str) -> bool {
        self.content == *other
    }
}

impl PartialEq<String> for ScriptBlock {
    fn eq(&self, other: &String) -> bool {
        self.content == *other
    }
}

impl PartialEq<ScriptBlock> for str {
    fn eq(&self, other: &ScriptBlock) -> bool {
        self == other.content
    }
}

impl PartialEq<ScriptBlock> for &str {
    fn eq(&self, other: &ScriptBlock) -> bool {
        *self == other.content
    }
}

impl PartialEq<ScriptBlock> for String {
    fn eq(&self, other: &ScriptBlock) -> bool {
        *self == other.content
    }
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let mut attempt = chars.clone();
                match read_unicode(&mut attempt) {
                    Some(c) => {
                        out.push(c);
                        chars = attempt;
                    }
                    None => out.push_str("\\u"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn read_unicode(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let high = read_hex4(chars)?;
    if (0xD800..0xDC00).contains(&high) {
        // high surrogate, must be followed by \uXXXX low surrogate
        let mut rest = chars.clone();
        if rest.next() == Some('\\') && rest.next() == Some('u') {
            if let Some(low) = read_hex4(&mut rest) {
                if (0xDC00..0xE000).contains(&low) {
                    *chars = rest;
                    let combined =
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined);
                }
            }
        }
        None
    } else {
        char::from_u32(high)
    }
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = chars.next()?.to_digit(16)?;
        value = value * 16 + digit;
    }
    Some(value)
}
