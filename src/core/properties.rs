//! core::properties
//!
//! Line-oriented `key=value` properties text.
//!
//! # Format
//!
//! - Blank lines are ignored. Lines whose first non-blank character is `#`
//!   or `!` are comments.
//! - The key ends at the first unescaped `=`, `:` or whitespace. Whitespace
//!   around the separator is skipped.
//! - A line ending in an odd number of backslashes continues on the next
//!   line; leading whitespace of the continuation is dropped.
//! - Escapes: `\t`, `\n`, `\r`, `\f`, `\uXXXX`, and `\c` for any other `c`.
//! - Lines end at `\n`, `\r` or `\r\n`.
//! - Input is UTF-8. Bytes that are not valid UTF-8 are read as ISO-8859-1,
//!   so every byte sequence decodes.
//!
//! A bad `\uXXXX` escape is reported as an [`io::Error`] of kind
//! [`io::ErrorKind::InvalidData`], alongside any error from the underlying
//! reader.
//!
//! # Example
//!
//! ```
//! use selma::core::properties::Properties;
//!
//! let text = "# build\nselma.version = 1.2.3\nselma.git.desc: v1.2.3\n";
//! let props = Properties::parse(text.as_bytes()).unwrap();
//!
//! assert_eq!(props.get("selma.version"), Some("1.2.3"));
//! assert_eq!(props.get_or("selma.git.commit-full", "none"), "none");
//! ```

use std::io::{self, Read, Write};

const BLANK: [char; 3] = [' ', '\t', '\x0c'];

/// An ordered string-to-string mapping.
///
/// Iteration follows first-insertion order. Inserting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text from a reader into a fresh mapping.
    pub fn parse<R: Read>(reader: R) -> io::Result<Self> {
        let mut props = Self::new();
        props.load(reader)?;
        Ok(props)
    }

    /// Read properties text and add every pair to this mapping.
    ///
    /// On error the mapping is left unchanged.
    pub fn load<R: Read>(&mut self, mut reader: R) -> io::Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = decode(bytes);

        let mut parsed = Vec::new();
        let mut lines = split_lines(&text);
        while let Some(raw) = lines.next() {
            let line = raw.trim_start_matches(BLANK);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let mut logical = line.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start_matches(BLANK)),
                    None => break,
                }
            }

            let (key, value) = split_key_value(&logical);
            parsed.push((unescape(key)?, unescape(value)?));
        }

        for (key, value) in parsed {
            self.insert(key, value);
        }
        Ok(())
    }

    /// Write the mapping as properties text.
    ///
    /// Writes an optional `#comment` line, a `#timestamp` line, then one
    /// escaped `key=value` line per entry. The timestamp carries the local
    /// UTC offset (`+0200`) rather than a zone abbreviation. The output parses back to an
    /// equal mapping.
    pub fn store<W: Write>(&self, mut writer: W, comment: Option<&str>) -> io::Result<()> {
        if let Some(comment) = comment {
            for line in comment.lines() {
                writeln!(writer, "#{}", line)?;
            }
        }
        writeln!(
            writer,
            "#{}",
            chrono::Local::now().format("%a %b %d %H:%M:%S %z %Y")
        )?;
        for (key, value) in &self.entries {
            writeln!(writer, "{}={}", escape(key, true), escape(value, false))?;
        }
        writer.flush()
    }

    /// Insert a pair, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a value, falling back to `default` when the key is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs sorted by key.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable_by_key(|(k, _)| *k);
        pairs
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (key, value) in iter {
            props.insert(key, value);
        }
        props
    }
}

impl serde::Serialize for Properties {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Split on `\r\n`, `\r` or `\n`. A trailing terminator yields no empty line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(end) => {
                let line = &rest[..end];
                let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut separator = None;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                separator = Some((i, c));
                break;
            }
            _ => {}
        }
    }

    let Some((end, sep)) = separator else {
        return (line, "");
    };

    let key = &line[..end];
    let mut rest = &line[end + sep.len_utf8()..];
    if BLANK.contains(&sep) {
        rest = rest.trim_start_matches(BLANK);
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped;
        }
    }
    (key, rest.trim_start_matches(BLANK))
}

fn invalid_data(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

fn read_utf16_unit(chars: &mut std::str::Chars<'_>) -> io::Result<u32> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid_data(format!("malformed \\uXXXX escape: \\u{}", hex)));
    }
    u32::from_str_radix(&hex, 16).map_err(|e| invalid_data(e.to_string()))
}

fn unescape(raw: &str) -> io::Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_utf16_unit(&mut chars)?;
                let code_point = if (0xD800..=0xDBFF).contains(&unit) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(invalid_data("unpaired high surrogate in \\u escape"));
                    }
                    let low = read_utf16_unit(&mut chars)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(invalid_data("unpaired high surrogate in \\u escape"));
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    unit
                };
                let decoded = char::from_u32(code_point)
                    .ok_or_else(|| invalid_data(format!("invalid code point U+{:04X}", code_point)))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            // A dangling backslash at end of input is dropped.
            None => {}
        }
    }

    Ok(out)
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            ' ' if i == 0 || is_key => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '\\' | '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
