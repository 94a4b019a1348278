//! Minimal RFC 5545 content-line writer.
//!
//! Lines end in CRLF and are folded at 75 octets without splitting UTF-8
//! sequences. TEXT values are escaped by [`IcsWriter::text`]; everything
//! else is written as given.
//!
//! `icalendar`'s serializer stamps a fresh DTSTAMP and a random UID onto
//! components it does not model, VTIMEZONE included, so it cannot produce
//! byte-identical output for identical input.

const FOLD_LIMIT: usize = 75;
const CRLF: &str = "\r\n";

/// Accumulates content lines into an ICS document.
#[derive(Debug, Default)]
pub struct IcsWriter {
    out: String,
}

impl IcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, component: &str) {
        self.line(&format!("BEGIN:{component}"));
    }

    pub fn end(&mut self, component: &str) {
        self.line(&format!("END:{component}"));
    }

    /// Writes `NAME:value` with `value` as-is.
    pub fn property(&mut self, name: &str, value: &str) {
        self.line(&format!("{name}:{value}"));
    }

    /// Writes `NAME;P1=v1;P2=v2:value`. Parameter values containing `:`, `;`
    /// or `,` are quoted. `"` cannot be represented and is dropped.
    pub fn property_with_params(&mut self, name: &str, params: &[(&str, &str)], value: &str) {
        let mut line = name.to_string();
        for (key, param) in params {
            line.push(';');
            line.push_str(key);
            line.push('=');
            line.push_str(&quote_param(param));
        }
        line.push(':');
        line.push_str(value);
        self.line(&line);
    }

    /// Writes a TEXT property, escaping the value.
    pub fn text(&mut self, name: &str, value: &str) {
        self.property(name, &escape_text(value));
    }

    /// Writes an already-formed content line without folding it again.
    pub fn raw_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push_str(CRLF);
    }

    fn line(&mut self, line: &str) {
        self.out.push_str(&fold_line(line));
        self.out.push_str(CRLF);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Escapes a TEXT value: backslash, semicolon, comma and newlines.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn quote_param(value: &str) -> String {
    if value.contains([':', ';', ',']) {
        format!("\"{}\"", value.replace('"', ""))
    } else {
        value.to_string()
    }
}

/// Folds a logical line into physical lines of at most 75 octets, joined by
/// CRLF and a single space.
pub fn fold_line(line: &str) -> String {
    if line.len() <= FOLD_LIMIT {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + 3 * (line.len() / (FOLD_LIMIT - 1)));
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > FOLD_LIMIT {
            out.push_str(CRLF);
            out.push(' ');
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out
}
