//! Field escaping for the line-oriented diary format.
//!
//! The special characters are the field delimiter, the backslash used to
//! escape, and the line terminators (written as `\n` and `\r`). Everything
//! else is copied as is.

pub const DELIMITER: char = '|';
const ESCAPE: char = '\\';

/// Escapes `text` so it can sit between delimiters on a single line.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Like [`encode`], with a missing value written as an empty field.
pub fn encode_opt(text: Option<&str>) -> String {
    text.map(encode).unwrap_or_default()
}

/// Reverses [`encode`]. A trailing lone backslash is kept literally.
pub fn decode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut escaped = false;
    for ch in text.chars() {
        if escaped {
            out.push(match ch {
                'n' => '\n',
                'r' => '\r',
                other => other,
            });
            escaped = false;
        } else if ch == ESCAPE {
            escaped = true;
        } else {
            out.push(ch);
        }
    }
    if escaped {
        out.push(ESCAPE);
    }
    out
}

/// Splits a record line on delimiters that are not escaped. Fields are
/// returned still encoded.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE {
            escaped = true;
        } else if ch == DELIMITER {
            fields.push(&line[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Joins already encoded fields into one record line.
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(field.as_ref());
    }
    line
}
