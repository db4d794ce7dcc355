//! Comment and string masking.
//!
//! Produces two views of a file with byte offsets and line breaks preserved:
//! `code` has comments blanked (string literals intact, so `Needs["Ctx`"]`
//! still carries its argument) and `bare` additionally blanks string contents
//! (so call heads inside strings or comments are never counted).
//!
//! An unterminated string or comment is not a construct at all: its opening
//! delimiter is left as plain text and scanning continues after it.

#[derive(Debug, Clone)]
pub struct MaskedText {
    pub code: String,
    pub bare: String,
}

impl MaskedText {
    pub fn new(text: &str) -> Self {
        let src = text.as_bytes();
        let mut code = src.to_vec();
        let mut bare = src.to_vec();
        let mut strings_exhausted = false;
        let mut i = 0;

        while i < src.len() {
            match src[i] {
                b'(' if src.get(i + 1) == Some(&b'*') => match comment_end(src, i) {
                    Some(end) => {
                        blank(&mut code, i, end);
                        blank(&mut bare, i, end);
                        i = end;
                    }
                    None => i += 2,
                },
                b'"' if !strings_exhausted => match string_close(src, i + 1) {
                    Some(close) => {
                        blank(&mut bare, i + 1, close);
                        i = close + 1;
                    }
                    None => {
                        // No unescaped quote remains anywhere after this one.
                        strings_exhausted = true;
                        i += 1;
                    }
                },
                _ => i += 1,
            }
        }

        Self {
            code: into_string(code),
            bare: into_string(bare),
        }
    }
}

/// End offset (exclusive) of the possibly nested comment opening at `start`.
fn comment_end(src: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut j = start;
    while j + 1 < src.len() {
        if src[j] == b'(' && src[j + 1] == b'*' {
            depth += 1;
            j += 2;
        } else if src[j] == b'*' && src[j + 1] == b')' {
            depth -= 1;
            j += 2;
            if depth == 0 {
                return Some(j);
            }
        } else {
            j += 1;
        }
    }
    None
}

/// Offset of the closing quote for a string whose body starts at `from`.
fn string_close(src: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j < src.len() {
        match src[j] {
            b'\\' => j += 2,
            b'"' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

fn blank(buf: &mut [u8], from: usize, to: usize) {
    let to = to.min(buf.len());
    for b in &mut buf[from..to] {
        if *b != b'\n' && *b != b'\r' {
            *b = b' ';
        }
    }
}

fn into_string(buf: Vec<u8>) -> String {
    // Only whole delimited runs are replaced with ASCII spaces, and every run
    // starts and ends on an ASCII delimiter, so UTF-8 validity is preserved.
    String::from_utf8(buf).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
