//! Line-ending normalization for text arriving from outside the buffer.
//!
//! Terminals deliver pasted line breaks as `\r` (and clipboards on some
//! platforms as `\r\n`). The buffer only ever stores `\n`, so paste content is
//! normalized before it reaches `LineBuffer::insert_at`.

/// Result of normalizing a string to `\n` line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,
    /// More than one style was present.
    pub mixed: bool,
}

/// Rewrite `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    crlf += 1;
                } else {
                    cr += 1;
                }
                out.push('\n');
            }
            '\n' => {
                lf += 1;
                out.push('\n');
            }
            other => out.push(other),
        }
    }

    let mixed = [crlf, lf, cr].iter().filter(|c| **c > 0).count() > 1;

    NormalizedText {
        normalized: out,
        mixed,
    }
}
