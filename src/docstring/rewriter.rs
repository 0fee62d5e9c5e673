//! Splices synthesized docstrings back into the original text.

use std::io::{self, Write};

use super::synthesizer::Replacement;

/// Write `content` to `out`, swapping each replacement's line range for its text.
///
/// Lines outside every range are copied byte for byte. Replacements must not
/// overlap. A block replacing CRLF-terminated lines is written with CRLF endings.
pub fn rewrite<W: Write>(content: &str, replacements: &[Replacement], out: &mut W) -> io::Result<()> {
    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by_key(|r| r.range.start_line);
    let mut pending = ordered.into_iter().peekable();

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        while pending.peek().is_some_and(|r| r.range.end_line < idx) {
            pending.next();
        }

        match pending.peek() {
            Some(r) if r.range.contains(idx) => {
                if idx == r.range.start_line {
                    if line.ends_with("\r\n") {
                        out.write_all(r.text.replace('\n', "\r\n").as_bytes())?;
                    } else {
                        out.write_all(r.text.as_bytes())?;
                    }
                }
            }
            _ => out.write_all(line.as_bytes())?,
        }
    }
    Ok(())
}

/// In-memory form of [`rewrite`].
pub fn rewrite_to_string(content: &str, replacements: &[Replacement]) -> String {
    let mut buf = Vec::with_capacity(content.len());
    // Writing into a Vec cannot fail.
    let _ = rewrite(content, replacements, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
