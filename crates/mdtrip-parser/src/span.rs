//! Span arithmetic over the original source
//!
//! Both normalizers record trimmed byte spans on the nodes they build and
//! recover delimiter runs by slicing the source at those spans. The
//! helpers here are the shared slicing rules.

use std::ops::Range;

/// Drop trailing newlines (and carriage returns) from a block span so the
/// separator between two siblings is exactly the source text between
/// their trimmed spans.
pub fn trim_trailing_newlines(source: &str, range: Range<usize>) -> Range<usize> {
    let bytes = source.as_bytes();
    let mut end = range.end.min(source.len());
    while end > range.start && matches!(bytes[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    range.start..end
}

/// Does this inter-sibling gap contain a blank line?
pub fn gap_has_blank_line(gap: &str) -> bool {
    let mut newlines = 0;
    for byte in gap.bytes() {
        match byte {
            b'\n' => {
                newlines += 1;
                if newlines >= 2 {
                    return true;
                }
            }
            b' ' | b'\t' | b'\r' => {}
            _ => newlines = 0,
        }
    }
    false
}

/// Strip leading blockquote decorations (`>` runs with interleaved
/// indentation) from a line. Fence slices taken from inside a blockquote
/// keep the `> ` prefix on every line but the first.
fn strip_quote_markers(line: &str) -> &str {
    let mut rest = line.trim_start();
    while let Some(stripped) = rest.strip_prefix('>') {
        rest = stripped.trim_start();
    }
    rest
}

/// Opening fence of a fenced code block slice: marker character, run
/// length, and raw info string.
pub fn fence_open(slice: &str) -> Option<(char, usize, &str)> {
    let line = slice.lines().next()?;
    let trimmed = strip_quote_markers(line);
    let marker = trimmed.chars().next()?;
    if marker != '`' && marker != '~' {
        return None;
    }
    let run = trimmed.chars().take_while(|&c| c == marker).count();
    if run < 3 {
        return None;
    }
    Some((marker, run, trimmed[run..].trim()))
}

/// Whether a fenced code block slice actually contains its closing fence.
/// Backends auto-close open fences at end of input, so the source slice is
/// the only place the difference is still visible.
pub fn fenced_block_closed(slice: &str) -> bool {
    let Some((marker, run, _)) = fence_open(slice) else {
        return false;
    };
    let mut lines = slice.lines();
    lines.next();
    let Some(last) = lines.last() else {
        return false;
    };
    let closer = strip_quote_markers(last).trim_end();
    !closer.is_empty() && closer.chars().all(|c| c == marker) && closer.chars().count() >= run
}

/// Marker character and marker width (marker plus padding spaces) at the
/// start of a list item slice. For ordered items the marker character is
/// the delimiter (`.` or `)`).
pub fn list_marker_hints(item_slice: &str) -> (Option<char>, Option<usize>) {
    let bytes = item_slice.as_bytes();
    if bytes.is_empty() {
        return (None, None);
    }

    if matches!(bytes[0], b'-' | b'*' | b'+') {
        let mut width = 1;
        while bytes.get(width) == Some(&b' ') {
            width += 1;
        }
        return (Some(bytes[0] as char), Some(width));
    }

    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(&delim @ (b'.' | b')')) = bytes.get(digits) {
            let mut width = digits + 1;
            while bytes.get(width) == Some(&b' ') {
                width += 1;
            }
            return (Some(delim as char), Some(width));
        }
    }
    (None, None)
}

/// Tightness of a list from its item spans: loose as soon as a blank line
/// separates two consecutive items.
pub fn list_is_tight(source: &str, item_spans: &[Range<usize>]) -> bool {
    item_spans.windows(2).all(|pair| {
        let first = trim_trailing_newlines(source, pair[0].clone());
        if first.end >= pair[1].start {
            return true;
        }
        !gap_has_blank_line(&source[first.end..pair[1].start])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_trailing_newlines() {
        let src = "# Title\n\nBody.\n";
        assert_eq!(trim_trailing_newlines(src, 0..9), 0..7);
        assert_eq!(trim_trailing_newlines(src, 9..15), 9..14);
        assert_eq!(trim_trailing_newlines(src, 0..7), 0..7);
    }

    #[test]
    fn test_gap_blank_line() {
        assert!(gap_has_blank_line("\n\n"));
        assert!(gap_has_blank_line("\n   \n"));
        assert!(!gap_has_blank_line("\n"));
        assert!(!gap_has_blank_line("\n> "));
    }

    #[test]
    fn test_fence_open_and_closed() {
        assert_eq!(fence_open("```rust\ncode\n```"), Some(('`', 3, "rust")));
        assert_eq!(fence_open("~~~~\nx\n~~~~"), Some(('~', 4, "")));
        assert!(fenced_block_closed("```rust\ncode\n```"));
        assert!(fenced_block_closed("```\ncode\n`````"));
        assert!(!fenced_block_closed("```rust\ncode that never ends"));
        assert!(!fenced_block_closed("````\ncode\n```"));
    }

    #[test]
    fn test_fences_inside_blockquotes() {
        assert_eq!(fence_open("> ```rust\n> x\n> ```"), Some(('`', 3, "rust")));
        assert!(fenced_block_closed("```\n> code\n> ```"));
        assert!(fenced_block_closed("> ```\n> code\n> ```"));
        assert!(fenced_block_closed("```\n> > deep\n> > ```"));
        assert!(!fenced_block_closed("```\n> still open\n"));
    }

    #[test]
    fn test_list_marker_hints() {
        assert_eq!(list_marker_hints("- item"), (Some('-'), Some(2)));
        assert_eq!(list_marker_hints("*  wide"), (Some('*'), Some(3)));
        assert_eq!(list_marker_hints("12. nth"), (Some('.'), Some(4)));
        assert_eq!(list_marker_hints("3) alt"), (Some(')'), Some(3)));
        assert_eq!(list_marker_hints("plain"), (None, None));
    }

    #[test]
    fn test_list_tightness() {
        let tight = "- a\n- b\n";
        assert!(list_is_tight(tight, &[0..4, 4..8]));
        let loose = "- a\n\n- b\n";
        assert!(!list_is_tight(loose, &[0..4, 5..9]));
    }
}
