//! Inline span scanner
//!
//! Recognizes bold, italic, inline code, links, and images inside a run of
//! paragraph, heading, or list-item text. Malformed or unterminated spans
//! degrade to literal text; this module never fails.

use crate::ast::Inline;

/// Scan a text run into inline nodes.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let scanned = match chars[i] {
            '`' => scan_code(&chars, i),
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    if chars.get(i + 2) == Some(&'*') {
                        scan_strong_em(&chars, i).or_else(|| scan_strong(&chars, i))
                    } else {
                        scan_strong(&chars, i)
                    }
                } else {
                    scan_emphasis(&chars, i, '*')
                }
            }
            '_' => scan_emphasis(&chars, i, '_'),
            '[' => scan_link(&chars, i),
            '!' if chars.get(i + 1) == Some(&'[') => scan_image(&chars, i),
            _ => None,
        };

        match scanned {
            Some((node, next)) => {
                flush(&mut literal, &mut out);
                out.push(node);
                i = next;
            }
            None => {
                literal.push(chars[i]);
                i += 1;
            }
        }
    }

    flush(&mut literal, &mut out);
    out
}

fn flush(literal: &mut String, out: &mut Vec<Inline>) {
    if !literal.is_empty() {
        out.push(Inline::Text(std::mem::take(literal)));
    }
}

fn find(chars: &[char], from: usize, target: char) -> Option<usize> {
    chars
        .iter()
        .skip(from)
        .position(|&c| c == target)
        .map(|p| from + p)
}

/// `` `code` `` — no nested parsing inside the span.
fn scan_code(chars: &[char], start: usize) -> Option<(Inline, usize)> {
    let close = find(chars, start + 1, '`')?;
    if close == start + 1 {
        return None;
    }
    let code: String = chars[start + 1..close].iter().collect();
    Some((Inline::Code(code), close + 1))
}

/// `**bold**`. The opening delimiter must not sit before whitespace and the
/// closing one must not sit after it.
fn scan_strong(chars: &[char], start: usize) -> Option<(Inline, usize)> {
    let first = *chars.get(start + 2)?;
    if first.is_whitespace() {
        return None;
    }
    let mut j = start + 3;
    while j + 1 < chars.len() {
        if chars[j] == '*' && chars[j + 1] == '*' && !chars[j - 1].is_whitespace() {
            let inner: String = chars[start + 2..j].iter().collect();
            return Some((Inline::Strong(parse_inlines(&inner)), j + 2));
        }
        j += 1;
    }
    None
}

/// `***bold italic***` — one run carrying both marks.
fn scan_strong_em(chars: &[char], start: usize) -> Option<(Inline, usize)> {
    let first = *chars.get(start + 3)?;
    if first.is_whitespace() {
        return None;
    }
    let mut j = start + 4;
    while j + 2 < chars.len() {
        if chars[j] == '*'
            && chars[j + 1] == '*'
            && chars[j + 2] == '*'
            && !chars[j - 1].is_whitespace()
        {
            let inner: String = chars[start + 3..j].iter().collect();
            let node = Inline::Strong(vec![Inline::Emphasis(parse_inlines(&inner))]);
            return Some((node, j + 3));
        }
        j += 1;
    }
    None
}

/// `*italic*` or `_italic_`. Underscore emphasis never opens or closes
/// inside a word, so identifiers like `snake_case_name` stay literal.
fn scan_emphasis(chars: &[char], start: usize, delim: char) -> Option<(Inline, usize)> {
    let first = *chars.get(start + 1)?;
    if first.is_whitespace() {
        return None;
    }
    if delim == '_' && start > 0 && chars[start - 1].is_alphanumeric() {
        return None;
    }
    let mut j = start + 2;
    while j < chars.len() {
        if chars[j] == delim {
            // A ** run inside *...* belongs to a nested bold span.
            if delim == '*' && chars.get(j + 1) == Some(&'*') {
                j += 2;
                continue;
            }
            let word_boundary =
                delim != '_' || chars.get(j + 1).map_or(true, |c| !c.is_alphanumeric());
            if !chars[j - 1].is_whitespace() && word_boundary {
                let inner: String = chars[start + 1..j].iter().collect();
                return Some((Inline::Emphasis(parse_inlines(&inner)), j + 1));
            }
        }
        j += 1;
    }
    None
}

/// `[text](url)`
fn scan_link(chars: &[char], start: usize) -> Option<(Inline, usize)> {
    let close_bracket = find(chars, start + 1, ']')?;
    if chars.get(close_bracket + 1) != Some(&'(') {
        return None;
    }
    let close_paren = find(chars, close_bracket + 2, ')')?;
    let text: String = chars[start + 1..close_bracket].iter().collect();
    let url: String = chars[close_bracket + 2..close_paren].iter().collect();
    Some((
        Inline::Link {
            content: parse_inlines(&text),
            url,
        },
        close_paren + 1,
    ))
}

/// `![alt](url)` — alt text is taken literally.
fn scan_image(chars: &[char], start: usize) -> Option<(Inline, usize)> {
    let close_bracket = find(chars, start + 2, ']')?;
    if chars.get(close_bracket + 1) != Some(&'(') {
        return None;
    }
    let close_paren = find(chars, close_bracket + 2, ')')?;
    let alt: String = chars[start + 2..close_bracket].iter().collect();
    let url: String = chars[close_bracket + 2..close_paren].iter().collect();
    Some((Inline::Image { alt, url }, close_paren + 1))
}
