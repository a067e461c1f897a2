//! Line-oriented Markdown parser
//!
//! `parse` turns a Markdown string into a sequence of [`Block`] nodes. The
//! parser is pure and never fails: anything it cannot recognize is carried
//! through as paragraph text. Blockquotes are parsed (not dropped) so the
//! ADF emitter can reject them with a clear error.

mod inline;

pub use inline::parse_inlines;

use crate::ast::{Block, ListItem};

/// Parse a Markdown document into top-level blocks.
pub fn parse(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();

        if trimmed.is_empty() {
            i += 1;
        } else if let Some((level, rest)) = heading(trimmed) {
            blocks.push(Block::Heading {
                level,
                content: parse_inlines(rest),
            });
            i += 1;
        } else if let Some(language) = fence(trimmed) {
            i += 1;
            let mut code = Vec::new();
            while i < lines.len() && fence(lines[i].trim()).is_none() {
                code.push(lines[i]);
                i += 1;
            }
            if i < lines.len() {
                i += 1; // closing fence
            }
            blocks.push(Block::CodeBlock {
                language,
                code: code.join("\n"),
            });
        } else if is_rule(trimmed) {
            blocks.push(Block::ThematicBreak);
            i += 1;
        } else if trimmed.starts_with('>') {
            let mut quoted = Vec::new();
            while i < lines.len() && lines[i].trim().starts_with('>') {
                let inner = lines[i].trim().trim_start_matches('>').trim();
                if !inner.is_empty() {
                    quoted.push(inner);
                }
                i += 1;
            }
            blocks.push(Block::BlockQuote(parse_inlines(&quoted.join(" "))));
        } else if list_marker(lines[i]).is_some() {
            let mut raw = Vec::new();
            while i < lines.len() && !is_rule(lines[i].trim()) {
                match list_marker(lines[i]) {
                    Some(item) => {
                        raw.push(item);
                        i += 1;
                    }
                    None => break,
                }
            }
            blocks.extend(build_lists(&raw));
        } else {
            let mut para = Vec::new();
            while i < lines.len() {
                let t = lines[i].trim();
                if t.is_empty()
                    || heading(t).is_some()
                    || fence(t).is_some()
                    || is_rule(t)
                    || t.starts_with('>')
                    || list_marker(lines[i]).is_some()
                {
                    break;
                }
                para.push(t);
                i += 1;
            }
            blocks.push(Block::Paragraph(parse_inlines(&para.join(" "))));
        }
    }

    blocks
}

/// `#`..`######` followed by a space.
fn heading(trimmed: &str) -> Option<(u8, &str)> {
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = trimmed[hashes..].strip_prefix(' ')?;
    Some((hashes as u8, rest.trim()))
}

/// Opening or closing code fence; returns the language tag for an opener.
fn fence(trimmed: &str) -> Option<Option<String>> {
    let rest = trimmed.strip_prefix("```")?;
    let tag = rest.trim();
    Some(if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    })
}

/// A line of at least three `-`, `*`, or `_` and nothing else.
fn is_rule(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first @ ('-' | '*' | '_')) => {
            trimmed.len() >= 3 && chars.all(|c| c == first)
        }
        _ => false,
    }
}

/// One raw line of a list run, before nesting is resolved.
struct RawItem {
    indent: usize,
    ordered: bool,
    checked: Option<bool>,
    text: String,
}

fn list_marker(line: &str) -> Option<RawItem> {
    let indent = indent_width(line);
    let rest = line.trim_start();

    if let Some(text) = rest.strip_prefix("- ").or_else(|| rest.strip_prefix("* ")) {
        let (checked, text) = task_state(text.trim());
        return Some(RawItem {
            indent,
            ordered: false,
            checked,
            text: text.to_string(),
        });
    }

    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if (1..=3).contains(&digits) {
        if let Some(text) = rest[digits..].strip_prefix(". ") {
            return Some(RawItem {
                indent,
                ordered: true,
                checked: None,
                text: text.trim().to_string(),
            });
        }
    }

    None
}

/// `[ ]` / `[x]` prefix on a bullet item.
fn task_state(text: &str) -> (Option<bool>, &str) {
    if let Some(rest) = text.strip_prefix("[ ] ") {
        return (Some(false), rest.trim_start());
    }
    if let Some(rest) = text.strip_prefix("[x] ").or_else(|| text.strip_prefix("[X] ")) {
        return (Some(true), rest.trim_start());
    }
    match text {
        "[ ]" => (Some(false), ""),
        "[x]" | "[X]" => (Some(true), ""),
        _ => (None, text),
    }
}

/// Leading whitespace width; a tab counts as four spaces.
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => break,
        }
    }
    width
}

/// Resolve a run of raw list lines into (possibly sibling) list blocks.
///
/// Indentation maps to depth by dividing by the smallest non-zero indent
/// observed in the run, so two-space, four-space, and tab indents all nest
/// one level per step.
fn build_lists(items: &[RawItem]) -> Vec<Block> {
    if items.is_empty() {
        return Vec::new();
    }
    let unit = items
        .iter()
        .map(|it| it.indent)
        .filter(|&n| n > 0)
        .min()
        .unwrap_or(1);
    let depths: Vec<usize> = items.iter().map(|it| it.indent / unit).collect();
    let mut pos = 0;
    let mut blocks = Vec::new();
    // restart at the shallower depth when a later item out-dents the first
    while pos < items.len() {
        let depth = depths[pos];
        blocks.extend(build_level(items, &depths, &mut pos, depth));
    }
    blocks
}

fn build_level(
    items: &[RawItem],
    depths: &[usize],
    pos: &mut usize,
    depth: usize,
) -> Vec<Block> {
    let mut blocks = Vec::new();
    while *pos < items.len() && depths[*pos] >= depth {
        let ordered = items[*pos].ordered;
        let mut list_items: Vec<ListItem> = Vec::new();
        while *pos < items.len() && depths[*pos] >= depth {
            if depths[*pos] > depth {
                if let Some(last) = list_items.last_mut() {
                    last.children
                        .extend(build_level(items, depths, pos, depth + 1));
                    continue;
                }
                // over-indented item with no parent at the previous depth:
                // clamp it to the current depth
            } else if items[*pos].ordered != ordered {
                break; // marker change starts a sibling list
            }
            let it = &items[*pos];
            let mut item = ListItem::new(parse_inlines(&it.text));
            item.checked = it.checked;
            list_items.push(item);
            *pos += 1;
        }
        blocks.push(Block::List {
            ordered,
            items: list_items,
        });
    }
    blocks
}
