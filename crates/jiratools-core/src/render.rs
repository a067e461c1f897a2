//! Plain-text rendering of ADF documents
//!
//! Best-effort inverse of the emitter, used to display descriptions and
//! comments fetched from the API in a terminal. Works on raw JSON rather
//! than the typed node model so that documents containing node types we
//! never emit still render; unknown nodes degrade to their concatenated
//! text content.

use serde_json::Value;

/// Render an ADF document (as returned by the API) to readable text.
pub fn render_text(doc: &Value) -> String {
    let mut out = String::new();
    render_blocks(content_of(doc), 0, &mut out);
    out.trim_end().to_string()
}

fn content_of(node: &Value) -> &[Value] {
    node.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn render_blocks(blocks: &[Value], depth: usize, out: &mut String) {
    for block in blocks {
        match block.get("type").and_then(Value::as_str).unwrap_or("") {
            "paragraph" => push_line(out, depth, &inline_text(block)),
            "heading" => {
                let level = block["attrs"]["level"].as_u64().unwrap_or(1) as usize;
                let line = format!("{} {}", "#".repeat(level.clamp(1, 6)), inline_text(block));
                push_line(out, depth, &line);
            }
            kind @ ("bulletList" | "orderedList") => {
                let ordered = kind == "orderedList";
                for (idx, item) in content_of(block).iter().enumerate() {
                    render_list_item(item, idx, ordered, depth, out);
                }
            }
            "codeBlock" => {
                let language = block["attrs"]["language"].as_str().unwrap_or("");
                push_line(out, depth, &format!("```{language}"));
                for line in inline_text(block).lines() {
                    push_line(out, depth, line);
                }
                push_line(out, depth, "```");
            }
            "rule" => push_line(out, depth, "---"),
            "blockquote" => {
                for child in content_of(block) {
                    push_line(out, depth, &format!("> {}", inline_text(child)));
                }
            }
            _ => {
                let text = inline_text(block);
                if !text.is_empty() {
                    push_line(out, depth, &text);
                }
            }
        }
    }
}

fn render_list_item(item: &Value, idx: usize, ordered: bool, depth: usize, out: &mut String) {
    let marker = if ordered {
        format!("{}. ", idx + 1)
    } else {
        "\u{2022} ".to_string()
    };
    let mut first = true;
    for child in content_of(item) {
        let kind = child.get("type").and_then(Value::as_str).unwrap_or("");
        if first && kind == "paragraph" {
            push_line(out, depth, &format!("{marker}{}", inline_text(child)));
            first = false;
        } else {
            render_blocks(std::slice::from_ref(child), depth + 1, out);
        }
    }
    if first {
        push_line(out, depth, marker.trim_end());
    }
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(line);
    out.push('\n');
}

fn inline_text(node: &Value) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Value, out: &mut String) {
    if node.get("type").and_then(Value::as_str) == Some("text") {
        out.push_str(node.get("text").and_then(Value::as_str).unwrap_or(""));
        return;
    }
    for child in content_of(node) {
        collect_text(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_paragraph_and_heading() {
        let doc = json!({
            "type": "doc", "version": 1,
            "content": [
                {"type": "heading", "attrs": {"level": 2},
                 "content": [{"type": "text", "text": "Section"}]},
                {"type": "paragraph",
                 "content": [
                     {"type": "text", "text": "Some "},
                     {"type": "text", "text": "bold", "marks": [{"type": "strong"}]}
                 ]}
            ]
        });
        assert_eq!(render_text(&doc), "## Section\nSome bold");
    }

    #[test]
    fn test_render_lists() {
        let doc = json!({
            "type": "doc", "version": 1,
            "content": [{
                "type": "bulletList",
                "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "one"}]}
                    ]},
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "two"}]},
                        {"type": "orderedList", "content": [
                            {"type": "listItem", "content": [
                                {"type": "paragraph", "content": [{"type": "text", "text": "sub"}]}
                            ]}
                        ]}
                    ]}
                ]
            }]
        });
        assert_eq!(
            render_text(&doc),
            "\u{2022} one\n\u{2022} two\n  1. sub"
        );
    }

    #[test]
    fn test_render_code_block_and_rule() {
        let doc = json!({
            "type": "doc", "version": 1,
            "content": [
                {"type": "codeBlock", "attrs": {"language": "rust"},
                 "content": [{"type": "text", "text": "let x = 1;\nlet y = 2;"}]},
                {"type": "rule"}
            ]
        });
        assert_eq!(
            render_text(&doc),
            "```rust\nlet x = 1;\nlet y = 2;\n```\n---"
        );
    }

    #[test]
    fn test_unknown_node_degrades_to_text() {
        let doc = json!({
            "type": "doc", "version": 1,
            "content": [{
                "type": "panel",
                "content": [{"type": "paragraph", "content": [{"type": "text", "text": "inside"}]}]
            }]
        });
        assert_eq!(render_text(&doc), "inside");
    }

    #[test]
    fn test_render_empty_document() {
        let doc = json!({"type": "doc", "version": 1, "content": []});
        assert_eq!(render_text(&doc), "");
    }
}
