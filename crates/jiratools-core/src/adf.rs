//! Atlassian Document Format emitter
//!
//! Converts the Markdown AST into the version-1 `doc` JSON shape the JIRA
//! Cloud API expects for description and comment fields. The conversion is a
//! pure tree transform; each call produces a fresh document.
//!
//! Deliberate down-conversions:
//! - blockquotes are rejected with [`Error::UnsupportedConstruct`] (the
//!   server rejects them anyway, so we fail before the request goes out)
//! - images become a `[Image: <alt>]` text placeholder
//! - task items become plain bullet items with a literal `[ ]`/`[x]` prefix,
//!   since the interactive taskItem node is not reliably honored

use crate::ast::{Block, Inline, ListItem};
use crate::error::{Error, Result};
use serde::Serialize;

/// A node in the supported subset of the ADF schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdfNode {
    Doc {
        version: u8,
        content: Vec<AdfNode>,
    },
    Paragraph {
        content: Vec<AdfNode>,
    },
    Heading {
        attrs: HeadingAttrs,
        content: Vec<AdfNode>,
    },
    BulletList {
        content: Vec<AdfNode>,
    },
    OrderedList {
        content: Vec<AdfNode>,
    },
    ListItem {
        content: Vec<AdfNode>,
    },
    CodeBlock {
        #[serde(skip_serializing_if = "Option::is_none")]
        attrs: Option<CodeBlockAttrs>,
        content: Vec<AdfNode>,
    },
    Text {
        text: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        marks: Vec<AdfMark>,
    },
    Rule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingAttrs {
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlockAttrs {
    pub language: String,
}

/// A formatting mark attached to a text node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdfMark {
    Strong,
    Em,
    Code,
    Link { attrs: LinkAttrs },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkAttrs {
    pub href: String,
}

/// Convert parsed Markdown blocks into an ADF `doc` root.
pub fn to_adf(blocks: &[Block]) -> Result<AdfNode> {
    let content = blocks.iter().map(emit_block).collect::<Result<Vec<_>>>()?;
    Ok(AdfNode::Doc {
        version: 1,
        content,
    })
}

/// Parse Markdown text and convert it in one step.
pub fn markdown_to_adf(text: &str) -> Result<AdfNode> {
    to_adf(&crate::markdown::parse(text))
}

fn emit_block(block: &Block) -> Result<AdfNode> {
    match block {
        Block::Paragraph(inlines) => Ok(AdfNode::Paragraph {
            content: emit_inlines(inlines, &[]),
        }),
        Block::Heading { level, content } => Ok(AdfNode::Heading {
            attrs: HeadingAttrs {
                level: (*level).clamp(1, 6),
            },
            content: emit_inlines(content, &[]),
        }),
        Block::List { ordered, items } => {
            let content = items
                .iter()
                .map(emit_list_item)
                .collect::<Result<Vec<_>>>()?;
            Ok(if *ordered {
                AdfNode::OrderedList { content }
            } else {
                AdfNode::BulletList { content }
            })
        }
        Block::CodeBlock { language, code } => Ok(AdfNode::CodeBlock {
            attrs: language.as_ref().map(|l| CodeBlockAttrs {
                language: l.clone(),
            }),
            content: if code.is_empty() {
                Vec::new()
            } else {
                vec![AdfNode::Text {
                    text: code.clone(),
                    marks: Vec::new(),
                }]
            },
        }),
        Block::ThematicBreak => Ok(AdfNode::Rule),
        Block::BlockQuote(_) => Err(Error::UnsupportedConstruct("blockquote".to_string())),
    }
}

fn emit_list_item(item: &ListItem) -> Result<AdfNode> {
    let mut paragraph = Vec::new();
    if let Some(checked) = item.checked {
        let prefix = if checked { "[x] " } else { "[ ] " };
        paragraph.push(AdfNode::Text {
            text: prefix.to_string(),
            marks: Vec::new(),
        });
    }
    paragraph.extend(emit_inlines(&item.content, &[]));

    let mut content = vec![AdfNode::Paragraph { content: paragraph }];
    for child in &item.children {
        content.push(emit_block(child)?);
    }
    Ok(AdfNode::ListItem { content })
}

/// Flatten nested inline spans into text nodes carrying composed marks.
fn emit_inlines(inlines: &[Inline], marks: &[AdfMark]) -> Vec<AdfNode> {
    let mut out = Vec::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push(AdfNode::Text {
                text: text.clone(),
                marks: marks.to_vec(),
            }),
            Inline::Code(code) => out.push(AdfNode::Text {
                text: code.clone(),
                marks: with_mark(marks, AdfMark::Code),
            }),
            Inline::Strong(children) => {
                out.extend(emit_inlines(children, &with_mark(marks, AdfMark::Strong)));
            }
            Inline::Emphasis(children) => {
                out.extend(emit_inlines(children, &with_mark(marks, AdfMark::Em)));
            }
            Inline::Link { content, url } => {
                let mark = AdfMark::Link {
                    attrs: LinkAttrs { href: url.clone() },
                };
                out.extend(emit_inlines(content, &with_mark(marks, mark)));
            }
            Inline::Image { alt, .. } => out.push(AdfNode::Text {
                text: format!("[Image: {alt}]"),
                marks: Vec::new(),
            }),
        }
    }
    out
}

fn with_mark(marks: &[AdfMark], mark: AdfMark) -> Vec<AdfMark> {
    let mut composed = marks.to_vec();
    if !composed.contains(&mark) {
        composed.push(mark);
    }
    composed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document() {
        let doc = markdown_to_adf("").unwrap();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"type": "doc", "version": 1, "content": []})
        );
    }

    #[test]
    fn test_mixed_document_end_to_end() {
        let doc =
            markdown_to_adf("# Title\n\nSome **bold** text.\n\n- item one\n- item two").unwrap();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "doc",
                "version": 1,
                "content": [
                    {
                        "type": "heading",
                        "attrs": {"level": 1},
                        "content": [{"type": "text", "text": "Title"}]
                    },
                    {
                        "type": "paragraph",
                        "content": [
                            {"type": "text", "text": "Some "},
                            {"type": "text", "text": "bold", "marks": [{"type": "strong"}]},
                            {"type": "text", "text": " text."}
                        ]
                    },
                    {
                        "type": "bulletList",
                        "content": [
                            {
                                "type": "listItem",
                                "content": [{
                                    "type": "paragraph",
                                    "content": [{"type": "text", "text": "item one"}]
                                }]
                            },
                            {
                                "type": "listItem",
                                "content": [{
                                    "type": "paragraph",
                                    "content": [{"type": "text", "text": "item two"}]
                                }]
                            }
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_marks_compose_on_one_text_node() {
        let doc = markdown_to_adf("***both*** and `code`").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        let runs = &value["content"][0]["content"];
        assert_eq!(runs[0]["text"], "both");
        assert_eq!(
            runs[0]["marks"],
            json!([{"type": "strong"}, {"type": "em"}])
        );
        assert_eq!(runs[2]["marks"], json!([{"type": "code"}]));
    }

    #[test]
    fn test_span_boundaries_preserved() {
        let doc = markdown_to_adf("Some **bold** and *italic* and `code` here").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        let runs = value["content"][0]["content"].as_array().unwrap();
        let texts: Vec<&str> = runs.iter().map(|r| r["text"].as_str().unwrap()).collect();
        assert_eq!(
            texts,
            vec!["Some ", "bold", " and ", "italic", " and ", "code", " here"]
        );
    }

    #[test]
    fn test_link_mark_carries_href() {
        let doc = markdown_to_adf("[docs](https://example.com)").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["content"][0]["content"][0]["marks"],
            json!([{"type": "link", "attrs": {"href": "https://example.com"}}])
        );
    }

    #[test]
    fn test_no_empty_marks_arrays() {
        let doc = markdown_to_adf("plain text\n\n- item").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        fn check(node: &serde_json::Value) {
            if let Some(marks) = node.get("marks") {
                assert!(!marks.as_array().unwrap().is_empty());
            }
            if let Some(content) = node.get("content") {
                for child in content.as_array().unwrap() {
                    check(child);
                }
            }
        }
        check(&value);
    }

    #[test]
    fn test_blockquote_is_rejected() {
        let err = markdown_to_adf("> quoted text").unwrap_err();
        assert_eq!(err, Error::UnsupportedConstruct("blockquote".to_string()));
    }

    #[test]
    fn test_image_becomes_placeholder() {
        let doc = markdown_to_adf("![alt](http://x/y.png)").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["content"][0]["content"],
            json!([{"type": "text", "text": "[Image: alt]"}])
        );
    }

    #[test]
    fn test_task_item_gets_literal_prefix() {
        let doc = markdown_to_adf("- [ ] open\n- [x] done").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["content"][0]["type"], "bulletList");
        let first = &value["content"][0]["content"][0]["content"][0]["content"];
        assert_eq!(first[0]["text"], "[ ] ");
        assert_eq!(first[1]["text"], "open");
        let second = &value["content"][0]["content"][1]["content"][0]["content"];
        assert_eq!(second[0]["text"], "[x] ");
    }

    #[test]
    fn test_code_block_language_attr() {
        let doc = markdown_to_adf("```rust\nlet x = 1;\n```").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["content"][0],
            json!({
                "type": "codeBlock",
                "attrs": {"language": "rust"},
                "content": [{"type": "text", "text": "let x = 1;"}]
            })
        );
    }

    #[test]
    fn test_code_block_without_language_omits_attrs() {
        let doc = markdown_to_adf("```\nx\n```").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value["content"][0].get("attrs").is_none());
    }

    #[test]
    fn test_rule() {
        let doc = markdown_to_adf("---").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["content"][0], json!({"type": "rule"}));
    }

    #[test]
    fn test_nested_list_structure() {
        let doc = markdown_to_adf("- a\n  1. x\n- b").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        let first_item = &value["content"][0]["content"][0];
        assert_eq!(first_item["content"][0]["type"], "paragraph");
        assert_eq!(first_item["content"][1]["type"], "orderedList");
    }

    #[test]
    fn test_blockquote_nested_in_list_is_still_rejected() {
        // quotes cannot nest under list items in this parser, but a document
        // mixing lists and a quote block must still fail as a whole
        let err = markdown_to_adf("- fine\n\n> not fine").unwrap_err();
        assert!(matches!(err, Error::UnsupportedConstruct(_)));
    }

    #[test]
    fn test_unterminated_emphasis_survives_conversion() {
        let doc = markdown_to_adf("**bold without close").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["content"][0]["content"],
            json!([{"type": "text", "text": "**bold without close"}])
        );
    }

    #[test]
    fn test_heading_level_is_clamped() {
        let doc = to_adf(&[Block::Heading {
            level: 9,
            content: vec![crate::ast::Inline::Text("x".to_string())],
        }])
        .unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["content"][0]["attrs"]["level"], 6);
    }
}
