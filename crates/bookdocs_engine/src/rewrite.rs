use std::collections::HashSet;

use ego_tree::{NodeId, NodeRef};
use scraper::node::{Element, Node};
use scraper::{Html, Selector};

use crate::convert::Converter;

const NOTE_SELECTOR: &str = "div.note";
const CLI_SELECTOR: &str = "p.cli";
const ADMONITION_TAG: &str = "!!! note";
const SHELL_FENCE: &str = "```bash";
const INDENT: &str = "    ";

// Containers whose content the converter never renders.
const DROPPED_ELEMENTS: &[&str] = &["head", "script", "style"];

// Elements that start a new line inside a shell command.
const LINE_BLOCKS: &[&str] = &["div", "p", "pre", "li", "tr"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockKind {
    /// Inner HTML of a `div.note`, already rewritten.
    Admonition { inner_html: String },
    /// Text content of a `p.cli`.
    ShellCommand { command: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Block {
    token: String,
    kind: BlockKind,
}

/// HTML with every note and cli element swapped for a placeholder paragraph.
///
/// The placeholders survive Markdown conversion untouched and are replaced
/// by the finished blocks in [`RewrittenHtml::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenHtml {
    pub html: String,
    blocks: Vec<Block>,
}

impl RewrittenHtml {
    pub fn admonition_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::Admonition { .. }))
            .count()
    }

    pub fn shell_block_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::ShellCommand { .. }))
            .count()
    }

    /// Splice rendered admonitions and shell fences into converted Markdown.
    pub fn finish(&self, markdown: &str, converter: &dyn Converter) -> String {
        self.splice(markdown, converter)
    }

    fn splice(&self, text: &str, converter: &dyn Converter) -> String {
        let mut out = String::with_capacity(text.len());
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.splice_line(line, converter, &mut out);
        }
        out
    }

    /// A placeholder that ends its line takes the line's lead (list indent or
    /// marker) onto the block, and every further block line is hung under it.
    fn splice_line(&self, line: &str, converter: &dyn Converter, out: &mut String) {
        let found = self
            .blocks
            .iter()
            .filter_map(|block| line.find(&block.token).map(|pos| (block, pos)))
            .min_by_key(|(_, pos)| *pos);
        let Some((block, pos)) = found else {
            out.push_str(line);
            return;
        };

        let lead = &line[..pos];
        let rest = &line[pos + block.token.len()..];
        let rendered = self.render(block, converter);
        out.push_str(lead);
        if !rest.trim().is_empty() {
            out.push_str(&rendered);
            self.splice_line(rest, converter, out);
            return;
        }

        let hanging: String = lead
            .chars()
            .map(|c| if c.is_whitespace() { c } else { ' ' })
            .collect();
        for (i, rendered_line) in rendered.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
                if !rendered_line.is_empty() {
                    out.push_str(&hanging);
                }
            }
            out.push_str(rendered_line);
        }
    }

    fn render(&self, block: &Block, converter: &dyn Converter) -> String {
        match &block.kind {
            BlockKind::Admonition { inner_html } => {
                // Nested blocks only ever appear inside their parent's content.
                let body = self.splice(&converter.to_markdown(inner_html), converter);
                let body = indent(body.trim());
                if body.is_empty() {
                    ADMONITION_TAG.to_string()
                } else {
                    format!("{ADMONITION_TAG}\n{body}")
                }
            }
            BlockKind::ShellCommand { command } => {
                format!("{SHELL_FENCE}\n{command}\n```")
            }
        }
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Finds `div.note` and `p.cli` elements in a parsed tree and replaces them.
///
/// Matching is structural, so sibling elements with the same class are never
/// merged and a match never ends at a nested closing tag.
#[derive(Debug)]
pub struct PatternRewriter {
    note: Selector,
    cli: Selector,
}

impl PatternRewriter {
    pub fn new() -> Self {
        Self {
            note: Selector::parse(NOTE_SELECTOR).expect("valid note selector"),
            cli: Selector::parse(CLI_SELECTOR).expect("valid cli selector"),
        }
    }

    pub fn rewrite(&self, html: &str) -> RewrittenHtml {
        let document = Html::parse_document(html);
        let notes: HashSet<NodeId> = document.select(&self.note).map(|e| e.id()).collect();
        let clis: HashSet<NodeId> = document.select(&self.cli).map(|e| e.id()).collect();

        let mut serializer = Serializer {
            notes,
            clis,
            blocks: Vec::new(),
        };
        let mut out = String::with_capacity(html.len());
        for child in document.tree.root().children() {
            serializer.write_node(child, &mut out);
        }

        RewrittenHtml {
            html: out,
            blocks: serializer.blocks,
        }
    }
}

impl Default for PatternRewriter {
    fn default() -> Self {
        Self::new()
    }
}

struct Serializer {
    notes: HashSet<NodeId>,
    clis: HashSet<NodeId>,
    blocks: Vec<Block>,
}

impl Serializer {
    fn write_node(&mut self, node: NodeRef<'_, Node>, out: &mut String) {
        match node.value() {
            Node::Text(text) => escape_text(text, out),
            Node::Element(element) => {
                if self.notes.contains(&node.id()) {
                    let mut inner = String::new();
                    self.write_children(node, &mut inner);
                    let token = self.push(BlockKind::Admonition { inner_html: inner });
                    push_placeholder(&token, out);
                } else if self.clis.contains(&node.id()) {
                    let command = collect_text(node);
                    let command = command.trim_matches(|c: char| c == '\n' || c == '\r');
                    let token = self.push(BlockKind::ShellCommand {
                        command: command.to_string(),
                    });
                    push_placeholder(&token, out);
                } else {
                    self.write_element(node, element, out);
                }
            }
            Node::Document | Node::Fragment => self.write_children(node, out),
            _ => {}
        }
    }

    fn write_element(&mut self, node: NodeRef<'_, Node>, element: &Element, out: &mut String) {
        let name = element.name();
        if DROPPED_ELEMENTS.contains(&name) {
            return;
        }
        out.push('<');
        out.push_str(name);
        for (attr, value) in element.attrs() {
            out.push(' ');
            out.push_str(attr);
            out.push_str("=\"");
            if is_destination(name, attr) {
                escape_attr(&protect_destination(value), out);
            } else {
                escape_attr(value, out);
            }
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        self.write_children(node, out);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    fn write_children(&mut self, node: NodeRef<'_, Node>, out: &mut String) {
        for child in node.children() {
            self.write_node(child, out);
        }
    }

    fn push(&mut self, kind: BlockKind) -> String {
        let token = format!("BOOKDOCSBLOCK{}X", self.blocks.len());
        self.blocks.push(Block {
            token: token.clone(),
            kind,
        });
        token
    }
}

fn push_placeholder(token: &str, out: &mut String) {
    out.push_str("<p>");
    out.push_str(token);
    out.push_str("</p>");
}

/// Text of a command element with `<br>` and block boundaries as line breaks.
fn collect_text(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    for child in node.children() {
        collect_lines(child, &mut out);
    }
    out
}

fn collect_lines(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let name = element.name();
            if name == "br" {
                out.push('\n');
                return;
            }
            let block = LINE_BLOCKS.contains(&name);
            if block {
                break_line(out);
            }
            for child in node.children() {
                collect_lines(child, out);
            }
            if block {
                break_line(out);
            }
        }
        _ => {}
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn is_destination(element: &str, attr: &str) -> bool {
    matches!((element, attr), ("a", "href") | ("img", "src"))
}

/// Keep link targets intact through conversion: no surrounding whitespace
/// and no bare spaces that would end a Markdown destination early.
fn protect_destination(value: &str) -> String {
    value.trim().replace(' ', "%20")
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_leaves_blank_lines_empty() {
        assert_eq!(indent("a\n\nb"), "    a\n\n    b");
    }

    #[test]
    fn command_text_breaks_at_br_and_blocks() {
        let document =
            Html::parse_fragment("<div>dotnet build<br>dotnet run<div>dotnet test</div></div>");
        let text = collect_text(document.tree.root());
        assert_eq!(text, "dotnet build\ndotnet run\ndotnet test\n");
    }

    #[test]
    fn destinations_lose_spaces() {
        assert_eq!(protect_destination(" img/my pic.png "), "img/my%20pic.png");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut out = String::new();
        escape_text("a < b & c", &mut out);
        assert_eq!(out, "a &lt; b &amp; c");
        out.clear();
        escape_attr("say \"hi\"", &mut out);
        assert_eq!(out, "say &quot;hi&quot;");
    }
}
