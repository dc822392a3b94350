/// HTML to Markdown transformation used for whole documents and for the
/// inner content of admonitions.
pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

/// `html2md` with its stock behaviour: no line wrapping, inline links,
/// images and emphasis kept, fragment links kept, Unicode passed through.
/// Malformed markup is parsed leniently and never fails.
///
/// `html2md` underlines `<h1>`/`<h2>`; those are rewritten as `#`/`##` so every
/// heading level uses the same marker style.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        atx_headings(&html2md::parse_html(html))
    }
}

/// `Title` over a run of `=` or `-` becomes `# Title` or `## Title`.
/// Fenced code is left alone.
fn atx_headings(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        } else if !in_fence && !line.trim().is_empty() {
            if let Some(level) = lines.get(i + 1).and_then(|next| underline_level(next)) {
                out.push(format!("{} {}", "#".repeat(level), line.trim()));
                i += 2;
                continue;
            }
        }
        out.push(line.to_string());
        i += 1;
    }
    out.join("\n")
}

fn underline_level(line: &str) -> Option<usize> {
    let line = line.trim_end();
    if line.len() < 3 {
        return None;
    }
    if line.bytes().all(|b| b == b'=') {
        Some(1)
    } else if line.bytes().all(|b| b == b'-') {
        Some(2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underlined_headings_get_hash_markers() {
        assert_eq!(
            atx_headings("Title\n==========\n\nSub\n----------\n\nx"),
            "# Title\n\n## Sub\n\nx"
        );
    }

    #[test]
    fn rules_after_blank_lines_stay() {
        assert_eq!(atx_headings("text\n\n---\n\nmore"), "text\n\n---\n\nmore");
    }

    #[test]
    fn fenced_code_is_untouched() {
        let code = "```\nold\n---\n```";
        assert_eq!(atx_headings(code), code);
    }

    #[test]
    fn converter_writes_hash_headings() {
        let md = Html2MdConverter.to_markdown("<h1>Title</h1><h2>Sub</h2><p>x</p>");
        assert!(md.contains("# Title"), "unexpected markdown: {md:?}");
        assert!(md.contains("## Sub"), "unexpected markdown: {md:?}");
        assert!(!md.contains("=="), "unexpected markdown: {md:?}");
    }
}
