use std::sync::OnceLock;

use bookdocs_core::derive_title;
use regex::Regex;

/// Provenance line written into every converted chapter.
pub const DEFAULT_DESCRIPTION: &str = "Перевод главы из книги Pro .NET Memory Management";

fn h1_spacing() -> &'static Regex {
    static H1_SPACING: OnceLock<Regex> = OnceLock::new();
    H1_SPACING.get_or_init(|| Regex::new(r"(?m)^#[ \t]+").expect("valid regex"))
}

/// Collapse the run of blanks after a first-level `#` marker to one space.
/// Deeper headings are left alone.
pub fn normalize_headings(markdown: &str) -> String {
    h1_spacing().replace_all(markdown, "# ").into_owned()
}

pub fn build_chapter_document(stem: &str, body_markdown: &str, description: &str) -> String {
    let frontmatter = format!(
        "---\ntitle: {title}\ndescription: {description}\n---\n\n",
        title = derive_title(stem),
        description = description,
    );
    let body = normalize_headings(body_markdown);
    let body = body.trim_matches('\n');
    if body.trim().is_empty() {
        return frontmatter;
    }
    format!(
        "{frontmatter}{body}\n",
        frontmatter = frontmatter,
        body = body.trim_end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irregular_h1_spacing_is_collapsed() {
        assert_eq!(normalize_headings("#   Title\ntext"), "# Title\ntext");
        assert_eq!(normalize_headings("#\tTitle"), "# Title");
    }

    #[test]
    fn deeper_headings_are_untouched() {
        assert_eq!(normalize_headings("##    Sub"), "##    Sub");
    }

    #[test]
    fn marker_must_start_the_line() {
        assert_eq!(normalize_headings("a #   b"), "a #   b");
    }

    #[test]
    fn empty_body_yields_header_only() {
        let doc = build_chapter_document("index", "\n\n", DEFAULT_DESCRIPTION);
        assert_eq!(
            doc,
            format!("---\ntitle: Index\ndescription: {DEFAULT_DESCRIPTION}\n---\n\n")
        );
    }
}
