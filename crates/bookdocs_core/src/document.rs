/// Stem prefix that marks a chapter source, e.g. `chapter3`.
pub const CHAPTER_PREFIX: &str = "chapter";

/// Stem of the navigation fragment that is never converted.
pub const NAVIGATION_STEM: &str = "navbar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    /// Chapter number as written in the stem, leading zeros included.
    Chapter(String),
    Other,
}

/// Classify a source stem by the `chapter<N>` naming convention.
///
/// The chapter number is the run of ASCII digits right after the prefix and
/// ends at the first non-digit. It is kept as text, so its length is not
/// bounded. Stems without such a run are `Other`.
pub fn classify(stem: &str) -> DocumentKind {
    let Some(rest) = stem.strip_prefix(CHAPTER_PREFIX) else {
        return DocumentKind::Other;
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    match &rest[..digits_end] {
        "" => DocumentKind::Other,
        digits => DocumentKind::Chapter(digits.to_string()),
    }
}

/// Human title for a stem: hyphens become spaces, then each word is title-cased.
///
/// A letter is upper-cased when it starts a word (i.e. follows a non-letter)
/// and lower-cased otherwise, so `chapter3a` yields `Chapter3A`.
pub fn derive_title(stem: &str) -> String {
    let mut title = String::with_capacity(stem.len());
    let mut in_word = false;
    for c in stem.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_stop_at_first_delimiter() {
        assert_eq!(classify("chapter12-intro"), DocumentKind::Chapter("12".into()));
        assert_eq!(classify("chapter7_draft"), DocumentKind::Chapter("7".into()));
    }

    #[test]
    fn prefix_without_digits_is_not_a_chapter() {
        assert_eq!(classify("chapters"), DocumentKind::Other);
        assert_eq!(classify("chapter"), DocumentKind::Other);
    }

    #[test]
    fn long_digit_runs_are_kept_whole() {
        assert_eq!(
            classify("chapter99999999999"),
            DocumentKind::Chapter("99999999999".into())
        );
    }

    #[test]
    fn title_lowercases_inside_words() {
        assert_eq!(derive_title("GARBAGE-collection"), "Garbage Collection");
    }
}
