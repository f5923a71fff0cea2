//! Markdown-to-HTML fragment rendering.
//!
//! [`render`] maps raw message text to an HTML fragment by applying a
//! fixed sequence of substitutions. The rule order is load-bearing:
//! fenced code resolves before inline code, and bold before italic, so
//! that a later rule never splits the delimiters a earlier rule should
//! have consumed (`**bold**` must not be torn apart by the single-`*`
//! italic rule).
//!
//! # Supported constructs
//!
//! | Construct | Syntax | Output |
//! |-----------|--------|--------|
//! | Fenced code | ```` ```code``` ```` | `<pre><code>…</code></pre>` |
//! | Inline code | `` `code` `` | `<code>…</code>` |
//! | Bold | `**text**` or `__text__` | `<strong>…</strong>` |
//! | Italic | `*text*` or `_text_` | `<em>…</em>` |
//! | Link | `[text](url)` | `<a href="url" …>text</a>` |
//! | Line break | `\n` | `<br>` |
//!
//! Raw HTML in the input is **not** escaped: literal angle-bracket
//! content passes through untouched. Transcripts are rendered from the
//! user's own session; the behavior is pinned by a test.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("fenced code pattern is valid"));

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"));

static BOLD_ASTERISKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern is valid"));

static BOLD_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_]+)__").expect("bold underscore pattern is valid"));

static ITALIC_ASTERISK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("italic pattern is valid"));

static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_]+)_").expect("italic underscore pattern is valid"));

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid"));

/// Renders message text to an HTML fragment.
///
/// Pure and deterministic: the same input always produces the same
/// fragment, and nothing outside the returned string is touched.
///
/// For input containing none of the supported delimiters, the output is
/// the input with every `\n` replaced by `<br>` and nothing else altered.
///
/// # Examples
///
/// ```
/// use nebula_markdown::render;
///
/// assert_eq!(render("**a** *b*"), "<strong>a</strong> <em>b</em>");
/// assert_eq!(render("line one\nline two"), "line one<br>line two");
/// ```
#[must_use]
pub fn render(text: &str) -> String {
    let html = FENCED_CODE.replace_all(text, "<pre><code>$1</code></pre>");
    let html = INLINE_CODE.replace_all(&html, "<code>$1</code>");
    let html = BOLD_ASTERISKS.replace_all(&html, "<strong>$1</strong>");
    let html = BOLD_UNDERSCORES.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC_ASTERISK.replace_all(&html, "<em>$1</em>");
    let html = ITALIC_UNDERSCORE.replace_all(&html, "<em>$1</em>");
    let html = LINK.replace_all(
        &html,
        r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#,
    );
    html.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render("hello world"), "hello world");
    }

    #[test]
    fn delimiter_free_text_only_gets_line_breaks() {
        assert_eq!(render("one\ntwo\nthree"), "one<br>two<br>three");
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn bold_resolves_before_italic() {
        // Regression test for delimiter-order correctness: the italic rule
        // must not split the double-asterisk pair.
        assert_eq!(render("**a** *b*"), "<strong>a</strong> <em>b</em>");
    }

    #[test]
    fn underscore_variants() {
        assert_eq!(render("__a__"), "<strong>a</strong>");
        assert_eq!(render("_a_"), "<em>a</em>");
    }

    #[test]
    fn inline_code() {
        assert_eq!(render("use `cargo test` here"), "use <code>cargo test</code> here");
    }

    #[test]
    fn fenced_code_resolves_before_inline_code() {
        assert_eq!(
            render("```let x = 1;```"),
            "<pre><code>let x = 1;</code></pre>"
        );
    }

    #[test]
    fn fenced_code_newlines_become_breaks() {
        // The line-break rule runs last and also applies inside code
        // blocks.
        assert_eq!(
            render("```a\nb```"),
            "<pre><code>a<br>b</code></pre>"
        );
    }

    #[test]
    fn links_open_in_new_context() {
        assert_eq!(
            render("[docs](https://example.com)"),
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">docs</a>"#
        );
    }

    #[test]
    fn raw_html_is_not_escaped() {
        // No escaping is performed before substitution: markup in the
        // input reaches the output verbatim.
        assert_eq!(render("<b>already html</b>"), "<b>already html</b>");
    }

    #[test]
    fn mixed_message_renders_all_constructs() {
        let input = "⚠️ **Connection error**\n\nDetails: `timeout`";
        let html = render(input);

        assert!(html.contains("<strong>Connection error</strong>"));
        assert!(html.contains("<code>timeout</code>"));
        assert!(html.contains("<br><br>"));
    }

    #[test]
    fn render_is_deterministic() {
        let input = "**a** `b` [c](d)\ne";
        assert_eq!(render(input), render(input));
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Rendered output never contains raw newlines.
        #[test]
        fn output_has_no_raw_newlines(text in "\\PC*(\n\\PC*){0,5}") {
            prop_assert!(!render(&text).contains('\n'));
        }

        /// Delimiter-free input is returned unchanged.
        #[test]
        fn delimiter_free_is_identity(text in "[a-zA-Z0-9 .,!?]{0,80}") {
            prop_assert_eq!(render(&text), text);
        }
    }
}
