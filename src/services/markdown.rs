//! Markdown decoration stripping for single lines of model output.

use regex::Regex;
use std::sync::LazyLock;

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s*").expect("valid heading marker regex"));
static QUOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s*").expect("valid quote marker regex"));
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+•]|\d+[.)])\s+").expect("valid list marker regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("valid link regex"));
static STRONG_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b__([^_\n]+)__\b").expect("valid strong underscore regex"));
static EM_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_\n]+)_\b").expect("valid emphasis underscore regex"));
static INLINE_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*+|`+|~~").expect("valid inline marker regex"));
static RUNS_OF_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid whitespace regex"));

/// Reduce one line of markdown to plain text.
///
/// Removes heading, quote and list-item prefixes, collapses `[text](url)`
/// to `text`, and drops bold/italic/code/strike markers. Words are never
/// removed, so `- **Morning:** visit [Fort](http://x)` becomes
/// `Morning: visit Fort`.
pub fn strip_markdown(line: &str) -> String {
    let line = line.trim();
    let line = HEADING_MARKER.replace(line, "");
    let line = QUOTE_MARKER.replace(&line, "");
    let line = LIST_MARKER.replace(&line, "");
    let line = LINK.replace_all(&line, "$1");
    let line = STRONG_UNDERSCORE.replace_all(&line, "$1");
    let line = EM_UNDERSCORE.replace_all(&line, "$1");
    let line = INLINE_MARKERS.replace_all(&line, "");
    let line = RUNS_OF_SPACES.replace_all(&line, " ");
    line.trim().to_string()
}

/// Split a block on line breaks and strip each line, dropping lines that end up empty.
pub fn plain_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(strip_markdown)
        .filter(|line| !line.is_empty())
        .collect()
}
