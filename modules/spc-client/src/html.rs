// SPC discussion pages wrap the product text in a single <pre> block with a
// few <a>/<font> tags sprinkled in. Pull that block out as plain text.

use std::sync::LazyLock;

use regex::Regex;

static PRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").expect("valid regex"));
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Plain text of the first `<pre>` block, or `None` if the page has none.
pub fn extract_preformatted(html: &str) -> Option<String> {
    let inner = PRE_RE.captures(html)?.get(1)?.as_str();
    Some(strip_markup(inner))
}

/// Line breaks to newlines, drop every remaining tag, then unescape the
/// entities SPC actually emits. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn strip_markup(fragment: &str) -> String {
    let text = BR_RE.replace_all(fragment, "\n");
    let text = TAG_RE.replace_all(&text, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
