//! Best-effort section parsing for SPC mesoscale discussion text.
//!
//! The product text isn't machine-readable by contract. Sections are
//! introduced by a label and `...`:
//!
//! ```text
//!    Areas affected...Parts of central Oklahoma
//!    Concerning...Severe potential...Watch likely
//!    Valid 141945Z - 142115Z
//!    Probability of Watch Issuance...80 percent
//!
//!    SUMMARY...Supercells capable of large hail are expected.
//!
//!    DISCUSSION...Visible imagery shows...
//!
//!    ..Smith.. 02/14/2025
//! ```
//!
//! Single-line fields take the rest of their line. `SUMMARY` and `DISCUSSION`
//! run until the next all-caps `LABEL...` line, a `..` signature line, another
//! `MESOSCALE` header, or end of text. Nothing here fails: unmatched labels are
//! empty strings.

use std::sync::LazyLock;

use regex::Regex;
use stormfeed_common::DiscussionDetails;

const ANCHOR: &str = "MESOSCALE DISCUSSION";

struct InlineLabel {
    dotted: Regex,
    spaced: Regex,
}

impl InlineLabel {
    fn new(label: &str) -> Self {
        Self {
            dotted: Regex::new(&format!(r"(?im)^[ \t]*{label}\.{{3}}(.*)$")).expect("valid regex"),
            spaced: Regex::new(&format!(r"(?im)^[ \t]*{label}[ \t]+(.*)$")).expect("valid regex"),
        }
    }

    /// `LABEL...value` wins over `LABEL value` anywhere in the text.
    fn find(&self, text: &str) -> String {
        self.dotted
            .captures(text)
            .or_else(|| self.spaced.captures(text))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }
}

static AREAS_AFFECTED: LazyLock<InlineLabel> = LazyLock::new(|| InlineLabel::new(r"AREAS?[ \t]+AFFECTED"));
static CONCERNING: LazyLock<InlineLabel> = LazyLock::new(|| InlineLabel::new("CONCERNING"));
static VALID: LazyLock<InlineLabel> = LazyLock::new(|| InlineLabel::new("VALID"));
static PROBABILITY: LazyLock<InlineLabel> =
    LazyLock::new(|| InlineLabel::new(r"PROBABILITY[ \t]+OF[ \t]+WATCH[ \t]+ISSUANCE"));

static SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*SUMMARY\.{3}").expect("valid regex"));
static DISCUSSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*DISCUSSION\.{3}").expect("valid regex"));

/// Start of the next section: an all-caps label with ellipsis, a `..`
/// forecaster signature, or a new product header. Label case is significant
/// so narrative sentences ending in "..." don't cut a block short.
static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[A-Z][A-Z /]{2,}\.{3}|\.\.|(?i:MESOSCALE))").expect("valid regex")
});

/// Parsed discussion text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Text from the `MESOSCALE DISCUSSION` header on, or the whole input
    /// when there is no header.
    pub body: String,
    pub details: DiscussionDetails,
}

impl ExtractedText {
    /// First `max_chars` characters of the body, for display when no sections
    /// were recognised.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let trimmed = self.body.trim();
        if trimmed.chars().count() <= max_chars {
            return trimmed.to_string();
        }
        let mut out: String = trimmed.chars().take(max_chars).collect();
        out.push_str("...");
        out
    }
}

/// Split discussion text into its labelled sections.
pub fn extract(raw: &str) -> ExtractedText {
    let body = match raw.to_ascii_uppercase().find(ANCHOR) {
        Some(idx) => &raw[idx..],
        None => raw,
    };

    let details = DiscussionDetails {
        areas_affected: AREAS_AFFECTED.find(body),
        concerning: CONCERNING.find(body),
        valid: VALID.find(body),
        summary: block(body, &SUMMARY),
        discussion: block(body, &DISCUSSION),
        probability: PROBABILITY.find(body),
    };

    ExtractedText {
        body: body.to_string(),
        details,
    }
}

fn block(text: &str, label: &Regex) -> String {
    let Some(start) = label.find(text) else {
        return String::new();
    };

    let mut lines = text[start.end()..].lines();
    let mut parts: Vec<&str> = lines.next().into_iter().collect();
    parts.extend(lines.take_while(|line| !BLOCK_END.is_match(line)));

    parts
        .iter()
        .flat_map(|line| line.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
