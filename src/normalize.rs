//! Strip email transport artifacts before field extraction

use regex::Regex;
use std::sync::LazyLock;

/// Header labels removed from the start of a line through its end
const HEADER_LABELS: &[&str] = &[
    "From",
    "To",
    "Subject",
    "Date",
    "Reply-To",
    "CC",
    "BCC",
    "Message-ID",
    "X-Mailer",
    "Content-Type",
    "Content-Transfer-Encoding",
    "MIME-Version",
];

static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let labels = HEADER_LABELS
        .iter()
        .map(|label| regex::escape(label))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?im)^[ \t]*(?:{labels}):[^\n]*\n?")).unwrap()
});

// Everything from the first closing phrase to the end of text is signature
static SIGNATURE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"--[ \t]*\r?\n",
        r"(?i)Best regards,",
        r"(?i)Sincerely,",
        r"(?i)Thanks,",
        r"(?i)Thank you,",
        r"(?i)Regards,",
        r"(?i)Yours truly,",
        r"(?i)Kind regards,",
        r"(?i)Best wishes,",
        r"(?i)Cheers,",
        r"(?i)Take care,",
        r"(?i)All the best,",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Quoted replies and forwarded messages, removed through the end of text
static QUOTED_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?s)From:.*?Sent:.*?To:.*?Subject:",
        r"(?s)\bOn\b.*?wrote:",
        r"(?s)From:.*?Date:.*?To:.*?Subject:",
        r"(?i)-{2,}\s*Forwarded message\s*-{2,}",
        r"(?i)-{2,}\s*Original Message\s*-{2,}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Normalize raw email text.
///
/// Header lines go first, then the signature block, then quoted or
/// forwarded content. Remaining whitespace runs collapse to single spaces.
#[must_use]
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let without_headers = strip_headers(text);
    let without_signature = truncate_at_first(&without_headers, &SIGNATURE_REGEXES);
    let without_quoted = truncate_at_first(without_signature, &QUOTED_REGEXES);

    collapse_whitespace(without_quoted)
}

/// Remove header-style lines
#[must_use]
pub fn strip_headers(text: &str) -> String {
    HEADER_REGEX.replace_all(text, "").into_owned()
}

/// Collapse every whitespace run to a single space and trim
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_at_first<'a>(text: &'a str, patterns: &[Regex]) -> &'a str {
    let cut = patterns
        .iter()
        .filter_map(|re| re.find(text).map(|m| m.start()))
        .min()
        .unwrap_or(text.len());
    &text[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_picks_earliest_phrase() {
        let text = "Body. Cheers, A\nThanks, B";
        assert_eq!(truncate_at_first(text, &SIGNATURE_REGEXES), "Body. ");
    }

    #[test]
    fn test_header_only_at_line_start() {
        let text = "Reach out To: nobody\nSubject: gone\nkept";
        assert_eq!(strip_headers(text), "Reach out To: nobody\nkept");
    }
}
