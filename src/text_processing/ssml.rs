/// Markdown → SSML cleanup for speech synthesis
///
/// Model output tends to be Markdown. Read verbatim, a speech engine says
/// "asterisk" and runs bullet points together, so the text is flattened
/// into one sentence per former line and wrapped in a `<speak>` root.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One to three emphasis markers on each side: *a*, **a**, ***a***
    static ref EMPHASIS_REGEX: Regex = Regex::new(r"\*{1,3}([^*]+)\*{1,3}").unwrap();

    /// Heading markers at the start of a line
    static ref HEADING_REGEX: Regex = Regex::new(r"(?m)^#{1,6}\s*").unwrap();

    /// Leading bullet marker: *, - or •
    static ref BULLET_REGEX: Regex = Regex::new(r"^\s*[\*\-•]\s*").unwrap();

    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

pub const SPEAK_OPEN: &str = "<speak>";
pub const SPEAK_CLOSE: &str = "</speak>";

const TERMINAL_PUNCTUATION: [char; 5] = ['.', '!', '?', ',', ';'];

/// Convert model output into an SSML document
///
/// Never fails. Not idempotent: the wrap guard is a plain substring test
/// for `<speak>`, so partial or malformed markup from the model is passed
/// through as is. A line that ends in a closing tag still gets a period
/// appended after the tag.
pub fn markdown_to_ssml(text: &str) -> String {
    let text = EMPHASIS_REGEX.replace_all(text, "$1");
    let text = HEADING_REGEX.replace_all(&text, "");

    let sentences: Vec<String> = text
        .split('\n')
        .filter_map(|line| {
            let line = BULLET_REGEX.replace(line, "");
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            Some(terminate_sentence(line))
        })
        .collect();

    let joined = sentences.join(" ");
    let collapsed = WHITESPACE_REGEX.replace_all(&joined, " ");
    let collapsed = collapsed.trim();

    if collapsed.contains(SPEAK_OPEN) {
        collapsed.to_string()
    } else {
        format!("{}{}{}", SPEAK_OPEN, collapsed, SPEAK_CLOSE)
    }
}

/// Ensure a line ends in punctuation so the engine pauses after it
fn terminate_sentence(line: &str) -> String {
    match line.chars().last() {
        Some(c) if TERMINAL_PUNCTUATION.contains(&c) => line.to_string(),
        _ => format!("{}.", line),
    }
}
