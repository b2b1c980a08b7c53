//! HTML handling for rich-text fields produced by the browser editor.
//!
//! Three views of the same markup:
//! - `sanitize_rich_text`: safe HTML for the preview (tag whitelist, no attributes),
//! - `strip_html`: raw text for size estimates,
//! - `html_to_text`: readable text with line breaks and bullets, for reshaped AI output.

/// Tags kept by `sanitize_rich_text`. Everything else is dropped (contents kept).
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "b", "strong", "i", "em", "u", "s", "ul", "ol", "li", "h3", "h4", "span", "div",
];

/// Tags whose contents are dropped along with the tag.
const DROPPED_WITH_CONTENT: &[&str] = &["script", "style", "iframe", "object"];

const VOID_TAGS: &[&str] = &["br"];

/// A parsed tag token.
struct Tag<'a> {
    name: String,
    closing: bool,
    /// Full source text of the tag, including `<` and `>`.
    raw: &'a str,
}

/// Splits markup into text runs and tags. Unterminated `<` is treated as text.
fn tokenize(input: &str) -> Vec<Result<Tag<'_>, &str>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(0) => {
                let Some(end) = rest.find('>') else {
                    tokens.push(Err(rest));
                    break;
                };
                let raw = &rest[..=end];
                let inner = raw[1..raw.len() - 1].trim();
                let closing = inner.starts_with('/');
                let name: String = inner
                    .trim_start_matches('/')
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase();
                if name.is_empty() {
                    // "<" followed by something that is not a tag ("a < b > c").
                    tokens.push(Err(&rest[..1]));
                    rest = &rest[1..];
                    continue;
                }
                tokens.push(Ok(Tag { name, closing, raw }));
                rest = &rest[end + 1..];
            }
            Some(pos) => {
                tokens.push(Err(&rest[..pos]));
                rest = &rest[pos..];
            }
            None => {
                tokens.push(Err(rest));
                break;
            }
        }
    }
    tokens
}

/// Escapes text for HTML output. Existing entities (`&amp;`, `&#39;`, `&nbsp;`) are kept.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match c {
            '&' if starts_with_entity(&text[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn starts_with_entity(s: &str) -> bool {
    let Some(end) = s.find(';') else {
        return false;
    };
    let body = &s[1..end];
    if body.is_empty() || body.len() > 10 {
        return false;
    }
    if let Some(num) = body.strip_prefix('#') {
        let num = num.strip_prefix('x').or_else(|| num.strip_prefix('X')).unwrap_or(num);
        !num.is_empty() && num.chars().all(|c| c.is_ascii_hexdigit())
    } else {
        body.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

/// Decodes the handful of entities rich-text editors actually emit.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Keeps whitelisted tags (attributes removed), drops the rest, escapes text.
///
/// Output is always balanced: a closing tag is kept only when the same tag is
/// open (tags opened inside it are closed first), and tags still open at the
/// end are closed.
pub fn sanitize_rich_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut skip_until: Option<String> = None;
    let mut open: Vec<String> = Vec::new();

    for token in tokenize(input) {
        match token {
            Ok(tag) => {
                if let Some(ref skipped) = skip_until {
                    if tag.closing && tag.name == *skipped {
                        skip_until = None;
                    }
                    continue;
                }
                if DROPPED_WITH_CONTENT.contains(&tag.name.as_str()) {
                    if !tag.closing && !tag.raw.ends_with("/>") {
                        skip_until = Some(tag.name);
                    }
                    continue;
                }
                if !ALLOWED_TAGS.contains(&tag.name.as_str()) {
                    continue;
                }
                if VOID_TAGS.contains(&tag.name.as_str()) {
                    if !tag.closing {
                        out.push_str(&format!("<{}>", tag.name));
                    }
                } else if tag.closing {
                    if let Some(pos) = open.iter().rposition(|t| *t == tag.name) {
                        for name in open.drain(pos..).rev() {
                            out.push_str(&format!("</{name}>"));
                        }
                    }
                } else {
                    out.push_str(&format!("<{}>", tag.name));
                    open.push(tag.name);
                }
            }
            Err(text) => {
                if skip_until.is_none() {
                    out.push_str(&escape_text(text));
                }
            }
        }
    }
    for name in open.into_iter().rev() {
        out.push_str(&format!("</{name}>"));
    }
    out
}

/// Removes every tag and decodes entities; surrounding whitespace trimmed.
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for token in tokenize(input) {
        if let Err(text) = token {
            out.push_str(text);
        }
    }
    decode_entities(&out).trim().to_string()
}

/// Converts markup to readable plain text: block ends become newlines,
/// list items become "• " bullets.
pub fn html_to_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for token in tokenize(input) {
        match token {
            Ok(tag) => match (tag.name.as_str(), tag.closing) {
                ("li", false) => out.push_str("• "),
                ("li" | "p" | "div" | "h3" | "h4", true) | ("br", _) => out.push('\n'),
                _ => {}
            },
            Err(text) => out.push_str(text),
        }
    }

    let text = decode_entities(&out);
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when the text contains at least one tag-looking token.
pub fn looks_like_html(input: &str) -> bool {
    tokenize(input).iter().any(|t| t.is_ok())
}

/// Renders a rich-text field: markup is sanitized; plain text is escaped with
/// newlines turned into `<br>`.
pub fn render_rich(input: &str) -> String {
    if looks_like_html(input) {
        sanitize_rich_text(input)
    } else {
        escape_text(input.trim()).replace('\n', "<br>")
    }
}
