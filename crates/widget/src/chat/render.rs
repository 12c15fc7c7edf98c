use std::sync::LazyLock;

use regex::Regex;

use super::message::{Message, Sender};

/// Visible label used instead of raw URLs.
pub const DEFAULT_LINK_LABEL: &str = "[Voir le document]";

const LINK_STYLE: &str = "color: inherit; text-decoration: underline; font-weight: bold;";

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL pattern is a valid regex"));

/// Display unit produced by the renderer.
///
/// Text fragments are untrusted and always escaped on output; links carry the
/// only markup the widget ever emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Link { href: String, label: String },
    LineBreak,
}

/// A message ready for insertion in the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub sender: Sender,
    pub fragments: Vec<Fragment>,
}

impl RenderedMessage {
    /// Class list of the bubble element, e.g. `message bot`.
    pub fn class_name(&self) -> String {
        format!("message {}", self.sender.css_class())
    }

    /// Serializes to markup: every text fragment is escaped, links are the only live elements.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => push_escaped(&mut html, text),
                Fragment::Link { href, label } => {
                    html.push_str("<a href=\"");
                    push_escaped(&mut html, href);
                    html.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\" style=\"");
                    html.push_str(LINK_STYLE);
                    html.push_str("\">");
                    push_escaped(&mut html, label);
                    html.push_str("</a>");
                }
                Fragment::LineBreak => html.push_str("<br>"),
            }
        }
        html
    }

    /// Plain-text rendition for non-HTML hosts; links read as `label <url>`.
    pub fn to_plain_text(&self) -> String {
        let mut text = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(value) => text.push_str(value),
                Fragment::Link { href, label } => {
                    text.push_str(label);
                    text.push_str(" <");
                    text.push_str(href);
                    text.push('>');
                }
                Fragment::LineBreak => text.push('\n'),
            }
        }
        text
    }
}

/// Turns raw message text into link and line-break fragments.
#[derive(Debug, Clone)]
pub struct MessageRenderer {
    link_label: String,
}

impl MessageRenderer {
    pub fn new(link_label: impl Into<String>) -> Self {
        Self {
            link_label: link_label.into(),
        }
    }

    pub fn link_label(&self) -> &str {
        &self.link_label
    }

    pub fn render(&self, message: &Message) -> RenderedMessage {
        let mut fragments = Vec::new();
        for (index, line) in message.text.split('\n').enumerate() {
            if index > 0 {
                fragments.push(Fragment::LineBreak);
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            self.push_line(line, &mut fragments);
        }

        RenderedMessage {
            sender: message.sender,
            fragments,
        }
    }

    fn push_line(&self, line: &str, fragments: &mut Vec<Fragment>) {
        let mut cursor = 0;
        for url in URL_PATTERN.find_iter(line) {
            if url.start() > cursor {
                fragments.push(Fragment::Text(line[cursor..url.start()].to_string()));
            }
            fragments.push(Fragment::Link {
                href: url.as_str().to_string(),
                label: self.link_label.clone(),
            });
            cursor = url.end();
        }
        if cursor < line.len() {
            fragments.push(Fragment::Text(line[cursor..].to_string()));
        }
    }
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_LABEL)
    }
}

/// Escapes text for both element content and double-quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    push_escaped(&mut escaped, raw);
    escaped
}

fn push_escaped(output: &mut String, raw: &str) {
    for character in raw.chars() {
        match character {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            other => output.push(other),
        }
    }
}
