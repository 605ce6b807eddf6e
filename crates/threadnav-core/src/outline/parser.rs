use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::Heading;

/// Collects every heading in `markdown`, in document order.
///
/// Heading text is the concatenation of the literal text under the heading
/// (emphasis, link labels and code spans included), trimmed. Markdown parsing
/// never fails, so neither does this.
#[must_use]
pub fn parse_headings(markdown: &str) -> Vec<Heading> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let mut headings = Vec::new();
    let mut open: Option<(u8, String)> = None;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some((heading_depth(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = open.take() {
                    headings.push(Heading::new(level, text.trim()));
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = open.as_mut() {
                    buf.push_str(&text);
                }
            }
            _ => {}
        }
    }

    headings
}

const fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
