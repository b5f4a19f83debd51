//! Plain-text excerpts of Markdown bodies.
//!
//! The body is parsed with pulldown-cmark and only its text survives: markup,
//! raw HTML tags, images and link targets are dropped. Block boundaries become
//! line breaks. The result is cut to a character budget and always ends in
//! `...`.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Characters kept by [`crate::domain::post::Post::excerpt`].
pub const DEFAULT_EXCERPT_CHARS: usize = 300;

const ELLIPSIS: &str = "...";

/// Render `markdown` to plain text and cut it to `max_chars` characters.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let text = plain_text(markdown);
    let mut out: String = text.trim().chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Markdown → text with every tag removed.
///
/// The contents of `<script>` and `<style>` elements are dropped along with
/// their tags.
pub fn plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut html = HtmlStripper::default();

    for event in Parser::new_ext(markdown, Options::empty()) {
        match event {
            Event::Html(raw) => html.push(&mut out, &raw),
            _ if html.is_skipping() => {}
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak | Event::Rule => out.push('\n'),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }

    out
}

/// Elements whose text is never shown.
const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

/// Tag stripper whose state spans HTML events, since an element may open in
/// one event and close in a later one.
#[derive(Debug, Default)]
struct HtmlStripper {
    in_tag: bool,
    tag: String,
    hidden: Option<&'static str>,
}

impl HtmlStripper {
    fn is_skipping(&self) -> bool {
        self.hidden.is_some()
    }

    fn push(&mut self, out: &mut String, html: &str) {
        for c in html.chars() {
            match c {
                '<' if !self.in_tag => {
                    self.in_tag = true;
                    self.tag.clear();
                }
                '>' if self.in_tag => {
                    self.in_tag = false;
                    self.close_tag();
                }
                _ if self.in_tag => self.tag.push(c),
                _ if self.hidden.is_none() => out.push(c),
                _ => {}
            }
        }
    }

    fn close_tag(&mut self) {
        let (closing, rest) = match self.tag.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, self.tag.as_str()),
        };
        let name: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match self.hidden {
            Some(hidden) if closing && name == hidden => self.hidden = None,
            Some(_) => {}
            None if !closing && !rest.trim_end().ends_with('/') => {
                self.hidden = HIDDEN_ELEMENTS.iter().copied().find(|e| *e == name);
            }
            None => {}
        }
    }
}
