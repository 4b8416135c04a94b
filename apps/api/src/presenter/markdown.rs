//! Markdown → HTML for the optimized résumé documents.
//!
//! Model output is untrusted: raw HTML blocks and inline tags are escaped and
//! shown as text instead of being passed through.

use pulldown_cmark::{html, Event, Options, Parser};

pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}
