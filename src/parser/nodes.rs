use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::config::{CONTINUATION_TEXT, LOG_TOO_LARGE_TEXT};

/// One hyperlink embedded in a log entry. Several extraction rules select
/// article names by link position because nested parentheses defeat the
/// sentence patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// One list item: a single log entry's text plus its embedded links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Item belongs to the page's table of contents, not the log.
    pub toc: bool,
    pub text: String,
    pub links: Vec<Link>,
}

/// Document-order content node the walker consumes.
#[derive(Debug, Clone)]
pub enum Node {
    /// `<h3>` whose first `<span>` is a `mw-headline` carrying an id; date
    /// headings are recognized by the id shape, others are passed over.
    Heading { id: String, text: String },
    /// Outermost `<ul>` with its items.
    List(Vec<Item>),
}

/// Scanned shape of one cached page.
#[derive(Debug, Default)]
pub struct PageMarkup {
    pub nodes: Vec<Node>,
    /// Page resumes a daily log truncated on the previous revision.
    pub is_continuation: bool,
    /// Page carries the oversized-log marker instead of entries.
    pub log_too_large: bool,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

struct HeadingCapture {
    depth: usize,
    first_span_seen: bool,
    headline_depth: Option<usize>,
    id: Option<String>,
    text: String,
}

struct ListCapture {
    depth: usize,
    items: Vec<Item>,
    open_item: Option<Item>,
    open_link: Option<Link>,
}

/// Streaming scan of one archived page. Lenient about the HTML it accepts:
/// unclosed `<li>` closes the previous item, void elements never nest, end
/// tags close any intervening open elements, and undecodable entities fall
/// back to the raw text. Only the `mw-content-text` subtree contributes
/// nodes; marker sentences are matched anywhere in the document.
pub fn scan_page(html: &str) -> Result<PageMarkup> {
    let mut reader = Reader::from_str(html);
    let cfg = reader.config_mut();
    cfg.check_end_names = false;
    cfg.allow_unmatched_ends = true;

    let mut page = PageMarkup::default();
    let mut stack: Vec<String> = Vec::new();
    let mut content_depth: Option<usize> = None;
    let mut heading: Option<HeadingCapture> = None;
    let mut list: Option<ListCapture> = None;

    loop {
        match reader.read_event().context("scanning page markup")? {
            Event::Start(e) => {
                let name = tag_name(&e);
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }
                stack.push(name.clone());
                let in_content = content_depth.is_some();

                match name.as_str() {
                    "div" if content_depth.is_none() => {
                        if attr(&e, b"id").as_deref() == Some("mw-content-text") {
                            content_depth = Some(stack.len());
                        }
                    }
                    "h3" if in_content && heading.is_none() && list.is_none() => {
                        heading = Some(HeadingCapture {
                            depth: stack.len(),
                            first_span_seen: false,
                            headline_depth: None,
                            id: None,
                            text: String::new(),
                        });
                    }
                    "span" => {
                        if let Some(h) = heading.as_mut() {
                            if !h.first_span_seen {
                                h.first_span_seen = true;
                                let class = attr(&e, b"class");
                                let id = attr(&e, b"id");
                                if class.as_deref() == Some("mw-headline") && id.is_some() {
                                    h.headline_depth = Some(stack.len());
                                    h.id = id;
                                }
                            }
                        }
                    }
                    "ul" if in_content && list.is_none() && heading.is_none() => {
                        list = Some(ListCapture {
                            depth: stack.len(),
                            items: Vec::new(),
                            open_item: None,
                            open_link: None,
                        });
                    }
                    "li" => {
                        if let Some(l) = list.as_mut() {
                            close_item(l);
                            let classes = attr(&e, b"class").unwrap_or_default();
                            let toc = classes
                                .split_whitespace()
                                .any(|c| c.starts_with("toclevel"));
                            l.open_item = Some(Item {
                                toc,
                                ..Item::default()
                            });
                        }
                    }
                    "a" => {
                        if let Some(l) = list.as_mut() {
                            if l.open_item.is_some() && l.open_link.is_none() {
                                l.open_link = Some(Link {
                                    text: String::new(),
                                    href: attr(&e, b"href").unwrap_or_default(),
                                });
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) => {
                let name = tag_name_end(e.local_name().as_ref());
                if !stack.iter().any(|t| t == &name) {
                    continue; // unmatched end tag
                }
                loop {
                    let popped = match stack.pop() {
                        Some(p) => p,
                        None => break,
                    };
                    run_close_hooks(
                        &popped,
                        stack.len(),
                        &mut page,
                        &mut content_depth,
                        &mut heading,
                        &mut list,
                    );
                    if popped == name {
                        break;
                    }
                }
            }
            Event::Text(e) => {
                let text = decode_text(&e);
                check_markers(&text, &mut page);
                append_text(&text, &mut heading, &mut list);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                check_markers(&text, &mut page);
                append_text(&text, &mut heading, &mut list);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(page)
}

fn run_close_hooks(
    popped: &str,
    new_len: usize,
    page: &mut PageMarkup,
    content_depth: &mut Option<usize>,
    heading: &mut Option<HeadingCapture>,
    list: &mut Option<ListCapture>,
) {
    if let Some(l) = list.as_mut() {
        if popped == "a" {
            close_link(l);
        }
        if popped == "li" {
            close_item(l);
        }
        if new_len < l.depth {
            close_item(l);
            let done = list.take().unwrap();
            page.nodes.push(Node::List(done.items));
        }
    }
    if let Some(h) = heading.as_mut() {
        if let Some(d) = h.headline_depth {
            if new_len < d {
                h.headline_depth = None; // headline span closed, keep captured text
            }
        }
        if new_len < h.depth {
            let done = heading.take().unwrap();
            if let Some(id) = done.id {
                page.nodes.push(Node::Heading {
                    id,
                    text: done.text,
                });
            }
        }
    }
    if let Some(d) = *content_depth {
        if new_len < d {
            *content_depth = None;
        }
    }
}

fn close_item(l: &mut ListCapture) {
    close_link(l);
    if let Some(item) = l.open_item.take() {
        l.items.push(item);
    }
}

fn close_link(l: &mut ListCapture) {
    if let Some(link) = l.open_link.take() {
        if let Some(item) = l.open_item.as_mut() {
            item.links.push(link);
        }
    }
}

fn append_text(
    text: &str,
    heading: &mut Option<HeadingCapture>,
    list: &mut Option<ListCapture>,
) {
    if let Some(h) = heading.as_mut() {
        if h.headline_depth.is_some() {
            h.text.push_str(text);
        }
        return;
    }
    if let Some(l) = list.as_mut() {
        if let Some(item) = l.open_item.as_mut() {
            item.text.push_str(text);
            if let Some(link) = l.open_link.as_mut() {
                link.text.push_str(text);
            }
        }
    }
}

fn check_markers(text: &str, page: &mut PageMarkup) {
    let trimmed = text.trim();
    if trimmed == CONTINUATION_TEXT {
        page.is_continuation = true;
    } else if trimmed == LOG_TOO_LARGE_TEXT {
        page.log_too_large = true;
    }
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase()
}

fn tag_name_end(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    for a in e.attributes().with_checks(false).flatten() {
        if a.key.as_ref().eq_ignore_ascii_case(key) {
            return Some(match a.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
            });
        }
    }
    None
}

/// Unescape text, tolerating the HTML-only entities the XML reader rejects.
fn decode_text(e: &BytesText) -> String {
    match e.unescape() {
        Ok(s) => s.into_owned(),
        Err(_) => {
            let raw = String::from_utf8_lossy(e.as_ref());
            raw.replace("&nbsp;", " ")
                .replace("&amp;", "&")
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
        }
    }
}
