//! Drawing a [`PageView`] onto a concrete surface.

use crate::render::{DetailView, LibraryView, LinkAction, PageView, SearchView, ShowRowView};

/// What a click on an element asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectTour(String),
    BackToLibrary,
    /// Open the row when closed, close it when open
    ToggleShow { tour: String, index: usize, expanded: bool },
    OpenLink(String),
}

/// Minimal element-building capability a drawing target provides.
pub trait Surface {
    type Node;

    fn element(&mut self, tag: &str, class: &str) -> Self::Node;
    fn set_text(&mut self, node: &mut Self::Node, text: &str);
    fn set_attr(&mut self, node: &mut Self::Node, name: &str, value: &str);
    fn append_child(&mut self, parent: &mut Self::Node, child: Self::Node);
    fn on_click(&mut self, node: &mut Self::Node, action: Action);
}

/// Draw the whole page and return its root node.
pub fn draw<S: Surface>(page: &PageView, surface: &mut S) -> S::Node {
    let mut root = surface.element("div", "featured-tours");

    let search = draw_search(&page.search, surface);
    surface.append_child(&mut root, search);

    let library = draw_library(&page.library, surface);
    surface.append_child(&mut root, library);

    let mut panel = surface.element(
        "section",
        if page.detail.is_some() { "info-panel" } else { "info-panel info-panel--empty" },
    );
    match &page.detail {
        Some(detail) => draw_detail(detail, &mut panel, surface),
        None => {
            let mut empty = surface.element("p", "info-empty");
            surface.set_text(&mut empty, "Select a tour to see its dates.");
            surface.append_child(&mut panel, empty);
        }
    }
    surface.append_child(&mut root, panel);

    root
}

fn text_element<S: Surface>(surface: &mut S, tag: &str, class: &str, text: &str) -> S::Node {
    let mut node = surface.element(tag, class);
    surface.set_text(&mut node, text);
    node
}

fn draw_search<S: Surface>(search: &SearchView, surface: &mut S) -> S::Node {
    let mut wrap = surface.element("div", "tour-search");

    // Submits back to the page as `?q=...`
    let mut form = surface.element("form", "tour-search-form");
    surface.set_attr(&mut form, "method", "get");
    surface.set_attr(&mut form, "role", "search");

    let mut input = surface.element("input", "tour-search-input");
    surface.set_attr(&mut input, "type", "search");
    surface.set_attr(&mut input, "name", "q");
    surface.set_attr(&mut input, "value", &search.query);
    surface.set_attr(&mut input, "placeholder", "Search tours or artists");
    surface.append_child(&mut form, input);

    let mut submit = text_element(surface, "button", "tour-search-submit", "Search");
    surface.set_attr(&mut submit, "type", "submit");
    surface.append_child(&mut form, submit);
    surface.append_child(&mut wrap, form);

    let class = if search.visible { "search-results visible" } else { "search-results" };
    let mut results = surface.element("div", class);
    if search.visible {
        for result in &search.results {
            let mut item = text_element(surface, "a", "search-result-item", &result.name);
            surface.on_click(&mut item, Action::SelectTour(result.slug.clone()));
            surface.append_child(&mut results, item);
        }
    }
    surface.append_child(&mut wrap, results);
    wrap
}

fn draw_library<S: Surface>(library: &LibraryView, surface: &mut S) -> S::Node {
    let mut section = surface.element("section", "browse-list");
    if !library.visible {
        surface.set_attr(&mut section, "hidden", "hidden");
    }

    if let Some(message) = &library.empty_message {
        let empty = text_element(surface, "p", "browse-empty", message);
        surface.append_child(&mut section, empty);
    }

    for entry in &library.items {
        let mut item = surface.element("a", "browse-item");
        surface.set_attr(&mut item, "data-tour-slug", &entry.slug);

        let name = text_element(surface, "div", "browse-item-name", &entry.name);
        surface.append_child(&mut item, name);
        if let Some(meta) = &entry.meta {
            let meta = text_element(surface, "div", "browse-item-meta", meta);
            surface.append_child(&mut item, meta);
        }

        surface.on_click(&mut item, Action::SelectTour(entry.slug.clone()));
        surface.append_child(&mut section, item);
    }
    section
}

fn draw_detail<S: Surface>(detail: &DetailView, panel: &mut S::Node, surface: &mut S) {
    let mut back = text_element(surface, "a", "back-to-library", "← All tours");
    surface.on_click(&mut back, Action::BackToLibrary);
    surface.append_child(panel, back);

    let mut header = surface.element("header", "tour-header");
    let mut image = surface.element("img", "tour-image");
    surface.set_attr(&mut image, "src", &detail.image_src);
    surface.set_attr(&mut image, "alt", &detail.image_alt);
    surface.append_child(&mut header, image);

    let name = text_element(surface, "h2", "tour-name", &detail.name);
    surface.append_child(&mut header, name);
    if !detail.artist.trim().is_empty() {
        let artist = text_element(surface, "p", "tour-artist", &detail.artist);
        surface.append_child(&mut header, artist);
    }
    if !detail.meta.is_empty() {
        let meta = text_element(surface, "p", "tour-meta", &detail.meta);
        surface.append_child(&mut header, meta);
    }
    if let Some(summary) = &detail.city_summary {
        let summary = text_element(surface, "div", "tour-dates-summary", summary);
        surface.append_child(&mut header, summary);
    }
    surface.append_child(panel, header);

    let mut list = surface.element("div", "shows-list");
    for row in &detail.shows {
        let row = draw_show_row(&detail.slug, row, surface);
        surface.append_child(&mut list, row);
    }
    surface.append_child(panel, list);
}

fn draw_show_row<S: Surface>(tour: &str, row: &ShowRowView, surface: &mut S) -> S::Node {
    let mut node = surface.element("div", "show-row");
    surface.set_attr(&mut node, "id", &format!("show-{}", row.index));

    let mut header = surface.element("a", "show-row-header");
    let venue = text_element(surface, "span", "show-venue", &row.primary);
    surface.append_child(&mut header, venue);
    if let Some(secondary) = &row.secondary {
        let city = text_element(surface, "span", "show-city", secondary);
        surface.append_child(&mut header, city);
    }
    let date = text_element(surface, "span", "show-date", &row.date);
    surface.append_child(&mut header, date);
    let chevron = text_element(surface, "span", "show-chevron", "▾");
    surface.append_child(&mut header, chevron);
    surface.on_click(
        &mut header,
        Action::ToggleShow {
            tour: tour.to_string(),
            index: row.index,
            expanded: row.expanded,
        },
    );
    surface.append_child(&mut node, header);

    let mut dropdown = surface.element("div", if row.expanded { "show-dropdown open" } else { "show-dropdown" });
    let mut links = surface.element("div", "show-links");
    for action in &row.actions {
        let link = draw_link(action, surface);
        surface.append_child(&mut links, link);
    }
    surface.append_child(&mut dropdown, links);
    surface.append_child(&mut node, dropdown);
    node
}

fn draw_link<S: Surface>(action: &LinkAction, surface: &mut S) -> S::Node {
    let class = match (action.primary, action.enabled) {
        (true, true) => "show-link-btn primary",
        (true, false) => "show-link-btn primary disabled",
        (false, true) => "show-link-btn",
        (false, false) => "show-link-btn disabled",
    };
    let mut link = text_element(surface, "a", class, action.label);
    match &action.url {
        Some(url) if action.enabled => surface.on_click(&mut link, Action::OpenLink(url.clone())),
        _ => surface.set_attr(&mut link, "aria-disabled", "true"),
    }
    link
}

/// Element built by [`HtmlSurface`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlNode {
    tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<HtmlNode>,
}

impl HtmlNode {
    fn set(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(attr) => attr.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Serialize to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');
        if matches!(self.tag.as_str(), "img" | "input") {
            return;
        }
        if let Some(text) = &self.text {
            out.push_str(&escape_html(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Server-side surface producing static markup; clicks become links back to the page.
#[derive(Debug, Default)]
pub struct HtmlSurface;

impl Surface for HtmlSurface {
    type Node = HtmlNode;

    fn element(&mut self, tag: &str, class: &str) -> HtmlNode {
        let mut node = HtmlNode {
            tag: tag.to_string(),
            ..Default::default()
        };
        if !class.is_empty() {
            node.set("class", class);
        }
        node
    }

    fn set_text(&mut self, node: &mut HtmlNode, text: &str) {
        node.text = Some(text.to_string());
    }

    fn set_attr(&mut self, node: &mut HtmlNode, name: &str, value: &str) {
        node.set(name, value);
    }

    fn append_child(&mut self, parent: &mut HtmlNode, child: HtmlNode) {
        parent.children.push(child);
    }

    fn on_click(&mut self, node: &mut HtmlNode, action: Action) {
        let href = match action {
            Action::SelectTour(slug) => format!("?tour={}", urlencoding::encode(&slug)),
            Action::BackToLibrary => "?".to_string(),
            Action::ToggleShow { tour, expanded: true, .. } => {
                format!("?tour={}", urlencoding::encode(&tour))
            }
            Action::ToggleShow { tour, index, expanded: false } => {
                format!("?tour={}&show={}#show-{}", urlencoding::encode(&tour), index, index)
            }
            Action::OpenLink(url) => {
                node.set("target", "_blank");
                node.set("rel", "noopener noreferrer");
                url
            }
        };
        node.set("href", &href);
    }
}

/// Render a full HTML document for a page.
pub fn html_document(page: &PageView) -> String {
    let title = page
        .detail
        .as_ref()
        .map(|d| format!("{} · Concerto Featured Tours", d.name))
        .unwrap_or_else(|| "Concerto Featured Tours".to_string());
    let body = draw(page, &mut HtmlSurface).to_html();
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        escape_html(&title),
        body
    )
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
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
