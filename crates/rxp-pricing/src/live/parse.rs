//! Price-list extraction from rendered HTML.
//!
//! Markup contract: each entry is an element whose class list contains
//! `price-list-item`; inside it, a `pharmacy-name` element and a `price`
//! element carry the displayed text.

use std::sync::LazyLock;

use regex::Regex;

const ITEM_CLASS: &str = "price-list-item";
const PHARMACY_CLASS: &str = "pharmacy-name";
const PRICE_CLASS: &str = "price";

static CLASSED_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<([a-z][a-z0-9-]*)\b[^>]*?\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>"#,
    )
    .expect("valid regex")
});
static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One entry as displayed, before price parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    /// `None` when the entry shows a price without a pharmacy name.
    pub pharmacy: Option<String>,
    pub price_text: String,
}

#[derive(Debug)]
struct ClassedElement {
    tag: String,
    start: usize,
    inner_start: usize,
}

/// Extract every price-list entry. Returns `None` when the page has no
/// price-list items at all; entries without a price element are skipped.
///
/// Each entry is searched only up to its own closing tag, so price text
/// elsewhere on the page is never attributed to the last entry.
#[must_use]
pub fn parse_price_list(html: &str) -> Option<Vec<RawListing>> {
    let items = elements_with_class(html, ITEM_CLASS);
    if items.is_empty() {
        return None;
    }

    let mut listings = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let rest = &html[item.inner_start..];
        let end = closing_tag_offset(rest, &item.tag).unwrap_or_else(|| {
            items
                .get(i + 1)
                .map_or(rest.len(), |next| next.start - item.inner_start)
        });
        let segment = &rest[..end];

        let Some(price_text) = first_text_with_class(segment, PRICE_CLASS) else {
            tracing::debug!(index = i, "price-list item without price; skipping");
            continue;
        };

        listings.push(RawListing {
            pharmacy: first_text_with_class(segment, PHARMACY_CLASS),
            price_text,
        });
    }

    Some(listings)
}

fn elements_with_class(html: &str, class: &str) -> Vec<ClassedElement> {
    CLASSED_TAG_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let classes = cap.get(2).or_else(|| cap.get(3))?.as_str();
            if !classes.split_whitespace().any(|c| c == class) {
                return None;
            }
            Some(ClassedElement {
                tag: cap.get(1)?.as_str().to_ascii_lowercase(),
                start: whole.start(),
                inner_start: whole.end(),
            })
        })
        .collect()
}

/// Offset in `rest` of the `</tag` that closes an element whose content
/// starts at `rest`. Same-named elements nested inside are skipped.
fn closing_tag_offset(rest: &str, tag: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets aligned with `rest`.
    let lower = rest.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut depth = 0usize;
    let mut pos = 0;

    loop {
        let next_close = pos + lower[pos..].find(&close)?;
        match find_open_tag(&lower[pos..next_close], &open) {
            Some(offset) => {
                depth += 1;
                pos += offset + open.len();
            }
            None if depth == 0 => return Some(next_close),
            None => {
                depth -= 1;
                pos = next_close + close.len();
            }
        }
    }
}

/// First `<tag` in `haystack` that is a whole tag name (`<li` but not `<link`).
fn find_open_tag(haystack: &str, open: &str) -> Option<usize> {
    haystack.match_indices(open).map(|(i, _)| i).find(|&i| {
        haystack
            .as_bytes()
            .get(i + open.len())
            .is_none_or(|b| !(b.is_ascii_alphanumeric() || *b == b'-'))
    })
}

fn first_text_with_class(segment: &str, class: &str) -> Option<String> {
    let element = elements_with_class(segment, class).into_iter().next()?;
    let rest = &segment[element.inner_start..];
    let inner_end = closing_tag_offset(rest, &element.tag).unwrap_or(rest.len());
    let text = clean_text(&rest[..inner_end]);
    (!text.is_empty()).then_some(text)
}

/// Strip tags, decode common entities and collapse whitespace.
#[must_use]
pub fn clean_text(fragment: &str) -> String {
    let stripped = ANY_TAG_RE.replace_all(fragment, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&#36;", "$")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}
