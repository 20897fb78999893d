/// A feed subscription found in an OPML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpmlFeed {
    pub title: String,
    pub url: String,
}

/// Extract every `<outline>` carrying an `xmlUrl`, in document order.
///
/// Category outlines (those without `xmlUrl`) are skipped, so nesting depth
/// does not matter.
pub fn parse_opml(content: &str) -> Vec<OpmlFeed> {
    content
        .split("<outline")
        .skip(1)
        .filter_map(|fragment| {
            let tag = fragment.split('>').next().unwrap_or(fragment);
            let url = extract_attr(tag, "xmlUrl")?;
            let title = extract_attr(tag, "title")
                .or_else(|| extract_attr(tag, "text"))
                .unwrap_or_else(|| url.clone());
            Some(OpmlFeed { title, url })
        })
        .collect()
}

/// Extract an attribute value from the inside of an XML start tag.
fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    let pattern = format!("{}=", attr);
    let mut search = tag;

    while let Some(pos) = search.find(&pattern) {
        let preceded_by_space = search[..pos]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        let rest = &search[pos + pattern.len()..];
        if preceded_by_space {
            let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
            let value = &rest[1..];
            let end = value.find(quote)?;
            return Some(html_escape::decode_html_entities(&value[..end]).to_string());
        }
        search = rest;
    }
    None
}
