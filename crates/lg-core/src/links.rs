//! Markdown link discovery in agent messages.

use std::sync::LazyLock;

use lg_protocol::preview::PREVIEW_SCHEME;
use regex::Regex;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Opens a detail panel in the client.
    Preview(String),
    /// Navigates away from the chat.
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub target: LinkTarget,
}

/// A run of message text, split around its links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Link(Link),
}

/// Split content into plain text and links, in order.
pub fn segments(content: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in MARKDOWN_LINK.captures_iter(content) {
        let whole = caps.get(0).expect("group 0 always matches");
        if whole.start() > last {
            out.push(Segment::Text(&content[last..whole.start()]));
        }
        out.push(Segment::Link(link(&caps[1], &caps[2])));
        last = whole.end();
    }
    if last < content.len() {
        out.push(Segment::Text(&content[last..]));
    }
    out
}

/// Every `preview://` target in the content, in order of appearance.
pub fn preview_links(content: &str) -> Vec<Link> {
    segments(content)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Link(link) if matches!(link.target, LinkTarget::Preview(_)) => Some(link),
            _ => None,
        })
        .collect()
}

fn link(label: &str, url: &str) -> Link {
    let target = if url.starts_with(PREVIEW_SCHEME) {
        LinkTarget::Preview(url.to_string())
    } else {
        LinkTarget::External(url.to_string())
    };
    Link {
        label: label.to_string(),
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_and_links() {
        let content = "See [LG204](preview://flight/%7B%7D) or [the site](https://example.com).";
        let segs = segments(content);
        assert_eq!(
            segs,
            vec![
                Segment::Text("See "),
                Segment::Link(Link {
                    label: "LG204".to_string(),
                    target: LinkTarget::Preview("preview://flight/%7B%7D".to_string()),
                }),
                Segment::Text(" or "),
                Segment::Link(Link {
                    label: "the site".to_string(),
                    target: LinkTarget::External("https://example.com".to_string()),
                }),
                Segment::Text("."),
            ]
        );
    }

    #[test]
    fn text_without_links() {
        assert_eq!(segments("just text"), vec![Segment::Text("just text")]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn preview_links_only() {
        let content = "[a](preview://hotel/x) [b](http://x) [c](preview://budget/y)";
        let labels: Vec<_> = preview_links(content).into_iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["a", "c"]);
    }
}
