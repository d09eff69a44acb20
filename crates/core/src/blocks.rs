use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Elements whose contents are never rendered and must not reach a block.
const HIDDEN_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// Kind of element a block was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    P,
    Li,
    Div,
}

impl TagKind {
    /// Map a (lowercase) element name to a block kind, if it is one we compare
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "h1" => TagKind::H1,
            "h2" => TagKind::H2,
            "h3" => TagKind::H3,
            "h4" => TagKind::H4,
            "h5" => TagKind::H5,
            "h6" => TagKind::H6,
            "p" => TagKind::P,
            "li" => TagKind::Li,
            "div" => TagKind::Div,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::H1 => "h1",
            TagKind::H2 => "h2",
            TagKind::H3 => "h3",
            TagKind::H4 => "h4",
            TagKind::H5 => "h5",
            TagKind::H6 => "h6",
            TagKind::P => "p",
            TagKind::Li => "li",
            TagKind::Div => "div",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged unit of visible text.
///
/// Blocks compare by value, so two paragraphs with the same text are the
/// same block no matter where they appear in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub tag: TagKind,
    pub text: String,
}

impl Block {
    pub fn new(tag: TagKind, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.tag, self.text)
    }
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    HIDDEN_TAGS.contains(&element.value().name())
}

/// Collapse every run of whitespace into a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element: every descendant text node outside
/// script/style/noscript, trimmed, joined with single spaces, collapsed.
fn visible_text(element: ElementRef<'_>) -> String {
    let pieces: Vec<&str> = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(is_hidden);
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect();

    collapse_whitespace(&pieces.join(" "))
}

/// Extract the ordered block sequence of an HTML document.
///
/// Every `h1`-`h6`, `p`, `li` and `div` element with non-empty visible text
/// yields one block, in document order. Nested elements each yield their
/// own block, so a `div` wrapping a `p` repeats the paragraph text.
/// Malformed markup is recovered by the parser; this never fails.
pub fn extract_blocks(html: &str) -> Vec<Block> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| {
            let tag = TagKind::from_name(element.value().name())?;
            let hidden = is_hidden(element)
                || element
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(is_hidden);
            if hidden {
                return None;
            }
            let text = visible_text(element);
            (!text.is_empty()).then(|| Block::new(tag, text))
        })
        .collect()
}
