//! Best-effort sectioning of generated narrative text.
//!
//! The summary endpoint returns one freeform string whose headings are only
//! loosely marked, typically `**1. Core Business and Market Position:**`.
//! [`parse`] splits it into ordered `(title, content)` pairs. There is no formal
//! grammar; anything that does not look like a heading followed by a body is
//! dropped rather than reported.
//!
//! ```rust
//! use ferroscreen_core::narrative::{self, SectionCategory};
//!
//! let sections = narrative::parse(Some(
//!     "**1. Business**Operates retail stores.**2. Risks**Currency exposure.",
//! ));
//!
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[0].title(), "Business");
//! assert_eq!(sections[1].category(), SectionCategory::Risk);
//! ```

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Emphasis markers, an optional ordinal, the captured title, closing markers.
static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\*{1,2}\d?\.?\s*(.*?)\*{1,2}\s*").expect("heading pattern must compile")
});

/// One heading and the body text that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeSection {
    title: String,
    content: String,
}

impl NarrativeSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> SectionCategory {
        SectionCategory::classify(&self.title)
    }
}

/// Display category derived from a section title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionCategory {
    Risk,
    Business,
    General,
}

impl SectionCategory {
    /// `business` wins over `risk` when a title mentions both.
    pub fn classify(title: &str) -> Self {
        let title = title.to_lowercase();
        if title.contains("business") {
            Self::Business
        } else if title.contains("risk") {
            Self::Risk
        } else {
            Self::General
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Risk => "risk",
            Self::Business => "business",
            Self::General => "general",
        }
    }
}

impl Display for SectionCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section plus its category, the shape renderers consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedSection {
    pub title: String,
    pub content: String,
    pub category: SectionCategory,
}

impl From<NarrativeSection> for ClassifiedSection {
    fn from(section: NarrativeSection) -> Self {
        let category = section.category();
        Self {
            title: section.title,
            content: section.content,
            category,
        }
    }
}

/// Splits `narrative` into heading/body sections in source order.
///
/// Absent or empty input, or text without any heading, yields no sections. A
/// trailing heading with no body is dropped.
pub fn parse(narrative: Option<&str>) -> Vec<NarrativeSection> {
    let Some(text) = narrative.filter(|text| !text.is_empty()) else {
        return Vec::new();
    };

    split_on_headings(text)
        .chunks_exact(2)
        .map(|pair| {
            let title = pair[0].trim().trim_end_matches(':').trim_end();
            NarrativeSection::new(title, pair[1].trim())
        })
        .collect()
}

/// [`parse`] with each section's category attached.
pub fn parse_classified(narrative: Option<&str>) -> Vec<ClassifiedSection> {
    parse(narrative).into_iter().map(Into::into).collect()
}

// Text between matches interleaved with each match's captured title, empty
// fragments removed.
fn split_on_headings(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut cursor = 0;

    for captures in HEADING.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        fragments.push(&text[cursor..whole.start()]);
        if let Some(title) = captures.get(1) {
            fragments.push(title.as_str());
        }
        cursor = whole.end();
    }
    fragments.push(&text[cursor..]);

    fragments.retain(|fragment| !fragment.is_empty());
    fragments
}
