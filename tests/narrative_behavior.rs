//! Behavior-driven tests for narrative sectioning.
//!
//! These tests verify HOW a generated company summary is split into titled
//! sections and classified, including the silent degradation on text that
//! carries no recognisable headings.

use ferroscreen_core::narrative::{self, NarrativeSection, SectionCategory};

fn pairs(sections: &[NarrativeSection]) -> Vec<(&str, &str)> {
    sections
        .iter()
        .map(|section| (section.title(), section.content()))
        .collect()
}

// =============================================================================
// Narrative: Section Splitting
// =============================================================================

#[test]
fn when_headings_are_numbered_and_bold_system_splits_in_order() {
    // Given: Two numbered bold headings with bodies
    let text = "**1. Business**Operates retail stores.**2. Risks**Currency exposure.";

    // When: The narrative is parsed
    let sections = narrative::parse(Some(text));

    // Then: Exactly two sections in source order, decoration removed
    assert_eq!(
        pairs(&sections),
        [
            ("Business", "Operates retail stores."),
            ("Risks", "Currency exposure.")
        ]
    );
}

#[test]
fn when_narrative_is_empty_or_absent_system_returns_no_sections() {
    assert!(narrative::parse(None).is_empty());
    assert!(narrative::parse(Some("")).is_empty());
}

#[test]
fn when_last_heading_has_no_body_system_drops_it() {
    // Given: A trailing heading with nothing after it
    let text = "**Outlook:** Stable demand.\n**Risks:**";

    // When: The narrative is parsed
    let sections = narrative::parse(Some(text));

    // Then: Only the complete section is emitted
    assert_eq!(pairs(&sections), [("Outlook", "Stable demand.")]);
}

#[test]
fn when_text_has_no_headings_system_returns_no_sections() {
    let sections = narrative::parse(Some("The company makes steel and sells it."));
    assert!(sections.is_empty());
}

#[test]
fn when_model_output_uses_colons_and_blank_lines_system_trims_them() {
    // Given: The layout the summary endpoint actually produces
    let text = "\n**1. Core Business and Market Position:**\n\
                Largest private refiner in India.\n\n\
                **2. Key Potential Strengths:**\nIntegrated value chain.\n\n\
                **3. Notable Risks or Challenges:**\nCommodity price swings.\n";

    // When: The narrative is parsed
    let sections = narrative::parse(Some(text));

    // Then: Titles lose the trailing colon and bodies lose surrounding blanks
    assert_eq!(
        pairs(&sections),
        [
            (
                "Core Business and Market Position",
                "Largest private refiner in India."
            ),
            ("Key Potential Strengths", "Integrated value chain."),
            ("Notable Risks or Challenges", "Commodity price swings."),
        ]
    );
}

#[test]
fn when_titles_repeat_system_keeps_every_section() {
    let text = "**Note** First.**Note** Second.";

    let sections = narrative::parse(Some(text));

    assert_eq!(pairs(&sections), [("Note", "First."), ("Note", "Second.")]);
}

#[test]
fn when_text_precedes_the_first_heading_system_pairs_fragments_positionally() {
    // Given: A preamble before the first heading
    let text = "Summary follows. **Business:** Retail.";

    // When: The narrative is parsed
    let sections = narrative::parse(Some(text));

    // Then: Fragments pair by position, so the preamble becomes a title and
    // the unpaired body is dropped
    assert_eq!(pairs(&sections), [("Summary follows.", "Business:")]);
}

// =============================================================================
// Narrative: Classification
// =============================================================================

#[test]
fn when_classifying_titles_system_maps_risk_business_and_general() {
    assert_eq!(SectionCategory::classify("Key Risks"), SectionCategory::Risk);
    assert_eq!(
        SectionCategory::classify("Business Overview"),
        SectionCategory::Business
    );
    assert_eq!(SectionCategory::classify("Outlook"), SectionCategory::General);
}

#[test]
fn when_title_mentions_business_and_risk_system_prefers_business() {
    assert_eq!(
        SectionCategory::classify("Business Risks"),
        SectionCategory::Business
    );
}

#[test]
fn when_sections_are_classified_system_keeps_order_and_content() {
    let text = "**1. Business Overview:** Sells cement.\n\
                **2. Key Risks:** Fuel costs.\n\
                **3. Outlook:** Capacity additions.";

    let classified = narrative::parse_classified(Some(text));

    let summary = classified
        .iter()
        .map(|section| (section.title.as_str(), section.category))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        [
            ("Business Overview", SectionCategory::Business),
            ("Key Risks", SectionCategory::Risk),
            ("Outlook", SectionCategory::General),
        ]
    );
    assert_eq!(classified[1].content, "Fuel costs.");
}
