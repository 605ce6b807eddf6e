use std::{fs, path::PathBuf};

use serde::Deserialize;
use threadnav_core::error::NavError;
use threadnav_core::outline::{Outline, build_outline, parse_headings};
use threadnav_core::{NavigationService, SqliteNavigationStore};

const SYNTHETIC_PARENT: &str = "<synthetic>";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutlineFixture {
    cases: Vec<OutlineCase>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutlineCase {
    name: String,
    markdown: String,
    entry_label: String,
    sections: Vec<ExpectedSection>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ExpectedSection {
    label: String,
    level: u8,
    order_index: u32,
    parent: Option<String>,
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("outline_cases.json")
}

fn load_fixture() -> OutlineFixture {
    let raw = fs::read_to_string(fixture_path()).expect("read outline fixture");
    serde_json::from_str(&raw).expect("parse outline fixture")
}

fn describe(outline: &Outline) -> Vec<ExpectedSection> {
    outline
        .sections
        .iter()
        .map(|section| {
            let parent = section.parent_id.as_ref().map(|parent_id| {
                if outline.synthetic_parent_id.as_ref() == Some(parent_id) {
                    return SYNTHETIC_PARENT.to_string();
                }
                outline
                    .sections
                    .iter()
                    .find(|candidate| &candidate.id == parent_id)
                    .map(|candidate| candidate.label.clone())
                    .unwrap_or_else(|| panic!("dangling parent id {parent_id}"))
            });
            ExpectedSection {
                label: section.label.clone(),
                level: section.level,
                order_index: section.order_index,
                parent,
            }
        })
        .collect()
}

#[test]
fn outline_fixture_cases_match_expected_structure() {
    for case in load_fixture().cases {
        let outline = build_outline(&parse_headings(&case.markdown), "nav-1", "m1");
        assert_eq!(outline.entry_label, case.entry_label, "case {}", case.name);
        assert_eq!(describe(&outline), case.sections, "case {}", case.name);
    }
}

#[test]
fn fixture_cases_round_trip_through_storage() {
    let service =
        NavigationService::new(SqliteNavigationStore::open_in_memory().expect("open store"));
    let navigator = service
        .ensure_navigator("chat-1", "Fixture chat")
        .expect("navigator");

    let mut expected_entries = Vec::new();
    for (idx, case) in load_fixture().cases.into_iter().enumerate() {
        let reply_id = format!("reply-{idx}");
        let result = service.add_entry_for_chat("chat-1", &reply_id, "user", &case.markdown);
        if case.sections.is_empty() {
            assert!(
                matches!(result, Err(NavError::ExtractionEmpty { .. })),
                "case {} should be rejected",
                case.name
            );
            continue;
        }
        let entry = result.unwrap_or_else(|err| panic!("case {}: {err}", case.name));
        assert_eq!(entry.navigator_id, navigator.id);
        expected_entries.push((entry, case));
    }

    let tree = service.get_navigator("chat-1").expect("read tree");
    assert_eq!(tree.entries.len(), expected_entries.len());
    for (stored, (entry, case)) in tree.entries.iter().zip(&expected_entries) {
        assert_eq!(&stored.entry, entry, "case {}", case.name);
        let labels: Vec<&str> = stored.sections.iter().map(|s| s.label.as_str()).collect();
        let expected: Vec<&str> = case.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, expected, "case {}", case.name);
        let anchor = format!("a--{}", entry.assistant_message_id);
        assert!(stored.sections.iter().all(|s| s.anchor == anchor));
    }
}

#[test]
fn synthetic_parent_is_never_persisted() {
    let service =
        NavigationService::new(SqliteNavigationStore::open_in_memory().expect("open store"));
    service.ensure_navigator("chat-1", "Chat").expect("navigator");
    service
        .add_entry_for_chat("chat-1", "m1", "u1", "## Title\n### Early\n## Later\n")
        .expect("add entry");

    let tree = service.get_navigator("chat-1").expect("tree");
    let sections = &tree.entries[0].sections;
    let early = &sections[0];
    let parent = early.parent_id.as_deref().expect("synthetic parent id");
    assert!(sections.iter().all(|section| section.id != parent));
}
