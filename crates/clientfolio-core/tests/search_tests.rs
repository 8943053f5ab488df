//! Search, highlighting, and dashboard analytics integration tests

mod common;

use chrono::{TimeZone, Utc};
use clientfolio_core::{
    folder_breakdown, highlight, recent_clients, search, Analytics, Client, Folder, SearchQuery,
    Segment,
};
use common::fixtures::{add_populated_folder, client_input, empty_store};
use proptest::prelude::*;
use rstest::rstest;

fn client_at(id: &str, name: &str, millis: i64) -> Client {
    Client {
        id: id.to_string(),
        business_name: name.to_string(),
        contact_details: format!("{}@example.com", id),
        problem_description: "Needs bookkeeping".to_string(),
        added_at: Utc.timestamp_millis_opt(millis).unwrap(),
    }
}

fn folder_with(name: &str, active: Vec<Client>, potential: Vec<Client>) -> Folder {
    let mut folder = Folder::new(name).unwrap();
    folder.active_clients = active;
    folder.potential_clients = potential;
    folder
}

// === Search ===

#[rstest]
#[case("acme", 1)]
#[case("ACME", 1)]
#[case("example.com", 3)]
#[case("bookkeeping", 3)]
#[case("zzz", 0)]
#[case("(", 0)]
fn test_search_counts(#[case] query: &str, #[case] expected: usize) {
    let folders = vec![folder_with(
        "Leads",
        vec![client_at("a", "Acme Corp", 1), client_at("b", "Bolt Ltd", 2)],
        vec![client_at("c", "Crate & Barrel", 3)],
    )];
    let views = search(&folders, &SearchQuery::new(query));
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].match_count(), expected);
}

#[test]
fn test_search_keeps_folders_without_matches() {
    let mut store = empty_store();
    add_populated_folder(&mut store, "North", 2, 0);
    let south = add_populated_folder(&mut store, "South", 0, 1);
    store
        .add_client(&south, clientfolio_core::ClientKind::Active, &client_input("Acme Corp"))
        .unwrap();

    let views = store.search(&SearchQuery::new("acme"));
    let counts: Vec<_> = views.iter().map(|v| (v.folder.name.as_str(), v.match_count())).collect();
    assert_eq!(counts, vec![("North", 0), ("South", 1)]);
    assert_eq!(views[1].active[0].business_name, "Acme Corp");
    assert!(views[1].potential.is_empty());
}

#[test]
fn test_whitespace_query_is_a_real_pattern() {
    let folders = vec![folder_with(
        "Leads",
        vec![client_at("a", "Acme Corp", 1), client_at("b", "Bolt", 2)],
        vec![],
    )];
    let views = search(&folders, &SearchQuery::new(" "));
    // every client has a space somewhere in its problem description
    assert_eq!(views[0].match_count(), 2);
    let views = search(&folders, &SearchQuery::new("  "));
    assert_eq!(views[0].match_count(), 0);
}

// === Highlight ===

#[test]
fn test_highlight_marks_every_occurrence() {
    let segments = highlight("Acme builds acme parts", &SearchQuery::new("ACME"));
    assert_eq!(
        segments,
        vec![
            Segment::Match("Acme"),
            Segment::Plain(" builds "),
            Segment::Match("acme"),
            Segment::Plain(" parts"),
        ]
    );
}

#[test]
fn test_highlight_treats_query_literally() {
    let segments = highlight("Fix (urgent) a.b", &SearchQuery::new("(urgent)"));
    let matched: Vec<_> = segments.iter().filter(|s| s.is_match()).map(|s| s.text()).collect();
    assert_eq!(matched, vec!["(urgent)"]);

    let segments = highlight("axb a.b", &SearchQuery::new("a.b"));
    let matched: Vec<_> = segments.iter().filter(|s| s.is_match()).map(|s| s.text()).collect();
    assert_eq!(matched, vec!["a.b"]);
}

// === Analytics ===

#[test]
fn test_most_populated_tie_goes_to_first() {
    let folders = vec![
        folder_with(
            "Three",
            vec![client_at("a", "A", 1)],
            vec![client_at("b", "B", 2), client_at("c", "C", 3)],
        ),
        folder_with(
            "Five",
            (0..5).map(|i| client_at(&format!("f{i}"), "F", i)).collect(),
            vec![],
        ),
        folder_with(
            "AlsoFive",
            vec![],
            (0..5).map(|i| client_at(&format!("g{i}"), "G", i)).collect(),
        ),
    ];
    let analytics = Analytics::compute(&folders);
    assert_eq!(analytics.most_populated_label(), "Five");
    assert_eq!(analytics.total_clients, 13);
    assert_eq!(analytics.avg_clients_per_folder, 4);
    assert_eq!(analytics.conversion_rate, 46);
}

#[test]
fn test_empty_collection_analytics() {
    let analytics = Analytics::compute(&[]);
    assert_eq!(analytics.conversion_rate, 0);
    assert_eq!(analytics.avg_clients_per_folder, 0);
    assert_eq!(analytics.most_populated_label(), "N/A");
}

#[test]
fn test_recent_clients_newest_first_across_folders() {
    let folders = vec![
        folder_with("A", vec![client_at("a1", "A1", 10)], vec![client_at("a2", "A2", 70)]),
        folder_with(
            "B",
            vec![client_at("b1", "B1", 50), client_at("b2", "B2", 30)],
            vec![client_at("b3", "B3", 60), client_at("b4", "B4", 20), client_at("b5", "B5", 40)],
        ),
    ];
    let ids: Vec<_> = recent_clients(&folders, 5).iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a2", "b3", "b1", "b5", "b2"]);
}

#[test]
fn test_recent_clients_equal_times_prefer_active() {
    let folders = vec![
        folder_with("A", vec![], vec![client_at("p", "P", 100)]),
        folder_with("B", vec![client_at("a", "A", 100)], vec![]),
    ];
    let ids: Vec<_> = recent_clients(&folders, 5).iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "p"]);
}

#[test]
fn test_breakdown_shortens_long_names() {
    let folders = vec![
        folder_with("Greater Manchester Area", vec![client_at("a", "A", 1)], vec![]),
        folder_with("Leeds", vec![], vec![]),
    ];
    let labels: Vec<_> = folder_breakdown(&folders).into_iter().map(|b| b.label).collect();
    assert_eq!(labels, vec!["Greater Manches...", "Leeds"]);
}

// === Property-Based Tests ===

proptest! {
    #[test]
    fn test_highlight_reassembles_text(text in "\\PC{0,40}", query in "\\PC{0,4}") {
        let segments = highlight(&text, &SearchQuery::new(query.as_str()));
        let joined: String = segments.iter().map(|s| s.text()).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn test_empty_query_keeps_every_client_in_order(names in proptest::collection::vec("[A-Za-z ]{1,12}", 0..8)) {
        let clients: Vec<Client> = names
            .iter()
            .enumerate()
            .map(|(i, n)| client_at(&format!("c{i}"), n, i as i64))
            .collect();
        let folders = vec![folder_with("All", clients.clone(), vec![])];
        let views = search(&folders, &SearchQuery::new(""));
        prop_assert_eq!(&*views[0].active, clients.as_slice());
    }

    #[test]
    fn test_filter_result_is_ordered_subset(names in proptest::collection::vec("[a-c]{1,4}", 0..10), query in "[a-c]{1,2}") {
        let clients: Vec<Client> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Client {
                contact_details: "x".to_string(),
                problem_description: "y".to_string(),
                ..client_at(&format!("c{i}"), n, i as i64)
            })
            .collect();
        let query = SearchQuery::new(query.as_str());
        let filtered = clientfolio_core::filter_clients(&clients, &query);
        let expected: Vec<&Client> = clients
            .iter()
            .filter(|c| c.business_name.contains(query.as_str()))
            .collect();
        prop_assert_eq!(filtered.iter().collect::<Vec<_>>(), expected);
    }
}
