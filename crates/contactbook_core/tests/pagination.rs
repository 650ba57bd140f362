mod support;

use contactbook_core::{paginate, Clock, Contact, ManualClock, PageRange, PAGE_SIZE};
use std::collections::HashSet;
use support::t0;

fn contacts_named(clock: &ManualClock, names: &[&str]) -> Vec<Contact> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            clock.advance_millis(1);
            Contact::create(name, &format!("user{index}@example.com"), clock.now()).unwrap()
        })
        .collect()
}

fn numbered(clock: &ManualClock, count: usize) -> Vec<Contact> {
    let names: Vec<String> = (0..count).map(|index| format!("Person {index:03}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    contacts_named(clock, &refs)
}

#[test]
fn six_records_split_into_two_pages_with_range_metadata() {
    let clock = ManualClock::new(t0());
    let contacts = numbered(&clock, 6);

    let first = paginate(&contacts, 1, PAGE_SIZE);
    assert_eq!(first.items.len(), 5);
    assert_eq!(
        first.range,
        Some(PageRange {
            start: 1,
            end: 5,
            total: 6
        })
    );
    assert_eq!(first.summary(), "Showing 1-5 of 6 contacts");
    assert!(first.show_controls());
    assert!(first.has_next());
    assert!(!first.has_previous());

    let second = paginate(&contacts, 2, PAGE_SIZE);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.summary(), "Showing 6-6 of 6 contacts");
    assert!(second.has_previous());
    assert!(!second.has_next());
}

#[test]
fn pages_partition_the_collection() {
    let clock = ManualClock::new(t0());
    for count in [0_usize, 1, 4, 5, 6, 10, 11, 23] {
        let contacts = numbered(&clock, count);
        let total_pages = paginate(&contacts, 1, PAGE_SIZE).total_pages;

        let mut seen = HashSet::new();
        let mut visible = 0;
        for page in 1..=total_pages {
            for contact in paginate(&contacts, page, PAGE_SIZE).items {
                visible += 1;
                assert!(seen.insert(contact.id().to_string()), "duplicate on page {page}");
            }
        }
        assert_eq!(visible, count);
    }
}

#[test]
fn sort_is_case_insensitive_and_stable() {
    let clock = ManualClock::new(t0());
    let contacts = contacts_named(&clock, &["bob", "Alice", "alice", "Carol", "BOB"]);

    let view = paginate(&contacts, 1, PAGE_SIZE);
    let emails: Vec<&str> = view.items.iter().map(Contact::email).collect();
    assert_eq!(
        emails,
        vec![
            "user1@example.com",
            "user2@example.com",
            "user0@example.com",
            "user4@example.com",
            "user3@example.com"
        ]
    );
}

#[test]
fn out_of_range_pages_are_clamped() {
    let clock = ManualClock::new(t0());
    let contacts = numbered(&clock, 12);

    assert_eq!(paginate(&contacts, 0, PAGE_SIZE).page, 1);
    let last = paginate(&contacts, 50, PAGE_SIZE);
    assert_eq!(last.page, 3);
    assert_eq!(last.summary(), "Showing 11-12 of 12 contacts");
}

#[test]
fn empty_collection_has_single_page_without_controls() {
    let view = paginate(&[], 4, PAGE_SIZE);
    assert_eq!(view.page, 1);
    assert_eq!(view.total_pages, 1);
    assert!(view.items.is_empty());
    assert!(view.is_empty());
    assert!(!view.show_controls());
    assert_eq!(view.summary(), "No contacts yet");
}

#[test]
fn paginate_does_not_reorder_the_source_collection() {
    let clock = ManualClock::new(t0());
    let contacts = contacts_named(&clock, &["Zed", "Amy"]);

    let view = paginate(&contacts, 1, PAGE_SIZE);
    assert_eq!(view.items[0].name(), "Amy");
    assert_eq!(contacts[0].name(), "Zed");
}
