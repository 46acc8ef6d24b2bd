/// Projection tests
///
/// Tests for the pure filter/sort/paginate derivation.
/// Run with: cargo test --test projection_tests
use boardsync::prelude::*;
use chrono::{DateTime, Utc};

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn post(id: &str, title: &str, owner: &str, secs: i64) -> Item {
    NewItem::new(ItemKind::Post, title, UserId::new(owner)).into_item(ItemId::new(id), at(secs))
}

fn with_likes(mut item: Item, n: usize) -> Item {
    for i in 1..=n {
        item.liked_by.insert(UserId::new(format!("liker-{i}")));
    }
    item
}

fn pinned(mut item: Item) -> Item {
    item.pinned = true;
    item
}

fn seeded(items: Vec<Item>) -> ProjectionStore {
    let mut store = ProjectionStore::new();
    let ticket = store.begin_load();
    store.finish_load(ticket, items).unwrap();
    store
}

#[test]
fn test_most_liked_ties_keep_input_order() {
    // Two items with 5 likes each; the earlier one in the collection has
    // the newer timestamp, which must not matter for the tie
    let store = seeded(vec![
        with_likes(post("p1", "First", "alice", 100), 5),
        with_likes(post("p2", "Second", "bob", 50), 5),
    ]);

    let view = store.project(&ItemFilter::all(), SortOrder::MostLiked);
    assert_eq!(view[0].id, ItemId::new("p1"));
    assert_eq!(view[1].id, ItemId::new("p2"));
}

#[test]
fn test_most_liked_orders_by_like_count() {
    let store = seeded(vec![
        with_likes(post("p1", "One like", "alice", 300), 1),
        with_likes(post("p2", "Three likes", "bob", 200), 3),
        post("p3", "No likes", "carol", 100),
    ]);

    let view = store.project(&ItemFilter::all(), SortOrder::MostLiked);
    let ids: Vec<&str> = view.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p1", "p3"]);
}

#[test]
fn test_newest_and_oldest_orderings() {
    let store = seeded(vec![
        post("p1", "Middle", "alice", 200),
        post("p2", "Oldest", "bob", 100),
        post("p3", "Newest", "carol", 300),
    ]);

    let newest = store.project(&ItemFilter::all(), SortOrder::Newest);
    let ids: Vec<&str> = newest.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["p3", "p1", "p2"]);

    let oldest = store.project(&ItemFilter::all(), SortOrder::Oldest);
    let ids: Vec<&str> = oldest.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p1", "p3"]);
}

#[test]
fn test_pinned_first_groups_then_newest_within_group() {
    let store = seeded(vec![
        pinned(post("p1", "Pinned old", "alice", 10)),
        post("p2", "Unpinned new", "bob", 100),
        pinned(post("p3", "Pinned newer", "carol", 50)),
        post("p4", "Unpinned old", "dave", 20),
    ]);

    let view = store.project(&ItemFilter::all(), SortOrder::PinnedFirst);
    let ids: Vec<&str> = view.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["p3", "p1", "p2", "p4"]);
}

#[test]
fn test_pagination_clamps_to_last_page() {
    let items: Vec<Item> = (1..=25)
        .map(|i| post(&format!("p{i:02}"), &format!("Post {i}"), "alice", i))
        .collect();
    let store = seeded(items);

    let view = store.project(&ItemFilter::all(), SortOrder::Oldest);
    let page = paginate(&view, 10, 99);

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 3);
    assert_eq!(page.total_items, 25);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].id, ItemId::new("p21"));
    assert_eq!(page.items[4].id, ItemId::new("p25"));
}

#[test]
fn test_filter_query_matches_title_and_body() {
    let mut wanted = post("p1", "Parking permits", "alice", 100);
    wanted.body = "New permit stickers available".to_string();
    let store = seeded(vec![wanted, post("p2", "Pool hours", "bob", 200)]);

    let by_title = store.project(&ItemFilter::all().query("PARKING"), SortOrder::Newest);
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, ItemId::new("p1"));

    let by_body = store.project(&ItemFilter::all().query("stickers"), SortOrder::Newest);
    assert_eq!(by_body.len(), 1);

    let none = store.project(&ItemFilter::all().query("elevator"), SortOrder::Newest);
    assert!(none.is_empty());
}

#[test]
fn test_filter_owner_and_kind_combine() {
    let cleaning = NewItem::new(ItemKind::Cleaning, "Lobby floor", UserId::new("alice"))
        .into_item(ItemId::new("c1"), at(100));
    let repair = NewItem::new(ItemKind::Repair, "Lobby door", UserId::new("alice"))
        .into_item(ItemId::new("r1"), at(200));
    let store = seeded(vec![cleaning, repair, post("p1", "Lobby art", "bob", 300)]);

    let alices = store.project(
        &ItemFilter::all().owned_by(UserId::new("alice")),
        SortOrder::Oldest,
    );
    assert_eq!(alices.len(), 2);

    let requests = store.project(
        &ItemFilter::all().kind(ItemKind::Cleaning).kind(ItemKind::Repair),
        SortOrder::Oldest,
    );
    assert_eq!(requests.len(), 2);

    let alices_repairs = store.project(
        &ItemFilter::all()
            .owned_by(UserId::new("alice"))
            .kind(ItemKind::Repair),
        SortOrder::Oldest,
    );
    assert_eq!(alices_repairs.len(), 1);
    assert_eq!(alices_repairs[0].id, ItemId::new("r1"));
}

#[test]
fn test_project_does_not_mutate_store_order() {
    let store = seeded(vec![
        post("p1", "A", "alice", 100),
        post("p2", "B", "bob", 300),
        post("p3", "C", "carol", 200),
    ]);

    let _ = store.project(&ItemFilter::all(), SortOrder::Newest);
    let ids: Vec<&str> = store.snapshot().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}
