use codenote_core::{
    CascadeCounts, Category, NewDocument, NoteStorage, NoteStore, StoreError, SyntaxLanguage,
};

fn store() -> NoteStore {
    NoteStore::open_in_memory().unwrap()
}

fn general(store: &NoteStore) -> Category {
    store
        .list_categories()
        .unwrap()
        .into_iter()
        .find(|category| category.name == "General")
        .unwrap()
}

fn set_updated_at(store: &NoteStore, id: uuid::Uuid, value: &str) {
    store
        .connection()
        .execute(
            "UPDATE documents SET updated_at = ?2 WHERE id = ?1;",
            rusqlite::params![id.to_string(), value],
        )
        .unwrap();
}

#[test]
fn initialize_seeds_exactly_one_general_category() {
    let store = store();

    let categories = store.list_categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "General");
    assert_eq!(categories[0].sort_order, 0);
    assert!(categories[0].parent_id.is_none());

    assert!(store.initialize().unwrap().is_none());
    assert_eq!(store.list_categories().unwrap().len(), 1);
}

#[test]
fn reopening_file_database_does_not_reseed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");

    let first = NoteStore::open(&path).unwrap();
    let general_id = general(&first).id;
    drop(first);

    let second = NoteStore::open(&path).unwrap();
    let categories = second.list_categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, general_id);
}

#[test]
fn add_category_defaults_name_and_appends_after_siblings() {
    let store = store();
    let unnamed = store.add_category(None, None).unwrap();
    let named = store.add_category(Some("  Rust  "), None).unwrap();

    assert_eq!(unnamed.name, "New Category");
    assert_eq!(unnamed.sort_order, 1);
    assert_eq!(named.name, "Rust");
    assert_eq!(named.sort_order, 2);

    let child = store.add_category(Some("Async"), Some(named.id)).unwrap();
    assert_eq!(child.parent_id, Some(named.id));
    assert_eq!(child.sort_order, 0);
}

#[test]
fn add_category_rejects_blank_name_and_missing_parent() {
    let store = store();

    assert!(matches!(
        store.add_category(Some("   "), None),
        Err(StoreError::InvalidName)
    ));

    let missing = uuid::Uuid::new_v4();
    let err = store.add_category(Some("Orphan"), Some(missing)).unwrap_err();
    assert!(matches!(err, StoreError::ParentNotFound(id) if id == missing));
    assert!(err.is_not_found());
}

#[test]
fn categories_are_ordered_by_sort_order_then_name() {
    let store = store();
    let beta = store.add_category(Some("Beta"), None).unwrap();
    let alpha = store.add_category(Some("Alpha"), None).unwrap();
    store.move_category(alpha.id, None, Some(0)).unwrap();

    let names = store
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Alpha", "General", "Beta"]);

    // equal sort orders fall back to name
    store
        .connection()
        .execute(
            "UPDATE categories SET sort_order = 7 WHERE parent_id IS NULL;",
            [],
        )
        .unwrap();
    let names = store
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Alpha", "Beta", "General"]);
    assert!(store.get_category(beta.id).unwrap().is_some());
}

#[test]
fn category_name_ties_ignore_case_like_document_titles() {
    let store = store();
    store.add_category(Some("banana"), None).unwrap();
    store.add_category(Some("Apple"), None).unwrap();
    store.add_category(Some("apple"), None).unwrap();
    store
        .connection()
        .execute("UPDATE categories SET sort_order = 0;", [])
        .unwrap();

    let names = store
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Apple", "apple", "banana", "General"]);
}

#[test]
fn rename_category_updates_name_and_ignores_unknown_ids() {
    let store = store();
    let category = general(&store);

    assert!(store.rename_category(category.id, "Inbox").unwrap());
    let renamed = store.get_category(category.id).unwrap().unwrap();
    assert_eq!(renamed.name, "Inbox");
    assert!(renamed.updated_at >= category.updated_at);

    assert!(!store.rename_category(uuid::Uuid::new_v4(), "Nope").unwrap());
    assert!(matches!(
        store.rename_category(category.id, ""),
        Err(StoreError::InvalidName)
    ));
}

#[test]
fn move_category_rejects_cycles() {
    let store = store();
    let root = store.add_category(Some("Root"), None).unwrap();
    let child = store.add_category(Some("Child"), Some(root.id)).unwrap();
    let grandchild = store.add_category(Some("Grandchild"), Some(child.id)).unwrap();

    let err = store
        .move_category(root.id, Some(grandchild.id), None)
        .unwrap_err();
    assert!(matches!(err, StoreError::CycleDetected { .. }));
    let err = store.move_category(root.id, Some(root.id), None).unwrap_err();
    assert!(matches!(err, StoreError::CycleDetected { .. }));

    let unchanged = store.get_category(root.id).unwrap().unwrap();
    assert!(unchanged.parent_id.is_none());
}

#[test]
fn move_category_reparents_and_renumbers_siblings() {
    let store = store();
    let parent = store.add_category(Some("Parent"), None).unwrap();
    let first = store.add_category(Some("First"), Some(parent.id)).unwrap();
    let second = store.add_category(Some("Second"), Some(parent.id)).unwrap();
    let loose = store.add_category(Some("Loose"), None).unwrap();

    store.move_category(loose.id, Some(parent.id), Some(1)).unwrap();

    let order = store
        .list_categories()
        .unwrap()
        .into_iter()
        .filter(|category| category.parent_id == Some(parent.id))
        .map(|category| (category.id, category.sort_order))
        .collect::<Vec<_>>();
    assert_eq!(order, vec![(first.id, 0), (loose.id, 1), (second.id, 2)]);

    store.move_category(first.id, None, None).unwrap();
    let moved = store.get_category(first.id).unwrap().unwrap();
    assert!(moved.parent_id.is_none());
}

#[test]
fn move_category_of_unknown_id_is_not_found() {
    let store = store();
    let err = store
        .move_category(uuid::Uuid::new_v4(), None, None)
        .unwrap_err();
    assert!(matches!(err, StoreError::CategoryNotFound(_)));
}

#[test]
fn add_document_applies_defaults() {
    let store = store();
    let category = general(&store);

    let document = store.add_document(NewDocument::new(category.id)).unwrap();
    assert_eq!(document.title, "Untitled");
    assert_eq!(document.content, "");
    assert_eq!(document.syntax_language, SyntaxLanguage::Plain);
    assert_eq!(document.created_at, document.updated_at);

    let fetched = store.get_document(document.id).unwrap().unwrap();
    assert_eq!(fetched, document);
}

#[test]
fn add_document_to_missing_category_fails() {
    let store = store();
    let err = store
        .add_document(NewDocument::new(uuid::Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(err, StoreError::CategoryNotFound(_)));
}

#[test]
fn save_document_round_trips_and_refreshes_updated_at() {
    let store = store();
    let category = general(&store);
    let mut document = store
        .add_document(NewDocument::new(category.id).title("draft"))
        .unwrap();

    document.title = "Query".to_string();
    document.content = "SELECT 1;".to_string();
    document.syntax_language = SyntaxLanguage::Sql;
    let saved = store.save_document(&document).unwrap();

    let fetched = store.get_document(document.id).unwrap().unwrap();
    assert_eq!(fetched.title, "Query");
    assert_eq!(fetched.content, "SELECT 1;");
    assert_eq!(fetched.syntax_language, SyntaxLanguage::Sql);
    assert!(fetched.updated_at >= document.updated_at);
    assert_eq!(fetched, saved);
    assert_eq!(fetched.created_at, document.created_at);
}

#[test]
fn save_document_is_idempotent() {
    let store = store();
    let category = general(&store);
    let mut document = store
        .add_document(NewDocument::new(category.id).content("a"))
        .unwrap();
    document.content = "b".to_string();

    let first = store.save_document(&document).unwrap();
    let second = store.save_document(&document).unwrap();
    assert_eq!(first.content, second.content);
    assert_eq!(first.title, second.title);
    assert_eq!(first.syntax_language, second.syntax_language);
}

#[test]
fn save_document_normalizes_blank_title() {
    let store = store();
    let category = general(&store);
    let mut document = store
        .add_document(NewDocument::new(category.id).title("Named"))
        .unwrap();
    document.title = "   ".to_string();

    let saved = store.save_document(&document).unwrap();
    assert_eq!(saved.title, "Untitled");
}

#[test]
fn save_deleted_document_is_not_found() {
    let store = store();
    let category = general(&store);
    let document = store.add_document(NewDocument::new(category.id)).unwrap();
    assert!(store.delete_document(document.id).unwrap());

    let err = store.save_document(&document).unwrap_err();
    assert!(matches!(err, StoreError::DocumentNotFound(id) if id == document.id));
    assert!(!store.delete_document(document.id).unwrap());
    assert!(store.get_document(document.id).unwrap().is_none());
}

#[test]
fn documents_are_ordered_by_title() {
    let store = store();
    let category = general(&store);
    for title in ["delta", "Alpha", "charlie", "Bravo"] {
        store
            .add_document(NewDocument::new(category.id).title(title))
            .unwrap();
    }

    let titles = store
        .list_documents_by_category(category.id)
        .unwrap()
        .into_iter()
        .map(|document| document.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Alpha", "Bravo", "charlie", "delta"]);
    assert_eq!(store.list_documents().unwrap().len(), 4);
}

#[test]
fn move_document_changes_category() {
    let store = store();
    let source = general(&store);
    let target = store.add_category(Some("Target"), None).unwrap();
    let document = store.add_document(NewDocument::new(source.id)).unwrap();

    assert!(store.move_document(document.id, target.id).unwrap());
    assert!(store.list_documents_by_category(source.id).unwrap().is_empty());
    assert_eq!(store.list_documents_by_category(target.id).unwrap().len(), 1);

    assert!(!store.move_document(uuid::Uuid::new_v4(), target.id).unwrap());
    assert!(matches!(
        store.move_document(document.id, uuid::Uuid::new_v4()),
        Err(StoreError::CategoryNotFound(_))
    ));
}

#[test]
fn delete_category_cascades_to_subtree_only() {
    let store = store();
    let keep = general(&store);
    let doomed = store.add_category(Some("Doomed"), None).unwrap();
    let nested = store.add_category(Some("Nested"), Some(doomed.id)).unwrap();

    let kept_doc = store
        .add_document(NewDocument::new(keep.id).title("kept"))
        .unwrap();
    let doomed_doc = store
        .add_document(NewDocument::new(doomed.id).title("a"))
        .unwrap();
    let nested_doc = store
        .add_document(NewDocument::new(nested.id).title("b"))
        .unwrap();

    let counts = store.delete_category(doomed.id).unwrap();
    assert_eq!(
        counts,
        Some(CascadeCounts {
            categories: 2,
            documents: 2
        })
    );

    assert!(store.get_document(doomed_doc.id).unwrap().is_none());
    assert!(store.get_document(nested_doc.id).unwrap().is_none());
    assert!(store.get_category(nested.id).unwrap().is_none());
    assert!(store.get_document(kept_doc.id).unwrap().is_some());
    assert_eq!(store.list_categories().unwrap().len(), 1);
}

#[test]
fn delete_unknown_category_is_a_noop() {
    let store = store();
    assert_eq!(store.delete_category(uuid::Uuid::new_v4()).unwrap(), None);
    assert_eq!(store.list_categories().unwrap().len(), 1);
}

#[test]
fn deleting_last_category_reseeds_general() {
    let store = store();
    let original = general(&store);

    store.delete_category(original.id).unwrap();

    let categories = store.list_categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "General");
    assert_ne!(categories[0].id, original.id);
}

#[test]
fn search_is_case_insensitive_over_title_and_content() {
    let store = store();
    let category = general(&store);
    let by_title = store
        .add_document(NewDocument::new(category.id).title("Milk run"))
        .unwrap();
    let by_content = store
        .add_document(
            NewDocument::new(category.id)
                .title("Groceries")
                .content("eggs, MILK, bread"),
        )
        .unwrap();
    store
        .add_document(NewDocument::new(category.id).title("Unrelated"))
        .unwrap();

    let mut hits = store
        .search_documents("milk")
        .unwrap()
        .into_iter()
        .map(|document| document.id)
        .collect::<Vec<_>>();
    hits.sort();
    let mut expected = vec![by_title.id, by_content.id];
    expected.sort();
    assert_eq!(hits, expected);
}

#[test]
fn search_orders_by_most_recently_updated() {
    let store = store();
    let category = general(&store);
    let old = store
        .add_document(NewDocument::new(category.id).title("note old"))
        .unwrap();
    let new = store
        .add_document(NewDocument::new(category.id).title("note new"))
        .unwrap();
    let middle = store
        .add_document(NewDocument::new(category.id).title("note middle"))
        .unwrap();
    set_updated_at(&store, old.id, "2024-01-01T00:00:00.000Z");
    set_updated_at(&store, middle.id, "2024-06-01T00:00:00.000Z");
    set_updated_at(&store, new.id, "2025-01-01T00:00:00.000Z");

    let hits = store
        .search_documents("NOTE")
        .unwrap()
        .into_iter()
        .map(|document| document.id)
        .collect::<Vec<_>>();
    assert_eq!(hits, vec![new.id, middle.id, old.id]);
}

#[test]
fn blank_search_returns_nothing() {
    let store = store();
    let category = general(&store);
    store
        .add_document(NewDocument::new(category.id).title("anything"))
        .unwrap();

    assert!(store.search_documents("").unwrap().is_empty());
    assert!(store.search_documents("   ").unwrap().is_empty());
}

#[test]
fn search_keeps_whitespace_inside_the_query() {
    let store = store();
    let category = general(&store);
    let joined = store
        .add_document(NewDocument::new(category.id).title("foobar"))
        .unwrap();
    let spaced = store
        .add_document(NewDocument::new(category.id).title("foo bar"))
        .unwrap();

    let hits = store
        .search_documents(" bar")
        .unwrap()
        .into_iter()
        .map(|document| document.id)
        .collect::<Vec<_>>();
    assert_eq!(hits, vec![spaced.id]);
    assert_eq!(store.search_documents("foo").unwrap().len(), 2);
    assert!(store.get_document(joined.id).unwrap().is_some());
}

#[test]
fn end_to_end_add_find_and_cascade() {
    let store = store();
    let categories = store.list_categories().unwrap();
    assert_eq!(categories.len(), 1);
    let general = &categories[0];
    assert_eq!(general.name, "General");

    let document = store
        .add_document(
            NewDocument::new(general.id)
                .title("Todo")
                .content("buy milk"),
        )
        .unwrap();

    let fetched = store.get_document(document.id).unwrap().unwrap();
    assert_eq!(fetched.title, "Todo");
    assert_eq!(fetched.content, "buy milk");

    let hits = store.search_documents("milk").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, document.id);

    store.delete_category(general.id).unwrap();
    assert!(store.get_document(document.id).unwrap().is_none());
}
