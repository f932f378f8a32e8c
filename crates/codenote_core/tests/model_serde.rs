use codenote_core::{Document, NewDocument, NoteStorage, NoteStore, SyntaxLanguage};
use serde_json::Value;

#[test]
fn syntax_language_serializes_as_display_name() {
    assert_eq!(
        serde_json::to_string(&SyntaxLanguage::CSharp).unwrap(),
        "\"C#\""
    );
    assert_eq!(
        serde_json::from_str::<SyntaxLanguage>("\"C++\"").unwrap(),
        SyntaxLanguage::Cpp
    );
    assert!(serde_json::from_str::<SyntaxLanguage>("\"Rust\"").is_err());
}

#[test]
fn document_json_carries_rfc3339_timestamps() {
    let store = NoteStore::open_in_memory().unwrap();
    let category = store.list_categories().unwrap()[0].id;
    let document = store
        .add_document(
            NewDocument::new(category)
                .title("styles")
                .language(SyntaxLanguage::Css),
        )
        .unwrap();

    let value: Value = serde_json::to_value(&document).unwrap();
    assert_eq!(value["syntax_language"], "CSS");
    assert_eq!(value["title"], "styles");
    let updated_at = value["updated_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(updated_at).is_ok());

    let decoded: Document = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, document);
}
