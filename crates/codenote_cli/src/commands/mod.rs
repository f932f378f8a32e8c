//! Subcommand handlers.

use anyhow::{bail, Result};
use codenote_core::{CategoryId, DocumentId, NoteStorage};
use uuid::Uuid;

pub mod category;
pub mod doc;
pub mod tree;

/// Resolves a full UUID or a unique id prefix to a category id.
pub fn resolve_category(storage: &impl NoteStorage, id: &str) -> Result<CategoryId> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }
    let candidates = storage
        .list_categories()?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect::<Vec<_>>();
    resolve_prefix("category", id, &candidates)
}

/// Resolves a full UUID or a unique id prefix to a document id.
pub fn resolve_document(storage: &impl NoteStorage, id: &str) -> Result<DocumentId> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }
    let candidates = storage
        .list_documents()?
        .into_iter()
        .map(|document| (document.id, document.title))
        .collect::<Vec<_>>();
    resolve_prefix("document", id, &candidates)
}

fn resolve_prefix(kind: &str, prefix: &str, candidates: &[(Uuid, String)]) -> Result<Uuid> {
    let prefix = prefix.trim().to_ascii_lowercase();
    if prefix.is_empty() {
        bail!("empty {kind} id");
    }
    let matches = candidates
        .iter()
        .filter(|(id, _)| id.to_string().starts_with(&prefix))
        .collect::<Vec<_>>();

    match matches.as_slice() {
        [] => bail!("no {kind} found matching `{prefix}`"),
        [(id, _)] => Ok(*id),
        many => {
            eprintln!("Multiple {kind}s match `{prefix}`:");
            for (id, label) in many {
                eprintln!("  {id}  {label}");
            }
            bail!("ambiguous {kind} id; provide more characters")
        }
    }
}
