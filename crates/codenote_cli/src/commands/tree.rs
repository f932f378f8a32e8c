//! Tree command handler

use anyhow::Result;
use codenote_core::{build_tree, NoteStorage};

use crate::output::Output;

pub fn show(store: &impl NoteStorage, filter: Option<&str>, output: &Output) -> Result<()> {
    let tree = build_tree(store, filter)?;
    output.print_tree(&tree);
    Ok(())
}
