//! Output formatting for the CLI.
//!
//! Human-readable text by default, one JSON value per command with `--json`.

use codenote_core::{Category, CategoryTree, CoreConfig, Document, TreeItem};
use serde_json::json;

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_human(&self) -> bool {
        !self.json
    }

    /// Status line for a completed mutation; suppressed in JSON mode.
    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn print_categories(&self, categories: &[Category]) {
        if self.json {
            println!("{}", json!(categories));
            return;
        }
        if categories.is_empty() {
            println!("No categories.");
            return;
        }
        for category in categories {
            let parent = category
                .parent_id
                .map(|id| short_id(&id.to_string()))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}  {:<24} parent={} order={}",
                short_id(&category.id.to_string()),
                category.name,
                parent,
                category.sort_order
            );
        }
    }

    pub fn print_category(&self, category: &Category) {
        if self.json {
            println!("{}", json!(category));
        } else {
            println!("{}  {}", category.id, category.name);
        }
    }

    pub fn print_documents(&self, documents: &[Document]) {
        if self.json {
            println!("{}", json!(documents));
            return;
        }
        if documents.is_empty() {
            println!("No documents.");
            return;
        }
        for document in documents {
            println!(
                "{}  {:<32} [{}] {}",
                short_id(&document.id.to_string()),
                document.title,
                document.syntax_language,
                document.updated_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    pub fn print_document(&self, document: &Document) {
        if self.json {
            println!("{}", json!(document));
            return;
        }
        println!("ID:       {}", document.id);
        println!("Title:    {}", document.title);
        println!("Category: {}", document.category_id);
        println!("Language: {}", document.syntax_language);
        println!("Created:  {}", document.created_at.to_rfc3339());
        println!("Updated:  {}", document.updated_at.to_rfc3339());
        println!();
        println!("{}", document.content);
    }

    pub fn print_tree(&self, tree: &CategoryTree) {
        let rows = tree.rows();
        if self.json {
            let rows = rows
                .iter()
                .map(|row| {
                    let (kind, id) = match row.item {
                        TreeItem::Category(category) => ("category", category.id),
                        TreeItem::Document(document) => ("document", document.id),
                    };
                    json!({
                        "depth": row.depth,
                        "kind": kind,
                        "id": id,
                        "label": row.item.label(),
                    })
                })
                .collect::<Vec<_>>();
            println!("{}", json!({ "filter": tree.filter, "rows": rows }));
            return;
        }
        if rows.is_empty() {
            println!("Nothing matches.");
            return;
        }
        for row in rows {
            let indent = "  ".repeat(row.depth);
            match row.item {
                TreeItem::Category(category) => println!("{indent}+ {}", category.name),
                TreeItem::Document(document) => println!(
                    "{indent}- {} ({})",
                    document.title,
                    short_id(&document.id.to_string())
                ),
            }
        }
    }

    pub fn print_config(&self, config: &CoreConfig) {
        if self.json {
            println!(
                "{}",
                json!({
                    "config_file": CoreConfig::config_file_path(),
                    "database": config.database_path(),
                    "log_dir": config.log_dir,
                    "log_level": config.log_level,
                    "autosave_interval_secs": config.autosave_interval_secs,
                })
            );
            return;
        }
        println!("Config file: {}", CoreConfig::config_file_path().display());
        println!("Database:    {}", config.database_path().display());
        println!("Log dir:     {}", config.log_dir.display());
        println!("Log level:   {}", config.log_level);
        println!("Autosave:    {}s", config.autosave_interval_secs);
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
