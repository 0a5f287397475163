/// Standard output utilities for consistent command formatting
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use taxonomist_core::ChangeEntry;
use taxonomist_taxonomy::{NodeId, TaxonomyTree};

/// Display a section header
pub fn section_header(title: &str) {
    println!("\n{}", title.bold().cyan());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Display an info message
pub fn info(message: &str) {
    println!("{} {}", "●".blue(), message);
}

/// Display a warning message
pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Display an empty/none indicator
pub fn empty(message: &str) {
    println!("{} {}", "◌".dimmed(), message);
}

/// Display a process/action message
pub fn action(message: &str) {
    println!("{} {}", "▶".cyan(), message);
}

/// Tree structure item
pub fn tree_item(is_last: bool, label: &str, value: Option<&str>) {
    let prefix = if is_last { "└─" } else { "├─" };
    if let Some(val) = value {
        println!("{} {}: {}", prefix.dimmed(), label, val);
    } else {
        println!("{} {}", prefix.dimmed(), label);
    }
}

/// Labelled values as a flat tree
pub fn tree_section(items: &[(&str, String)]) {
    for (i, (label, value)) in items.iter().enumerate() {
        tree_item(i == items.len() - 1, label, Some(value));
    }
}

/// Create a standard table with our preferred styling
pub fn create_standard_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a standard header cell
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .fg(TableColor::Cyan)
}

/// Render a taxonomy tree, root first, children indented beneath their parent
pub fn render_taxonomy(tree: &TaxonomyTree) {
    let root = tree.root_node();
    println!("{} {}", root.title().bold(), root.base_path().dimmed());
    render_children(tree, tree.root(), "");
}

fn render_children(tree: &TaxonomyTree, parent: NodeId, prefix: &str) {
    let children = tree.children(parent);
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let connector = if is_last { "└─" } else { "├─" };
        let node = tree.node(*child);
        println!(
            "{}{} {} {}",
            prefix,
            connector.dimmed(),
            node.title(),
            node.base_path().dimmed()
        );

        let child_prefix = if is_last {
            format!("{}   ", prefix)
        } else {
            format!("{}│  ", prefix)
        };
        render_children(tree, *child, &child_prefix);
    }
}

/// One line per change: `~ title: "Old" → "New"`
pub fn change_line(change: &ChangeEntry) -> String {
    let op = match change.op() {
        ChangeEntry::ADDED => change.op().green(),
        ChangeEntry::REMOVED => change.op().red(),
        _ => change.op().yellow(),
    };
    let detail = match (change.old_value(), change.new_value()) {
        (Some(old), Some(new)) => format!("{} → {}", old, new),
        (Some(old), None) => old.to_string(),
        (None, Some(new)) => new.to_string(),
        (None, None) => String::new(),
    };
    format!("{} {}: {}", op, change.field(), detail)
}

/// Print a value as pretty JSON
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
