//! Output formatting for CLI

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn table_of<T: TableDisplay>(items: &[T]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

fn print_plain<T: TableDisplay>(item: &T) {
    for (header, value) in T::headers().iter().zip(item.row().iter()) {
        println!("{}: {}", header, value);
    }
}

/// Machine-readable rendering, newline terminated; `None` for table and plain
fn serialized<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Json => {
            Some(format!("{}\n", serde_json::to_string_pretty(value).unwrap_or_default()))
        }
        OutputFormat::Yaml => Some(serde_yaml::to_string(value).unwrap_or_default()),
        OutputFormat::Table | OutputFormat::Plain => None,
    }
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    if let Some(text) = serialized(item, format) {
        print!("{}", text);
        return;
    }
    match format {
        OutputFormat::Plain => print_plain(item),
        _ => println!("{}", table_of(std::slice::from_ref(item))),
    }
}

/// Print a list of items
///
/// JSON and YAML always print a sequence, `[]` when empty.
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if let Some(text) = serialized(items, format) {
        print!("{}", text);
        return;
    }
    if items.is_empty() {
        println!("No items found.");
        return;
    }

    match format {
        OutputFormat::Plain => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                print_plain(item);
            }
        }
        _ => println!("{}", table_of(items)),
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}
