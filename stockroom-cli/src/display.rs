//! Tabular rendering of records.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use stockroom_catalog::{Book, Field, Item, Record};

/// How a record kind is laid out as a table row.
///
/// The last column is always the quantity; a zero quantity is shown in red.
pub(crate) trait TableRow: Record {
    /// Column headers and their maximum widths.
    const COLUMNS: &'static [(&'static str, usize)];
    /// Fields offered by the interactive filter.
    const SEARCH_FIELDS: &'static [Field];
    /// Whether lookups by identity need a publisher.
    const NEEDS_PUBLISHER: bool;

    fn cells(&self) -> Vec<String>;
}

impl TableRow for Book {
    const COLUMNS: &'static [(&'static str, usize)] = &[
        ("Title", 32),
        ("Author", 22),
        ("Publisher", 20),
        ("Category", 14),
        ("Pages", 6),
        ("Qty", 8),
    ];
    const SEARCH_FIELDS: &'static [Field] =
        &[Field::Name, Field::Author, Field::Publisher, Field::Category];
    const NEEDS_PUBLISHER: bool = true;

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.author.clone(),
            self.publisher.clone(),
            self.category.clone(),
            self.pages.to_string(),
            self.quantity.to_string(),
        ]
    }
}

impl TableRow for Item {
    const COLUMNS: &'static [(&'static str, usize)] = &[
        ("Name", 32),
        ("Category", 16),
        ("Price", 10),
        ("Qty", 8),
    ];
    const SEARCH_FIELDS: &'static [Field] = &[Field::Name, Field::Category];
    const NEEDS_PUBLISHER: bool = false;

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.clone(),
            format!("{:.2}", self.unit_price),
            self.quantity.to_string(),
        ]
    }
}

/// Render records as aligned lines: a header, a rule, then one line per record.
///
/// Returns an empty vector when there are no records.
pub(crate) fn render_table<'a, R: TableRow + 'a>(
    records: impl IntoIterator<Item = &'a R>,
) -> Vec<String> {
    let rows: Vec<(Vec<String>, bool)> = records
        .into_iter()
        .map(|r| (r.cells(), r.quantity() == 0))
        .collect();
    if rows.is_empty() {
        return Vec::new();
    }

    let widths: Vec<usize> = R::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, (header, max))| {
            rows.iter()
                .map(|(cells, _)| cells[i].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
                .min(*max)
        })
        .collect();

    let last = widths.len() - 1;
    let mut lines = Vec::with_capacity(rows.len() + 2);

    let header: Vec<String> = R::COLUMNS
        .iter()
        .zip(&widths)
        .map(|((h, _), w)| pad(h, *w))
        .collect();
    lines.push(
        header
            .join("  ")
            .if_supports_color(Stdout, |t| t.bold())
            .to_string(),
    );
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );

    for (cells, out_of_stock) in rows {
        let mut padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(&truncate_str(c, *w), *w))
            .collect();
        if out_of_stock {
            padded[last] = padded[last]
                .if_supports_color(Stdout, |t| t.red())
                .to_string();
        }
        lines.push(padded.join("  ").trim_end().to_string());
    }

    lines
}

fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

/// Truncate a string to at most `max` characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

/// Uppercase the first character: "books" becomes "Books".
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
