//! Import of the legacy comma-separated inventory text.
//!
//! Each line is `name,price,quantity` with no header. The format never
//! escaped commas, so a name containing one spreads over several fields;
//! the last two fields are always taken as price and quantity and the rest
//! are rejoined into the name. Quoted fields are honored when present.
//!
//! This format is import-only: inventories are always written back as JSON.

use std::path::Path;

use crate::error::PersistenceError;
use crate::types::{Item, Validate, checked_quantity};

/// Items recovered from a legacy file, plus how many lines were unusable.
#[derive(Debug, Clone, Default)]
pub struct LegacyImport {
    pub items: Vec<Item>,
    pub skipped: usize,
}

/// Read and parse a legacy inventory file.
pub fn read_legacy_inventory(path: &Path) -> Result<LegacyImport, PersistenceError> {
    let contents = std::fs::read_to_string(path).map_err(|e| PersistenceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(parse_legacy_inventory(&contents))
}

/// Parse legacy inventory text. Malformed lines are logged and skipped.
pub fn parse_legacy_inventory(content: &str) -> LegacyImport {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut import = LegacyImport::default();

    for (line, result) in reader.records().enumerate() {
        let line = line + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed inventory line {line}: {e}");
                import.skipped += 1;
                continue;
            }
        };

        let fields: Vec<&str> = record.iter().collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        match parse_fields(&fields) {
            Ok(item) => import.items.push(item),
            Err(reason) => {
                log::warn!("Skipping inventory line {line}: {reason}");
                import.skipped += 1;
            }
        }
    }

    import
}

fn parse_fields(fields: &[&str]) -> Result<Item, String> {
    if fields.len() < 3 {
        return Err(format!("expected name,price,quantity, got {} field(s)", fields.len()));
    }
    let (name_parts, numbers) = fields.split_at(fields.len() - 2);
    let name = name_parts.join(",");

    let price: f64 = numbers[0]
        .parse()
        .map_err(|_| format!("invalid price '{}'", numbers[0]))?;
    let quantity: i64 = numbers[1]
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", numbers[1]))?;
    let quantity = checked_quantity(quantity).map_err(|e| e.to_string())?;

    let item = Item::new(name, "", price, quantity);
    item.validate().map_err(|e| e.to_string())?;
    Ok(item)
}
