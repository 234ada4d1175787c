//! Catalogue reconciliation: CSV-to-CSV column enrichment.
//!
//! Raw product exports arrive with free-form `category` and `vendor` columns
//! typed by hand at the source. This one-shot tool maps them onto the
//! canonical catalog taxonomy via manual lookup tables and derives a URL
//! slug, writing a new CSV with the extra columns appended. Rows that match
//! no table entry keep empty canonical columns and are counted, not dropped.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use orchard_core::CategoryId;

/// Errors from the enrich command.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("input is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Manual lookup: free-form category label -> (canonical name, catalog id).
///
/// Keys are matched case-insensitively after trimming.
const CATEGORY_MAP: &[(&str, &str, i32)] = &[
    ("kitchen", "Kitchen", 1),
    ("kitchenware", "Kitchen", 1),
    ("cookware", "Kitchen", 1),
    ("furniture", "Furniture", 2),
    ("woodwork", "Furniture", 2),
    ("decor", "Home Decor", 3),
    ("home decor", "Home Decor", 3),
    ("homeware", "Home Decor", 3),
    ("garden", "Garden", 4),
    ("outdoor", "Garden", 4),
    ("textiles", "Textiles", 5),
    ("linens", "Textiles", 5),
];

/// Manual lookup: free-form vendor label -> canonical brand.
const BRAND_MAP: &[(&str, &str)] = &[
    ("acme woodworks", "Acme Woodworks"),
    ("acme", "Acme Woodworks"),
    ("north loom", "North Loom Co."),
    ("northloom", "North Loom Co."),
    ("verde garden", "Verde Garden Supply"),
    ("verde", "Verde Garden Supply"),
    ("hearth & hand", "Hearth and Hand"),
    ("hearth and hand", "Hearth and Hand"),
];

/// Counters reported after a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub rows: usize,
    pub unmatched_categories: usize,
    pub unmatched_brands: usize,
}

fn lookup_category(raw: &str) -> Option<(&'static str, CategoryId)> {
    let key = raw.trim().to_lowercase();
    CATEGORY_MAP
        .iter()
        .find(|(label, _, _)| *label == key)
        .map(|(_, name, id)| (*name, CategoryId::new(*id)))
}

fn lookup_brand(raw: &str) -> Option<&'static str> {
    let key = raw.trim().to_lowercase();
    BRAND_MAP
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, brand)| *brand)
}

/// Derive a URL slug from a product name.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Enrich a raw export, reading and writing CSV streams.
///
/// The output carries every input column plus `category_id`,
/// `category_name`, `brand`, and `slug`.
///
/// # Errors
///
/// Returns an error on I/O or CSV failures, or if the input lacks the
/// `name`, `category`, or `vendor` columns.
pub fn enrich<R: Read, W: Write>(input: R, output: W) -> Result<EnrichStats, EnrichError> {
    let mut reader = csv::Reader::from_reader(input);
    let mut writer = csv::Writer::from_writer(output);

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| -> Result<usize, EnrichError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(EnrichError::MissingColumn(name))
    };
    let name_idx = column("name")?;
    let category_idx = column("category")?;
    let vendor_idx = column("vendor")?;

    let mut out_headers = headers.clone();
    out_headers.push_field("category_id");
    out_headers.push_field("category_name");
    out_headers.push_field("brand");
    out_headers.push_field("slug");
    writer.write_record(&out_headers)?;

    let mut stats = EnrichStats::default();

    for record in reader.records() {
        let record = record?;
        stats.rows += 1;

        let name = record.get(name_idx).unwrap_or("");
        let raw_category = record.get(category_idx).unwrap_or("");
        let raw_vendor = record.get(vendor_idx).unwrap_or("");

        let (category_name, category_id) = match lookup_category(raw_category) {
            Some((canonical, id)) => (canonical, id.to_string()),
            None => {
                stats.unmatched_categories += 1;
                tracing::warn!(row = stats.rows, category = raw_category, "unmapped category");
                ("", String::new())
            }
        };

        let brand = match lookup_brand(raw_vendor) {
            Some(brand) => brand,
            None => {
                stats.unmatched_brands += 1;
                tracing::warn!(row = stats.rows, vendor = raw_vendor, "unmapped vendor");
                ""
            }
        };

        let mut out = record.clone();
        out.push_field(&category_id);
        out.push_field(category_name);
        out.push_field(brand);
        out.push_field(&slugify(name));
        writer.write_record(&out)?;
    }

    writer.flush()?;
    Ok(stats)
}

/// Enrich `input` into `output` and log the counters.
///
/// # Errors
///
/// See [`enrich`].
pub fn enrich_file(input: &Path, output: &Path) -> Result<(), EnrichError> {
    let stats = enrich(File::open(input)?, File::create(output)?)?;

    tracing::info!(
        rows = stats.rows,
        unmatched_categories = stats.unmatched_categories,
        unmatched_brands = stats.unmatched_brands,
        "catalogue enrichment finished"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Walnut Cutting Board"), "walnut-cutting-board");
        assert_eq!(slugify("  Oak & Ash Stool  "), "oak-ash-stool");
        assert_eq!(slugify("Trivet #3 (round)"), "trivet-3-round");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let (name, id) = lookup_category(" Kitchenware ").unwrap();
        assert_eq!(name, "Kitchen");
        assert_eq!(id, CategoryId::new(1));

        assert_eq!(lookup_brand("ACME"), Some("Acme Woodworks"));
    }

    #[test]
    fn test_enrich_appends_columns_and_counts_misses() {
        let input = "\
id,name,vendor,category,price
1,Walnut Cutting Board,Acme,Kitchenware,54.00
2,Mystery Item,Unknown Vendor,Oddities,9.99
";
        let mut output = Vec::new();
        let stats = enrich(input.as_bytes(), &mut output).unwrap();

        assert_eq!(
            stats,
            EnrichStats {
                rows: 2,
                unmatched_categories: 1,
                unmatched_brands: 1,
            }
        );

        let text = String::from_utf8(output).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,vendor,category,price,category_id,category_name,brand,slug"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,Walnut Cutting Board,Acme,Kitchenware,54.00,1,Kitchen,Acme Woodworks,walnut-cutting-board"
        );
        // Unmapped values stay blank; the row is kept
        assert_eq!(
            lines.next().unwrap(),
            "2,Mystery Item,Unknown Vendor,Oddities,9.99,,,,mystery-item"
        );
    }

    #[test]
    fn test_enrich_rejects_missing_column() {
        let input = "id,name,price\n1,Board,5.00\n";
        let result = enrich(input.as_bytes(), Vec::new());
        assert!(matches!(result, Err(EnrichError::MissingColumn("vendor")) | Err(EnrichError::MissingColumn("category"))));
    }
}
