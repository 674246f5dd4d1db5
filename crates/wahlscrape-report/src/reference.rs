//! Municipality reference table.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ReportError;

/// A row of `municipality_names_with_page.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceRow {
    #[serde(rename = "Name", alias = "municipality", alias = "name")]
    pub name: String,
    /// Listing page as written in the file; may not be a number.
    #[serde(rename = "Page", alias = "page", default)]
    pub page: String,
}

/// A reference row with its listing index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedMunicipality {
    pub number: i64,
    pub name: String,
}

pub fn load_reference(path: &Path) -> Result<Vec<ReferenceRow>, ReportError> {
    if !path.exists() {
        return Err(ReportError::ReferenceMissing(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ReportError::csv(path, e))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Skipping reference row: {}", e),
        }
    }
    info!("Loaded {} municipalities from {:?}", rows.len(), path);
    Ok(rows)
}

/// Number rows as `(page - 1) * page_size + position`, grouped by page.
///
/// Pages are visited in ascending order and rows keep file order within a
/// page; an unparsable page counts as page 0.
pub fn number_rows(rows: &[ReferenceRow], page_size: u32) -> Vec<NumberedMunicipality> {
    let mut by_page: BTreeMap<i64, Vec<&ReferenceRow>> = BTreeMap::new();
    for row in rows {
        let page = row.page.trim().parse::<i64>().unwrap_or(0);
        by_page.entry(page).or_default().push(row);
    }

    by_page
        .into_iter()
        .flat_map(|(page, group)| {
            group.into_iter().enumerate().map(move |(position, row)| NumberedMunicipality {
                number: (page - 1) * i64::from(page_size) + position as i64 + 1,
                name: row.name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(name: &str, page: &str) -> ReferenceRow {
        ReferenceRow {
            name: name.to_string(),
            page: page.to_string(),
        }
    }

    #[test]
    fn test_numbering_groups_by_page() {
        let rows = [
            row("Bebra", "2"),
            row("Aach", "1"),
            row("Cham", "2"),
            row("Aalen", "1"),
        ];

        let numbered = number_rows(&rows, 10);
        let pairs: Vec<(i64, &str)> = numbered.iter().map(|m| (m.number, m.name.as_str())).collect();
        assert_eq!(pairs, vec![(1, "Aach"), (2, "Aalen"), (11, "Bebra"), (12, "Cham")]);
    }

    #[test]
    fn test_unparsable_page_is_page_zero() {
        let numbered = number_rows(&[row("Nirgendwo", "?"), row("Aach", "1")], 10);
        assert_eq!(numbered[0].number, -9);
        assert_eq!(numbered[1].number, 1);
    }

    #[test]
    fn test_load_reference() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("municipality_names_with_page.csv");
        std::fs::write(&path, "Name,Page\nAach , 1\n\"Halle, Saale\",2\n").unwrap();

        let rows = load_reference(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Aach");
        assert_eq!(rows[0].page, "1");
        assert_eq!(rows[1].name, "Halle, Saale");
    }

    #[test]
    fn test_missing_reference() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_reference(&temp_dir.path().join("nope.csv"));
        assert!(matches!(result, Err(ReportError::ReferenceMissing(_))));
    }
}
