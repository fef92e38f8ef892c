//! The lab journal workbook.
//!
//! Rows come from the `Samples` sheet, or from the first sheet when the
//! workbook has none by that name. The first row is a header.

use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Reader};

use super::{Journal, JournalEntry, JournalSource};
use crate::error::{IndexError, Result};

pub const SAMPLES_SHEET: &str = "Samples";

#[derive(Debug, Clone)]
pub struct XlsxJournal {
    path: PathBuf,
}

impl XlsxJournal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn unavailable(&self, what: &str, error: impl std::fmt::Display) -> IndexError {
        IndexError::JournalUnavailable(format!("{what} {}: {error}", self.path.display()))
    }
}

impl JournalSource for XlsxJournal {
    fn load(&self) -> Result<Journal> {
        let mut workbook =
            open_workbook_auto(&self.path).map_err(|error| self.unavailable("failed to open", error))?;

        let sheet_names = workbook.sheet_names();
        let sheet = if sheet_names.iter().any(|name| name == SAMPLES_SHEET) {
            SAMPLES_SHEET.to_string()
        } else {
            sheet_names
                .first()
                .cloned()
                .ok_or_else(|| self.unavailable("no sheets in", "empty workbook"))?
        };
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|error| self.unavailable("failed to read", error))?;

        let mut entries = Vec::new();
        for row in range.rows().skip(1) {
            let mut cells: Vec<String> = row.iter().map(cell_text).collect();
            while cells.last().is_some_and(|cell| cell.is_empty()) {
                cells.pop();
            }
            if let Some(entry) = JournalEntry::from_cells(&cells) {
                entries.push(entry);
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            sheet = %sheet,
            rows = entries.len(),
            "loaded journal workbook"
        );
        Ok(Journal::from_entries(entries))
    }

    fn describe(&self) -> String {
        format!("xlsx journal {}", self.path.display())
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn sheet_xml(rows: &[&[&str]]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (row_index, row) in rows.iter().enumerate() {
            let row_number = row_index + 1;
            xml.push_str(&format!(r#"<row r="{row_number}">"#));
            for (column, value) in row.iter().enumerate() {
                let column = char::from(b'A' + column as u8);
                xml.push_str(&format!(
                    r#"<c r="{column}{row_number}" t="inlineStr"><is><t>{value}</t></is></c>"#
                ));
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }

    /// Writes a minimal xlsx package with one worksheet per `(name, rows)`.
    fn write_workbook(path: &Path, sheets: &[(&str, &[&[&str]])]) {
        let file = std::fs::File::create(path).expect("create workbook");
        let mut zip = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        let mut overrides = String::new();
        let mut sheet_entries = String::new();
        let mut relationships = String::new();
        for (index, (name, _)) in sheets.iter().enumerate() {
            let id = index + 1;
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{id}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
            sheet_entries.push_str(&format!(
                r#"<sheet name="{name}" sheetId="{id}" r:id="rId{id}"/>"#
            ));
            relationships.push_str(&format!(
                r#"<Relationship Id="rId{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{id}.xml"/>"#
            ));
        }

        let mut parts = vec![
            (
                "[Content_Types].xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
                ),
            ),
            (
                "_rels/.rels".to_string(),
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                    .to_string(),
            ),
            (
                "xl/workbook.xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheet_entries}</sheets></workbook>"#
                ),
            ),
            (
                "xl/_rels/workbook.xml.rels".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{relationships}</Relationships>"#
                ),
            ),
        ];
        for (index, (_, rows)) in sheets.iter().enumerate() {
            parts.push((format!("xl/worksheets/sheet{}.xml", index + 1), sheet_xml(rows)));
        }

        for (name, body) in parts {
            zip.start_file(name, options).expect("start part");
            zip.write_all(body.as_bytes()).expect("write part");
        }
        zip.finish().expect("finish workbook");
    }

    #[test]
    fn reads_samples_sheet_after_header() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("lab_journal.xlsx");
        let overview: &[&[&str]] = &[&["ignored", "sheet"], &["X_9", "Other"]];
        let samples: &[&[&str]] = &[
            &["Name", "Project", "Description", "Notes"],
            &["A_001", "Lipids", "first extract", "keep cold"],
            &["B_002", "Proteins"],
            &["C_003"],
        ];
        write_workbook(&path, &[("Overview", overview), ("Samples", samples)]);

        let journal = XlsxJournal::new(path).load().expect("load");
        assert_eq!(journal.len(), 2);
        assert_eq!(journal.lookup("A_001").description, "first extract");
        assert_eq!(journal.entry("A_001").expect("entry").notes, "keep cold");
        assert_eq!(journal.lookup("B_002").project, "Proteins");
        assert!(journal.entry("X_9").is_none());
        assert!(journal.entry("C_003").is_none());
    }

    #[test]
    fn falls_back_to_first_sheet() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("lab_journal.xlsx");
        let journal_rows: &[&[&str]] = &[&["Name", "Project"], &["D_004", "Glycans"]];
        let extra_rows: &[&[&str]] = &[&["Name", "Project"], &["E_005", "Other"]];
        write_workbook(&path, &[("Journal", journal_rows), ("Extra", extra_rows)]);

        let journal = XlsxJournal::new(path).load().expect("load");
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.lookup("D_004").project, "Glycans");
    }

    #[test]
    fn missing_workbook_is_journal_unavailable() {
        let dir = tempdir().expect("tempdir");
        let err = XlsxJournal::new(dir.path().join("absent.xlsx"))
            .load()
            .unwrap_err();
        assert!(matches!(err, IndexError::JournalUnavailable(_)));
    }
}
