//! Envelope CSV export.

use std::fmt::Write as _;
use std::path::Path;

use fp_core::{ElementId, LcId};
use fp_model::Element;

use crate::{ReportError, ReportResult};

/// One export row: element, its part, the extreme value, and the case that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeRow {
    pub element: ElementId,
    pub part: String,
    pub value: f64,
    pub source_case: LcId,
}

/// Zip an element selection with the two gathered envelope columns.
///
/// `sources` holds contributing-case IDs as the engine returns them: one
/// dense numeric array per component, so IDs arrive as floats and are
/// rounded back to integers here (exact for any realistic subcase range).
pub fn envelope_rows(
    elements: &[Element],
    values: &[f64],
    sources: &[f64],
) -> ReportResult<Vec<EnvelopeRow>> {
    if elements.len() != values.len() || elements.len() != sources.len() {
        return Err(ReportError::ColumnMismatch {
            what: "elements, values and sources must have equal lengths",
        });
    }
    Ok(elements
        .iter()
        .zip(values.iter().zip(sources))
        .map(|(element, (value, source))| EnvelopeRow {
            element: element.id,
            part: element.part.clone(),
            value: *value,
            source_case: LcId(source.round() as i64),
        })
        .collect())
}

/// Write the envelope table to `path`.
///
/// Header is `ID_E,PARTS_E,<value_column>,LoadCase`; one row per element in
/// input order; `\n` line termination. The full content is assembled before
/// the destination is touched, so an error never leaves a plausible-looking
/// partial file, and an existing file is replaced entirely.
pub fn export_envelope_csv(
    path: &Path,
    value_column: &str,
    rows: &[EnvelopeRow],
) -> ReportResult<()> {
    let mut content = String::new();
    let _ = writeln!(content, "ID_E,PARTS_E,{value_column},LoadCase");
    for row in rows {
        let _ = writeln!(
            content,
            "{},{},{},{}",
            row.element, row.part, row.value, row.source_case
        );
    }
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_core::SeqIx;

    fn element(id: u64, part: &str, seq: u32) -> Element {
        Element {
            id: ElementId(id),
            part: part.to_string(),
            kind: "CQUAD4".to_string(),
            seq: SeqIx::from_index(seq),
        }
    }

    #[test]
    fn rows_zip_positionally() {
        let elements = [element(101, "skin", 0), element(102, "rib", 1)];
        let rows = envelope_rows(&elements, &[1.5, -2.0], &[10.0, 20.0]).unwrap();
        assert_eq!(rows[0].element, ElementId(101));
        assert_eq!(rows[0].source_case, LcId(10));
        assert_eq!(rows[1].value, -2.0);
        assert_eq!(rows[1].source_case, LcId(20));
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let elements = [element(101, "skin", 0)];
        assert!(envelope_rows(&elements, &[1.0, 2.0], &[10.0]).is_err());
    }

    #[test]
    fn writes_header_plus_one_line_per_row() {
        let dir = std::env::temp_dir().join("fp_report_export_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("envelope.csv");

        let elements = [element(101, "skin", 0), element(102, "rib", 1)];
        let rows = envelope_rows(&elements, &[3.0, -1.0], &[-1.0, -2.0]).unwrap();
        export_envelope_csv(&path, "FX", &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1 + rows.len());
        assert_eq!(lines[0], "ID_E,PARTS_E,FX,LoadCase");
        assert_eq!(lines[1], "101,skin,3,-1");
        assert_eq!(lines[2], "102,rib,-1,-2");
        assert!(content.ends_with('\n'));
        assert!(!content.contains("\n\n"));
    }

    #[test]
    fn rewrites_existing_file_entirely() {
        let dir = std::env::temp_dir().join("fp_report_overwrite_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("envelope.csv");

        let elements = [
            element(1, "a", 0),
            element(2, "b", 1),
            element(3, "c", 2),
        ];
        let long = envelope_rows(&elements, &[1.0, 2.0, 3.0], &[10.0, 10.0, 10.0]).unwrap();
        export_envelope_csv(&path, "FX", &long).unwrap();

        let short = envelope_rows(&elements[..1], &[9.0], &[20.0]).unwrap();
        export_envelope_csv(&path, "FX", &short).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("1,a,9,20"));
        assert!(!content.contains("3,c"));
    }
}
