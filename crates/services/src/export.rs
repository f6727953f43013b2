//! Local CSV export of a finished session.

use std::path::{Path, PathBuf};

use survey_core::model::PersistedRow;

use crate::error::ExportError;

pub const EXPORT_COLUMNS: [&str; 6] = [
    "session_id",
    "starting_score",
    "exposure_index",
    "headline",
    "summary",
    "rating",
];

fn write_rows<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    rows: &[PersistedRow],
) -> Result<(), ExportError> {
    wtr.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        wtr.write_record([
            row.session_id.to_string(),
            row.starting_score.value().to_string(),
            row.exposure_index.to_string(),
            row.headline.clone(),
            row.summary.clone(),
            row.rating.value().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render rows as CSV text. The header is always present.
///
/// # Errors
///
/// Returns `ExportError` if the writer fails.
pub fn rows_to_csv(rows: &[PersistedRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    write_rows(&mut wtr, rows)?;
    let bytes = wtr
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}

/// `Pete Buttigieg` becomes `pete_buttigieg_session.csv`.
#[must_use]
pub fn export_file_name(topic: &str) -> String {
    let slug = topic
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        "survey_session.csv".to_string()
    } else {
        format!("{slug}_session.csv")
    }
}

/// Write the export file into `dir`, replacing any previous one.
///
/// # Errors
///
/// Returns `ExportError` if the directory or file cannot be written.
pub fn write_export(dir: &Path, topic: &str, rows: &[PersistedRow]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(topic));
    let mut wtr = csv::Writer::from_path(&path)?;
    write_rows(&mut wtr, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "session exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::model::{Exposure, Rating, SessionId, assemble_rows};

    fn sample_rows() -> Vec<PersistedRow> {
        let exposures = vec![
            Exposure::new("Plain headline", "Plain summary").unwrap(),
            Exposure::new("Headline, with comma", "Says \"hello\"").unwrap(),
        ];
        let ratings = vec![Rating::new(55.5).unwrap(), Rating::new(40.0).unwrap()];
        assemble_rows(
            SessionId::generate(),
            Rating::new(50.0).unwrap(),
            &exposures,
            &ratings,
        )
        .unwrap()
    }

    #[test]
    fn empty_export_still_has_header() {
        let csv = rows_to_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "session_id,starting_score,exposure_index,headline,summary,rating\n"
        );
    }

    #[test]
    fn rows_are_quoted_and_ordered() {
        let rows = sample_rows();
        let csv = rows_to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);

        let id = rows[0].session_id.to_string();
        assert_eq!(lines[1], format!("{id},50,0,Plain headline,Plain summary,55.5"));
        assert_eq!(
            lines[2],
            format!("{id},50,1,\"Headline, with comma\",\"Says \"\"hello\"\"\",40")
        );
    }

    #[test]
    fn file_name_is_slugged() {
        assert_eq!(export_file_name("Pete Buttigieg"), "pete_buttigieg_session.csv");
        assert_eq!(export_file_name("  AOC / Green-New Deal "), "aoc_green_new_deal_session.csv");
        assert_eq!(export_file_name("!!!"), "survey_session.csv");
    }

    #[test]
    fn writes_file_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports");
        let rows = sample_rows();

        let path = write_export(&nested, "Pete Buttigieg", &rows).unwrap();
        assert_eq!(path, nested.join("pete_buttigieg_session.csv"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, rows_to_csv(&rows).unwrap());
    }
}
