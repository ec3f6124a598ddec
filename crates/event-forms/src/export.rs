//! CSV export of stored responses

use std::collections::BTreeSet;
use thiserror::Error;

use crate::domain::aggregates::{SubmissionRecord, CONNECTIONS_FIELD, METADATA_COLUMNS as LEADING_COLUMNS};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No responses available for this form yet.")]
    NoResponses,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Column order: submission metadata, the sorted union of answer keys, then
/// the connections list as a JSON array.
pub fn columns(rows: &[SubmissionRecord]) -> Vec<String> {
    let keys: BTreeSet<&str> = rows.iter().flat_map(|r| r.values.keys().map(String::as_str)).collect();
    LEADING_COLUMNS
        .iter()
        .copied()
        .chain(keys)
        .chain(std::iter::once(CONNECTIONS_FIELD))
        .map(String::from)
        .collect()
}

/// Render `rows` as CSV. Rows missing an answer key get an empty cell.
pub fn export_csv(rows: &[SubmissionRecord]) -> Result<Vec<u8>, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::NoResponses);
    }
    let header = columns(rows);
    let answer_columns = &header[LEADING_COLUMNS.len()..header.len() - 1];

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;
    for row in rows {
        let mut record = vec![
            row.submitted_at.to_rfc3339(),
            row.event_id.clone(),
            row.event_name.clone(),
            row.event_date.to_string(),
        ];
        record.extend(answer_columns.iter().map(|k| row.values.get(k).cloned().unwrap_or_default()));
        record.push(serde_json::to_string(&row.connections)?);
        writer.write_record(&record)?;
    }
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ConnectionRecord;
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn row(values: &[(&str, &str)], connections: Vec<ConnectionRecord>) -> SubmissionRecord {
        SubmissionRecord {
            id: Uuid::new_v4(),
            form_id: "EVT-1".into(),
            event_id: "EVT-1".into(),
            event_name: "MIXER".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            values: values.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<BTreeMap<_, _>>(),
            connections,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_export_is_an_error() {
        assert!(matches!(export_csv(&[]), Err(ExportError::NoResponses)));
    }

    #[test]
    fn test_header_is_union_of_keys() {
        let rows = [row(&[("orgName", "ACME")], vec![]), row(&[("role", "CEO")], vec![])];
        assert_eq!(
            columns(&rows),
            vec!["submittedAt", "eventId", "eventName", "eventDate", "orgName", "role", "connections"]
        );
    }

    #[test]
    fn test_commas_and_json_are_quoted() {
        let rows = [row(
            &[("orgName", "ACME, INC")],
            vec![ConnectionRecord::new("GLOBEX", "OTHER", "")],
        )];
        let text = String::from_utf8(export_csv(&rows).unwrap()).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[4], "ACME, INC");
        let connections: Vec<ConnectionRecord> = serde_json::from_str(&record[5]).unwrap();
        assert_eq!(connections[0].connection_org, "GLOBEX");
    }
}
