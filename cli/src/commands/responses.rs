//! Responses commands

use anyhow::Result;
use event_forms::SubmissionRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tabled::Tabled;

use super::ApiClient;
use crate::output::{self, OutputFormat};
use crate::ResponseCommands;

#[derive(Debug, Serialize, Deserialize)]
struct Rows {
    rows: Vec<SubmissionRecord>,
}

#[derive(Tabled)]
struct ResponseRow {
    #[tabled(rename = "Submitted")]
    submitted: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Organization")]
    org: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Connections")]
    connections: usize,
}

impl From<&SubmissionRecord> for ResponseRow {
    fn from(record: &SubmissionRecord) -> Self {
        let value = |name: &str| record.values.get(name).cloned().unwrap_or_default();
        Self {
            submitted: record.submitted_at.format("%Y-%m-%d %H:%M").to_string(),
            name: format!("{} {}", value("firstName"), value("lastName")).trim().to_string(),
            org: value("orgName"),
            email: value("email"),
            connections: record.connections.iter().filter(|c| !c.is_blank()).count(),
        }
    }
}

fn default_export_path(form_id: &str) -> PathBuf {
    PathBuf::from(format!("{}_responses.csv", form_id))
}

pub async fn handle(action: ResponseCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match action {
        ResponseCommands::List { form_id } => {
            let rows: Rows = client.get(&format!("/forms/{}/responses", form_id)).await?;
            format.print(&rows.rows, || rows.rows.iter().map(ResponseRow::from).collect::<Vec<_>>());
        }
        ResponseCommands::Export { form_id, output: destination } => {
            let csv = client.get_bytes(&format!("/forms/{}/export", form_id)).await?;
            let path = destination.unwrap_or_else(|| default_export_path(&form_id));
            std::fs::write(&path, &csv)?;
            output::success(format!("Saved {} bytes to {}", csv.len(), path.display()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use event_forms::{ConnectionRecord, NormalizedPayload};

    #[test]
    fn test_row_summary() {
        let payload = NormalizedPayload {
            event_id: "EVT-1".into(),
            event_name: "MIXER".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            values: [("firstName", "ADA"), ("lastName", "LOVELACE"), ("orgName", "ACME")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            connections: vec![ConnectionRecord::new("GLOBEX", "OTHER", ""), ConnectionRecord::default()],
        };
        let record = SubmissionRecord::create("EVT-1", payload);
        let row = ResponseRow::from(&record);
        assert_eq!(row.name, "ADA LOVELACE");
        assert_eq!(row.org, "ACME");
        assert_eq!(row.email, "");
        assert_eq!(row.connections, 1);
        assert_eq!(row.submitted.len(), "2026-04-02 10:00".len());
    }

    #[test]
    fn test_default_export_name() {
        assert_eq!(default_export_path("EVT-1"), PathBuf::from("EVT-1_responses.csv"));
    }
}
