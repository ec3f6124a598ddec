//! Public submission

use anyhow::{bail, Context, Result};
use colored::Colorize;
use event_forms::{
    ConnectionField, ConnectionRecord, ConnectionType, FormDefinition, RawValues, SubmissionDraft, MAX_CONNECTIONS,
};
use serde::Deserialize;
use std::path::Path;

use super::{ApiClient, ApiFailure, StatusResponse};
use crate::output;
use crate::SubmitArgs;

/// Answers read from `--file`.
#[derive(Debug, Default, Deserialize)]
struct AnswerFile {
    #[serde(default)]
    values: RawValues,
    #[serde(default)]
    connections: Vec<ConnectionRecord>,
}

fn read_answers(path: &Path) -> Result<AnswerFile> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let answers = if yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(answers)
}

fn parse_assignment(arg: &str) -> Result<(String, String)> {
    let (name, value) = arg
        .split_once('=')
        .with_context(|| format!("`{}` must look like field=value", arg))?;
    Ok((name.trim().to_string(), value.to_string()))
}

/// Parse `organization|type[|other]`. A known type label is written in its canonical spelling.
fn parse_connection(arg: &str) -> ConnectionRecord {
    let mut parts = arg.splitn(3, '|');
    let org = parts.next().unwrap_or_default();
    let kind = parts.next().unwrap_or_default();
    let other = parts.next().unwrap_or_default();
    let kind = ConnectionType::from_label(kind)
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| kind.trim().to_string());
    ConnectionRecord::new(org.trim(), kind, other.trim())
}

fn build_draft(
    form: &FormDefinition,
    answers: AnswerFile,
    assignments: &[String],
    connections: &[String],
) -> Result<SubmissionDraft> {
    let mut draft = SubmissionDraft::for_form(form);

    let mut values: Vec<(String, String)> = answers.values.into_iter().collect();
    for arg in assignments {
        values.push(parse_assignment(arg)?);
    }
    for (name, value) in values {
        if form.field(&name).is_none() {
            eprintln!("{} `{}` is not a field of this form, ignored", "Warning:".yellow(), name);
        }
        draft.set_value(name, value);
    }

    let records = answers.connections.into_iter().chain(connections.iter().map(|c| parse_connection(c)));
    for record in records {
        let Some(index) = draft.add_connection() else {
            bail!("You can record at most {} connections.", MAX_CONNECTIONS);
        };
        draft.set_connection_field(index, ConnectionField::Org, record.connection_org);
        draft.set_connection_field(index, ConnectionField::Type, record.connection_type);
        draft.set_connection_field(index, ConnectionField::OtherText, record.other_text);
    }
    Ok(draft)
}

pub async fn handle(args: SubmitArgs, client: &ApiClient) -> Result<()> {
    let form: FormDefinition = client.get(&format!("/forms/{}", args.form_id)).await?;
    let answers = match &args.file {
        Some(path) => read_answers(path)?,
        None => AnswerFile::default(),
    };
    let draft = build_draft(&form, answers, &args.values, &args.connections)?;

    let payload = match draft.validate(&form) {
        Ok(payload) => payload,
        Err(errors) => {
            output::field_errors(&errors);
            bail!("Submission not sent");
        }
    };

    let result: Result<StatusResponse> = client.post(&format!("/forms/{}/submit", form.id), &payload).await;
    let ack = match result {
        Ok(ack) => ack,
        Err(e) => {
            if let Some(fields) = e.downcast_ref::<ApiFailure>().and_then(|f| f.fields.as_ref()) {
                output::field_errors(fields);
            }
            return Err(e);
        }
    };
    output::success(format!(
        "Thank you! Your response to {} was recorded ({})",
        form.display_title(),
        ack.id.unwrap_or_default()
    ));
    Ok(())
}
