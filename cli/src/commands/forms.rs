//! Forms commands

use anyhow::{Context, Result};
use event_forms::{FieldDefinition, FormDefinition, FormInput, SchemaError};
use serde::Deserialize;
use tabled::Tabled;

use super::{ApiClient, StatusResponse};
use crate::config::Session;
use crate::output::{self, OutputFormat};
use crate::{FieldArgs, FormCommands};

#[derive(Debug, Deserialize)]
struct SaveResponse {
    id: String,
    form: FormDefinition,
}

#[derive(Tabled)]
struct FormRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "Extra fields")]
    extra: usize,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&FormDefinition> for FormRow {
    fn from(form: &FormDefinition) -> Self {
        Self {
            id: form.id.clone(),
            title: form.display_title().to_string(),
            date: form.event_date.to_string(),
            admin: form.admin_id.clone(),
            extra: form.extra_fields.len(),
            updated: form.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Type")]
    field_type: String,
    #[tabled(rename = "Required")]
    required: &'static str,
}

fn field_rows(form: &FormDefinition) -> Vec<FieldRow> {
    let row = |index: String, f: &FieldDefinition| FieldRow {
        index,
        name: f.name.clone(),
        label: f.label.clone(),
        field_type: f.field_type.to_string(),
        required: if f.required { "yes" } else { "no" },
    };
    form.fixed_fields
        .iter()
        .map(|f| row("-".into(), f))
        .chain(form.extra_fields.iter().enumerate().map(|(i, f)| row(i.to_string(), f)))
        .collect()
}

impl From<FieldArgs> for FieldDefinition {
    fn from(args: FieldArgs) -> Self {
        FieldDefinition::new(args.name, args.label, args.field_type, !args.optional)
    }
}

/// Case-insensitive match on title, event name or ID. A blank term matches everything.
fn matches_search(form: &FormDefinition, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    [form.display_title(), form.event_name.as_str(), form.id.as_str()]
        .iter()
        .any(|text| text.to_lowercase().contains(&term))
}

/// Parse `name:label` into a required text field.
fn parse_field_spec(spec: &str) -> Result<FieldDefinition> {
    let (name, label) = spec
        .split_once(':')
        .with_context(|| format!("field `{}` must look like name:label", spec))?;
    Ok(FieldDefinition::required(name, label))
}

pub async fn handle(action: FormCommands, client: &ApiClient, session: &Session, format: OutputFormat) -> Result<()> {
    match action {
        FormCommands::List { mine, search } => {
            let path = if mine {
                format!("/admin/{}/forms", session.require_admin()?)
            } else {
                "/forms".to_string()
            };
            let mut forms: Vec<FormDefinition> = client.get_list(&path).await?;
            if let Some(term) = search {
                forms.retain(|f| matches_search(f, &term));
            }
            format.print(&forms, || forms.iter().map(FormRow::from).collect::<Vec<_>>());
        }
        FormCommands::Get { id } => {
            let form: FormDefinition = client.get(&format!("/forms/{}", id)).await?;
            if matches!(format, OutputFormat::Table) {
                println!("{} ({}, {})", form.display_title(), form.event_name, form.event_date);
            }
            format.print(&form, || field_rows(&form));
        }
        FormCommands::Create { event_name, event_date, id, title, fields } => {
            let admin_id = session.require_admin()?;
            let input = FormInput {
                id,
                admin_id: Some(admin_id.to_string()),
                title,
                extra_fields: fields.iter().map(|f| parse_field_spec(f)).collect::<Result<_>>()?,
                event_name,
                event_date: Some(event_date),
                ..FormInput::default()
            };
            // Same checks the server runs, so mistakes show before the request.
            FormDefinition::create(input.clone(), chrono::Utc::now())?;
            let saved: SaveResponse = client.post(&format!("/admin/{}/forms", admin_id), &input).await?;
            output::success(format!("Form saved: {}", saved.id));
        }
        FormCommands::Delete { id } => {
            session.require_admin()?;
            let _: StatusResponse = client.delete(&format!("/forms/{}", id)).await?;
            output::success(format!("Deleted form {} and its responses", id));
        }
        FormCommands::AddField { form_id, field } => {
            let form = edit(client, session, &form_id, |form| form.add_extra_field(field.into())).await?;
            output::success(format!("{} now has {} extra field(s)", form.id, form.extra_fields.len()));
        }
        FormCommands::UpdateField { form_id, index, field } => {
            edit(client, session, &form_id, |form| form.update_extra_field(index, field.into())).await?;
            output::success(format!("Updated field {} of {}", index, form_id));
        }
        FormCommands::RemoveField { form_id, index } => {
            edit(client, session, &form_id, |form| form.remove_extra_field(index).map(|_| ())).await?;
            output::success(format!("Removed field {} of {}", index, form_id));
        }
    }
    Ok(())
}

/// Fetch a form, apply a schema edit locally, and save it back.
async fn edit<F>(client: &ApiClient, session: &Session, form_id: &str, apply: F) -> Result<FormDefinition>
where
    F: FnOnce(&mut FormDefinition) -> Result<(), SchemaError>,
{
    session.require_admin()?;
    let mut form: FormDefinition = client.get(&format!("/forms/{}", form_id)).await?;
    apply(&mut form)?;
    let saved: SaveResponse = client
        .post(&format!("/forms/{}", form_id), &FormInput::from(&form))
        .await?;
    Ok(saved.form)
}
