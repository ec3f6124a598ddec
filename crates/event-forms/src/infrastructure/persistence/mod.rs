//! In-memory store implementation

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::aggregates::{fixed_fields, FormDefinition, SubmissionRecord};
use crate::domain::services::{revalidate, NormalizedPayload};
use crate::ports::{FormStore, StoreError};

/// Process-local form and response store.
///
/// Responses live in their own map keyed by form id so that deleting a form
/// can drop them in one step.
#[derive(Default)]
pub struct InMemoryFormStore {
    forms: RwLock<HashMap<String, FormDefinition>>,
    responses: RwLock<HashMap<String, Vec<SubmissionRecord>>>,
}

impl InMemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut forms: Vec<FormDefinition>) -> Vec<FormDefinition> {
    forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
    forms
}

#[async_trait]
impl FormStore for InMemoryFormStore {
    async fn save_form(&self, mut form: FormDefinition) -> Result<FormDefinition, StoreError> {
        form.fixed_fields = fixed_fields();
        form.check_schema()?;

        let now = Utc::now();
        let mut forms = self.forms.write();
        form.created_at = forms.get(&form.id).map(|existing| existing.created_at).unwrap_or(now);
        form.updated_at = now;
        forms.insert(form.id.clone(), form.clone());
        tracing::debug!(form_id = %form.id, admin_id = %form.admin_id, "form saved");
        Ok(form)
    }

    async fn get_form(&self, id: &str) -> Result<FormDefinition, StoreError> {
        self.forms
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete_form(&self, id: &str) -> Result<(), StoreError> {
        // Lock order is forms, then responses (same as `submit`).
        let mut forms = self.forms.write();
        let removed = forms.remove(id);
        let dropped = self.responses.write().remove(id).map(|r| r.len()).unwrap_or(0);
        drop(forms);
        match removed {
            Some(_) => {
                tracing::debug!(form_id = %id, responses = dropped, "form deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn list_forms(&self) -> Result<Vec<FormDefinition>, StoreError> {
        Ok(newest_first(self.forms.read().values().cloned().collect()))
    }

    async fn forms_for_admin(&self, admin_id: &str) -> Result<Vec<FormDefinition>, StoreError> {
        let forms = self
            .forms
            .read()
            .values()
            .filter(|f| f.admin_id == admin_id)
            .cloned()
            .collect();
        Ok(newest_first(forms))
    }

    async fn submit(&self, form_id: &str, payload: NormalizedPayload) -> Result<SubmissionRecord, StoreError> {
        let form = self.get_form(form_id).await?;
        let payload = revalidate(&form, &payload).map_err(StoreError::Rejected)?;
        let record = SubmissionRecord::create(form_id, payload);

        // The form may have been deleted since it was read.
        let forms = self.forms.read();
        if !forms.contains_key(form_id) {
            return Err(StoreError::NotFound(form_id.to_string()));
        }
        self.responses
            .write()
            .entry(form_id.to_string())
            .or_default()
            .push(record.clone());
        drop(forms);
        tracing::debug!(form_id = %form_id, submission_id = %record.id, "response stored");
        Ok(record)
    }

    async fn responses(&self, form_id: &str) -> Result<Vec<SubmissionRecord>, StoreError> {
        let mut rows = self.responses.read().get(form_id).cloned().unwrap_or_default();
        rows.reverse();
        Ok(rows)
    }
}
