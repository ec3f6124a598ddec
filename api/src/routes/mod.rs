//! API Routes

pub mod health;
/// Form CRUD and submission
pub mod forms;
/// Response preview and export
pub mod responses;
/// Per-admin forms
pub mod admin;

#[cfg(test)]
pub(crate) mod test_support {
    use axum_test::TestServer;
    use event_forms::InMemoryFormStore;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::{build_router, ApiState, ServerConfig};

    pub fn server() -> TestServer {
        let state = ApiState::new(Arc::new(InMemoryFormStore::new()));
        TestServer::new(build_router(state, &ServerConfig::default())).unwrap()
    }

    pub fn form_body(id: &str, admin: &str) -> Value {
        json!({
            "id": id,
            "adminId": admin,
            "eventName": "Spring Mixer",
            "eventDate": "2026-04-02",
            "extraFields": [
                {"name": "role", "label": "Role", "type": "text", "required": true}
            ]
        })
    }

    pub fn payload(event_id: &str) -> Value {
        json!({
            "eventId": event_id,
            "eventName": "SPRING MIXER",
            "eventDate": "2026-04-02",
            "values": {
                "orgName": "ACME CORP",
                "sector": "TECHNOLOGY",
                "firstName": "ADA",
                "lastName": "LOVELACE",
                "email": "ADA@EXAMPLE.COM",
                "socialLink": "LINKEDIN.COM/IN/ADA",
                "phone": "+1 (555) 010-9999",
                "addressStreet": "1 MAIN ST",
                "addressCity": "LONDON",
                "addressState": "LDN",
                "addressCountry": "UK",
                "role": "SPEAKER"
            },
            "connections": [
                {"connectionOrg": "GLOBEX", "connectionType": "PARTNER", "otherText": ""}
            ]
        })
    }
}
