//! Contact form endpoint

use axum::extract::State;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{Envelope, ValidatedJson};
use crate::domain::{normalize_email, DomainError, NewContact, NewContactRequest};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub message: String,
}

/// Records a message, creating the sender's contact on first use
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<ContactForm>,
) -> Envelope {
    info!("Processing contact request");

    let contact_id = match find_or_create_contact(&state, &form).await {
        Ok(id) => id,
        Err(e) => return e.into(),
    };

    match state
        .persistence
        .create_contact_request(NewContactRequest::new(&contact_id, form.message))
        .await
    {
        Ok(request_id) => {
            info!(contact_id = %contact_id, request_id = %request_id, "Contact request stored");
            Envelope::created(request_id)
        }
        Err(e) => e.into(),
    }
}

async fn find_or_create_contact(state: &AppState, form: &ContactForm) -> Result<String, DomainError> {
    let email = normalize_email(&form.email);

    if let Some(contact) = state.persistence.get_contact(&email).await? {
        return Ok(contact.id);
    }

    match state
        .persistence
        .create_contact(NewContact::new(form.name.trim(), &email))
        .await
    {
        Ok(id) => Ok(id),
        Err(e) => {
            // A concurrent submission may have created the contact first
            warn!(error = %e, "Failed to create contact, retrying lookup");
            state
                .persistence
                .get_contact(&email)
                .await?
                .map(|contact| contact.id)
                .ok_or(e)
        }
    }
}
