use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

use super::dto::{
    ClearContactsResponse, CreateContactRequest, CreatedContactResponse, MessageResponse,
    UpdateContactRequest,
};
use super::repo::Contact;

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/clear-contacts", post(clear_contacts))
}

#[instrument(skip(state))]
pub async fn list_contacts(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = Contact::list_by_owner(&state.db, owner_id).await?;
    Ok(Json(contacts))
}

#[instrument(skip(state, payload))]
pub async fn create_contact(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Json(payload): Json<CreateContactRequest>,
) -> Result<Json<CreatedContactResponse>, ApiError> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    let phone = payload.phone.trim();

    if name.is_empty() || email.is_empty() || phone.is_empty() {
        return Err(ApiError::InvalidInput(
            "Name, Email, and Phone are required".into(),
        ));
    }

    let contact = Contact::create(
        &state.db,
        owner_id,
        name,
        email,
        phone,
        payload.address.trim(),
        payload.timezone.trim(),
    )
    .await?;

    info!(contact_id = %contact.id, "contact created");
    Ok(Json(CreatedContactResponse {
        message: "Contact added successfully.".into(),
        id: contact.id,
    }))
}

#[instrument(skip(state))]
pub async fn get_contact(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Contact>, ApiError> {
    Contact::get(&state.db, owner_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Contact not found.".into()))
}

#[instrument(skip(state, payload))]
pub async fn update_contact(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if provided_but_empty(&payload.name)
        || provided_but_empty(&payload.email)
        || provided_but_empty(&payload.phone)
    {
        return Err(ApiError::InvalidInput(
            "Name, Email, and Phone must not be empty".into(),
        ));
    }

    let updated = Contact::update(&state.db, owner_id, id, &payload).await?;
    if updated.is_none() {
        return Err(ApiError::NotFound("Contact not found.".into()));
    }

    info!(contact_id = %id, "contact updated");
    Ok(Json(MessageResponse {
        message: "Contact updated successfully.".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = Contact::delete(&state.db, owner_id, id).await?;
    if !removed {
        return Err(ApiError::NotFound("Contact not found.".into()));
    }

    info!(contact_id = %id, "contact deleted");
    Ok(Json(MessageResponse {
        message: "Contact deleted successfully.".into(),
    }))
}

#[instrument(skip(state))]
pub async fn clear_contacts(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
) -> Result<Json<ClearContactsResponse>, ApiError> {
    let removed = Contact::clear_all(&state.db, owner_id).await?;

    info!(removed, "contacts cleared");
    Ok(Json(ClearContactsResponse {
        message: "Contacts cleared.".into(),
        removed,
    }))
}

/// A field that is present in the body but blank after trimming. Absent
/// fields are fine (they keep the stored value).
fn provided_but_empty(field: &Option<String>) -> bool {
    matches!(field.as_deref().map(str::trim), Some(""))
}
