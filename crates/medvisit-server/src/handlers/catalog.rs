//! Catalog handlers for doctors, medications, and medical centers.
//!
//! Creates and updates are admin-only; deletes also admit the record's
//! creator; reads are scoped by the caller's assignment sets.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use medvisit_auth::{
    AuthError, CenterUpdate, DoctorUpdate, Identity, MedicationUpdate, NewCenter, NewDoctor,
    NewMedication,
};
use medvisit_core::{Doctor, MedicalCenter, Medication};

use crate::state::AppState;

// =============================================================================
// Doctors
// =============================================================================

pub async fn list_doctors(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Doctor>>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    Ok(Json(state.filter.list_doctors(&role).await?))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Doctor>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let doctor = state
        .filter
        .get_doctor(&role, &id)
        .await?
        .ok_or_else(|| AuthError::not_found("doctor", &id))?;
    Ok(Json(doctor))
}

pub async fn create_doctor(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<NewDoctor>,
) -> Result<(StatusCode, Json<Doctor>), AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let doctor = state
        .engine
        .create_doctor(&role, &identity.external_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn update_doctor(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(update): Json<DoctorUpdate>,
) -> Result<Json<Doctor>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let doctor = state
        .engine
        .update_doctor(&role, &identity.external_id, &id, update)
        .await?;
    Ok(Json(doctor))
}

pub async fn delete_doctor(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    state
        .engine
        .delete_doctor(&role, &identity.external_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Medications
// =============================================================================

pub async fn list_medications(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Medication>>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    Ok(Json(state.filter.list_medications(&role).await?))
}

pub async fn get_medication(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Medication>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let medication = state
        .filter
        .get_medication(&role, &id)
        .await?
        .ok_or_else(|| AuthError::not_found("medication", &id))?;
    Ok(Json(medication))
}

pub async fn create_medication(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<NewMedication>,
) -> Result<(StatusCode, Json<Medication>), AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let medication = state
        .engine
        .create_medication(&role, &identity.external_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(medication)))
}

pub async fn update_medication(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(update): Json<MedicationUpdate>,
) -> Result<Json<Medication>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let medication = state
        .engine
        .update_medication(&role, &identity.external_id, &id, update)
        .await?;
    Ok(Json(medication))
}

pub async fn delete_medication(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    state
        .engine
        .delete_medication(&role, &identity.external_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Medical centers
// =============================================================================

pub async fn list_centers(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<MedicalCenter>>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    Ok(Json(state.filter.list_centers(&role).await?))
}

pub async fn get_center(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<MedicalCenter>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let center = state
        .filter
        .get_center(&role, &id)
        .await?
        .ok_or_else(|| AuthError::not_found("medical_center", &id))?;
    Ok(Json(center))
}

pub async fn create_center(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<NewCenter>,
) -> Result<(StatusCode, Json<MedicalCenter>), AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let center = state
        .engine
        .create_center(&role, &identity.external_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(center)))
}

pub async fn update_center(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(update): Json<CenterUpdate>,
) -> Result<Json<MedicalCenter>, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    let center = state
        .engine
        .update_center(&role, &identity.external_id, &id, update)
        .await?;
    Ok(Json(center))
}

pub async fn delete_center(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AuthError> {
    let role = state.reconciler.effective_role(&identity).await?;
    state
        .engine
        .delete_center(&role, &identity.external_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
