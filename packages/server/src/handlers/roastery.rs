use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::roastery;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::input::{AppJson, AppPath, AppQuery};
use crate::models::roastery::*;
use crate::state::AppState;

use super::filter_contains;

#[utoipa::path(
    post,
    path = "/roasteries",
    tag = "Roasteries",
    operation_id = "createRoastery",
    summary = "Create a roastery",
    description = "Stores a new roastery and returns it with its assigned ID. `name`, `country`, `city` and `address` are required.",
    request_body = CreateRoasteryRequest,
    responses(
        (status = 200, description = "Roastery created", body = RoasteryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, name = %payload.name))]
pub async fn create_roastery(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRoasteryRequest>,
) -> Result<Json<RoasteryResponse>, AppError> {
    validate_create_roastery(&payload)?;

    let model = roastery::ActiveModel {
        name: Set(payload.name),
        country: Set(payload.country),
        city: Set(payload.city),
        address: Set(payload.address),
        website: Set(payload.website),
        description: Set(payload.description),
        image_url: Set(payload.image_url),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/roasteries",
    tag = "Roasteries",
    operation_id = "listRoasteries",
    summary = "List roasteries",
    description = "Returns all roasteries in insertion order, optionally narrowed by case-insensitive `name`, `country` and `city` substrings.",
    params(RoasteryListQuery),
    responses(
        (status = 200, description = "List of roasteries", body = Vec<RoasteryResponse>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_roasteries(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RoasteryListQuery>,
) -> Result<Json<Vec<RoasteryResponse>>, AppError> {
    let mut select = roastery::Entity::find();
    select = filter_contains(select, roastery::Column::Name, query.name.as_deref());
    select = filter_contains(select, roastery::Column::Country, query.country.as_deref());
    select = filter_contains(select, roastery::Column::City, query.city.as_deref());

    let rows = select
        .order_by_asc(roastery::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/roasteries/{id}",
    tag = "Roasteries",
    operation_id = "getRoastery",
    summary = "Get a roastery by ID",
    params(("id" = i32, Path, description = "Roastery ID")),
    responses(
        (status = 200, description = "Roastery details", body = RoasteryResponse),
        (status = 404, description = "Roastery not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_roastery(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<RoasteryResponse>, AppError> {
    let model = find_roastery(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/roasteries/{id}",
    tag = "Roasteries",
    operation_id = "updateRoastery",
    summary = "Update a roastery",
    description = "Merges the supplied fields over the stored roastery. Omitted fields keep their current value; an empty payload returns the roastery unchanged.",
    params(("id" = i32, Path, description = "Roastery ID")),
    request_body = UpdateRoasteryRequest,
    responses(
        (status = 200, description = "Roastery updated", body = RoasteryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Roastery not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_roastery(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateRoasteryRequest>,
) -> Result<Json<RoasteryResponse>, AppError> {
    validate_update_roastery(&payload)?;

    if payload == UpdateRoasteryRequest::default() {
        let existing = find_roastery(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_roastery_for_update(&txn, id).await?;
    let mut active: roastery::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(country) = payload.country {
        active.country = Set(country);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(website) = payload.website {
        active.website = Set(website);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(image_url);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/roasteries/{id}",
    tag = "Roasteries",
    operation_id = "deleteRoastery",
    summary = "Delete a roastery",
    description = "Permanently deletes a roastery. Coffees and reviews that reference it are left in place.",
    params(("id" = i32, Path, description = "Roastery ID")),
    responses(
        (status = 204, description = "Roastery deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Roastery not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_roastery(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    let result = roastery::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Roastery not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn find_roastery<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<roastery::Model, AppError> {
    roastery::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Roastery not found".into()))
}

/// Fetch a roastery and hold a row lock on it until `txn` ends.
pub(crate) async fn find_roastery_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<roastery::Model, AppError> {
    roastery::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Roastery not found".into()))
}

/// Fetch a roastery under a shared lock so it cannot be deleted before `txn` ends.
pub(crate) async fn find_roastery_for_share(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<roastery::Model, AppError> {
    roastery::Entity::find_by_id(id)
        .lock(LockType::Share)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Roastery not found".into()))
}
