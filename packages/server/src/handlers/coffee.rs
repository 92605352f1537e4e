use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::coffee;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::input::{AppJson, AppPath, AppQuery};
use crate::models::coffee::*;
use crate::state::AppState;

use super::{contains_ci, filter_contains, tags_text};
use super::roastery::find_roastery_for_share;

#[utoipa::path(
    post,
    path = "/coffees",
    tag = "Coffees",
    operation_id = "createCoffee",
    summary = "Create a coffee",
    description = "Stores a new coffee. `roasteryId` must reference an existing roastery.",
    request_body = CreateCoffeeRequest,
    responses(
        (status = 200, description = "Coffee created", body = CoffeeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Roastery not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, roastery_id = payload.roastery_id))]
pub async fn create_coffee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCoffeeRequest>,
) -> Result<Json<CoffeeResponse>, AppError> {
    validate_create_coffee(&payload)?;

    let txn = state.db.begin().await?;
    find_roastery_for_share(&txn, payload.roastery_id).await?;

    let model = coffee::ActiveModel {
        name: Set(payload.name),
        roastery_id: Set(payload.roastery_id),
        country: Set(payload.country),
        region: Set(payload.region),
        farm: Set(payload.farm),
        variety: Set(payload.variety),
        process: Set(payload.process),
        roast_profile: Set(payload.roast_profile),
        flavour_notes: Set(notes_to_json(payload.flavour_notes)),
        description: Set(payload.description),
        image_url: Set(payload.image_url),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/coffees",
    tag = "Coffees",
    operation_id = "listCoffees",
    summary = "List coffees",
    description = "Returns all coffees in insertion order. `roasteryId` matches exactly; the text filters match case-insensitive substrings.",
    params(CoffeeListQuery),
    responses(
        (status = 200, description = "List of coffees", body = Vec<CoffeeResponse>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_coffees(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CoffeeListQuery>,
) -> Result<Json<Vec<CoffeeResponse>>, AppError> {
    let mut select = coffee::Entity::find();
    if let Some(roastery_id) = query.roastery_id {
        select = select.filter(coffee::Column::RoasteryId.eq(roastery_id));
    }
    select = filter_contains(select, coffee::Column::Name, query.name.as_deref());
    select = filter_contains(select, coffee::Column::Country, query.country.as_deref());
    select = filter_contains(select, coffee::Column::Region, query.region.as_deref());
    select = filter_contains(select, coffee::Column::Farm, query.farm.as_deref());
    select = filter_contains(select, coffee::Column::Variety, query.variety.as_deref());
    select = filter_contains(select, coffee::Column::Process, query.process.as_deref());
    select = filter_contains(
        select,
        coffee::Column::RoastProfile,
        query.roast_profile.as_deref(),
    );
    if let Some(cond) = contains_ci(
        tags_text(coffee::Column::FlavourNotes),
        query.flavour.as_deref(),
    ) {
        select = select.filter(cond);
    }

    let rows = select.order_by_asc(coffee::Column::Id).all(&state.db).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/coffees/{id}",
    tag = "Coffees",
    operation_id = "getCoffee",
    summary = "Get a coffee by ID",
    params(("id" = i32, Path, description = "Coffee ID")),
    responses(
        (status = 200, description = "Coffee details", body = CoffeeResponse),
        (status = 404, description = "Coffee not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_coffee(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<CoffeeResponse>, AppError> {
    let model = coffee::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/coffees/{id}",
    tag = "Coffees",
    operation_id = "updateCoffee",
    summary = "Update a coffee",
    description = "Merges the supplied fields over the stored coffee. A new `roasteryId` must reference an existing roastery; `flavourNotes` replaces the whole list.",
    params(("id" = i32, Path, description = "Coffee ID")),
    request_body = UpdateCoffeeRequest,
    responses(
        (status = 200, description = "Coffee updated", body = CoffeeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Coffee or roastery not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_coffee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateCoffeeRequest>,
) -> Result<Json<CoffeeResponse>, AppError> {
    validate_update_coffee(&payload)?;

    let txn = state.db.begin().await?;

    let existing = coffee::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(not_found)?;

    if payload == UpdateCoffeeRequest::default() {
        txn.commit().await?;
        return Ok(Json(existing.into()));
    }

    if let Some(roastery_id) = payload.roastery_id
        && roastery_id != existing.roastery_id
    {
        find_roastery_for_share(&txn, roastery_id).await?;
    }

    let mut active: coffee::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(roastery_id) = payload.roastery_id {
        active.roastery_id = Set(roastery_id);
    }
    if let Some(country) = payload.country {
        active.country = Set(country);
    }
    if let Some(region) = payload.region {
        active.region = Set(region);
    }
    if let Some(farm) = payload.farm {
        active.farm = Set(farm);
    }
    if let Some(variety) = payload.variety {
        active.variety = Set(variety);
    }
    if let Some(process) = payload.process {
        active.process = Set(process);
    }
    if let Some(roast_profile) = payload.roast_profile {
        active.roast_profile = Set(roast_profile);
    }
    if let Some(notes) = payload.flavour_notes {
        active.flavour_notes = Set(notes_to_json(notes));
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
    path = "/coffees/{id}",
    tag = "Coffees",
    operation_id = "deleteCoffee",
    summary = "Delete a coffee",
    description = "Permanently deletes a coffee. Reviews that reference it are left in place.",
    params(("id" = i32, Path, description = "Coffee ID")),
    responses(
        (status = 204, description = "Coffee deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Coffee not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_coffee(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    let result = coffee::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

fn not_found() -> AppError {
    AppError::NotFound("Coffee not found".into())
}

/// Fetch a coffee under a shared lock so it cannot be deleted before `txn` ends.
pub(crate) async fn find_coffee_for_share(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<coffee::Model, AppError> {
    coffee::Entity::find_by_id(id)
        .lock(LockType::Share)
        .one(txn)
        .await?
        .ok_or_else(not_found)
}
