use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::shop;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::input::{AppJson, AppPath, AppQuery};
use crate::models::shop::*;
use crate::state::AppState;

use super::filter_contains;

#[utoipa::path(
    post,
    path = "/shops",
    tag = "Shops",
    operation_id = "createShop",
    summary = "Create a coffee shop",
    description = "Stores a new coffee shop and returns it with its assigned ID. `name`, `country`, `city` and `address` are required.",
    request_body = CreateShopRequest,
    responses(
        (status = 200, description = "Shop created", body = ShopResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, name = %payload.name))]
pub async fn create_shop(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateShopRequest>,
) -> Result<Json<ShopResponse>, AppError> {
    validate_create_shop(&payload)?;

    let model = shop::ActiveModel {
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
    path = "/shops",
    tag = "Shops",
    operation_id = "listShops",
    summary = "List coffee shops",
    description = "Returns all coffee shops in insertion order, optionally narrowed by case-insensitive `name`, `country` and `city` substrings.",
    params(ShopListQuery),
    responses(
        (status = 200, description = "List of shops", body = Vec<ShopResponse>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_shops(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ShopListQuery>,
) -> Result<Json<Vec<ShopResponse>>, AppError> {
    let mut select = shop::Entity::find();
    select = filter_contains(select, shop::Column::Name, query.name.as_deref());
    select = filter_contains(select, shop::Column::Country, query.country.as_deref());
    select = filter_contains(select, shop::Column::City, query.city.as_deref());

    let rows = select
        .order_by_asc(shop::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/shops/{id}",
    tag = "Shops",
    operation_id = "getShop",
    summary = "Get a shop by ID",
    params(("id" = i32, Path, description = "Shop ID")),
    responses(
        (status = 200, description = "Shop details", body = ShopResponse),
        (status = 404, description = "Coffee shop not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_shop(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ShopResponse>, AppError> {
    let model = find_shop(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/shops/{id}",
    tag = "Shops",
    operation_id = "updateShop",
    summary = "Update a shop",
    description = "Merges the supplied fields over the stored shop. Omitted fields keep their current value; an empty payload returns the shop unchanged.",
    params(("id" = i32, Path, description = "Shop ID")),
    request_body = UpdateShopRequest,
    responses(
        (status = 200, description = "Shop updated", body = ShopResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Coffee shop not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_shop(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateShopRequest>,
) -> Result<Json<ShopResponse>, AppError> {
    validate_update_shop(&payload)?;

    if payload == UpdateShopRequest::default() {
        let existing = find_shop(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_shop_for_update(&txn, id).await?;
    let mut active: shop::ActiveModel = existing.into();

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
    path = "/shops/{id}",
    tag = "Shops",
    operation_id = "deleteShop",
    summary = "Delete a shop",
    description = "Permanently deletes a coffee shop. Reviews that reference it are left in place.",
    params(("id" = i32, Path, description = "Shop ID")),
    responses(
        (status = 204, description = "Shop deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Coffee shop not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_shop(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    let result = shop::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Coffee shop not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn find_shop<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<shop::Model, AppError> {
    shop::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Coffee shop not found".into()))
}

/// Fetch a shop and hold a row lock on it until `txn` ends.
pub(crate) async fn find_shop_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<shop::Model, AppError> {
    shop::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Coffee shop not found".into()))
}

/// Fetch a shop under a shared lock so it cannot be deleted before `txn` ends.
pub(crate) async fn find_shop_for_share(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<shop::Model, AppError> {
    shop::Entity::find_by_id(id)
        .lock(LockType::Share)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Coffee shop not found".into()))
}
