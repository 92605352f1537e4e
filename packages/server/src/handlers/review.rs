use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{LockType, Query as SeaQuery, SelectStatement};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{coffee, review, roastery, shop};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::input::{AppJson, AppPath, AppQuery};
use crate::models::review::*;
use crate::state::AppState;

use super::coffee::find_coffee_for_share;
use super::roastery::find_roastery_for_share;
use super::shop::find_shop_for_share;
use super::{contains_ci, qualified, tags_text};

#[utoipa::path(
    post,
    path = "/reviews",
    tag = "Reviews",
    operation_id = "createReview",
    summary = "Review a coffee, roastery or shop",
    description = "Creates a review authored by the caller. Exactly one of `coffeeId`, `roasteryId` or `coffeeShopId` must be set and must reference an existing entity.",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Review target not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let target = validate_create_review(&payload)?;
    tracing::debug!(?target, "creating review");

    let txn = state.db.begin().await?;

    // The target row stays locked until commit, so it cannot vanish in between.
    match target {
        ReviewTarget::Coffee(id) => {
            find_coffee_for_share(&txn, id).await?;
        }
        ReviewTarget::Roastery(id) => {
            find_roastery_for_share(&txn, id).await?;
        }
        ReviewTarget::Shop(id) => {
            find_shop_for_share(&txn, id).await?;
        }
    }

    let (coffee_id, roastery_id, coffee_shop_id) = target.into_columns();
    let model = review::ActiveModel {
        user_id: Set(auth_user.user_id),
        coffee_id: Set(coffee_id),
        roastery_id: Set(roastery_id),
        coffee_shop_id: Set(coffee_shop_id),
        rating: Set(payload.rating),
        review: Set(payload.review),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "Reviews",
    operation_id = "listReviews",
    summary = "List reviews",
    description = "Returns reviews in insertion order. All supplied filters apply together. `minRating`, `maxRating`, `fromDate` and `toDate` are inclusive; dates are UTC days. Filters on coffee, roastery or shop attributes match case-insensitive substrings of the reviewed entity and exclude reviews of other kinds.",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "List of reviews", body = Vec<ReviewResponse>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_reviews(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ReviewListQuery>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let mut select = review::Entity::find();

    if let Some(id) = query.coffee_id {
        select = select.filter(review::Column::CoffeeId.eq(id));
    }
    if let Some(id) = query.roastery_id {
        select = select.filter(review::Column::RoasteryId.eq(id));
    }
    if let Some(id) = query.coffee_shop_id {
        select = select.filter(review::Column::CoffeeShopId.eq(id));
    }
    if let Some(id) = query.user_id {
        select = select.filter(review::Column::UserId.eq(id));
    }
    if let Some(min) = query.min_rating {
        select = select.filter(review::Column::Rating.gte(min));
    }
    if let Some(max) = query.max_rating {
        select = select.filter(review::Column::Rating.lte(max));
    }
    if let Some(from) = query.created_from() {
        select = select.filter(review::Column::CreatedAt.gte(from));
    }
    if let Some(before) = query.created_before() {
        select = select.filter(review::Column::CreatedAt.lt(before));
    }

    let coffee_conds = [
        contains_ci(qualified(coffee::Column::Country), query.coffee_country.as_deref()),
        contains_ci(qualified(coffee::Column::Process), query.coffee_process.as_deref()),
        contains_ci(
            qualified(coffee::Column::RoastProfile),
            query.coffee_roast_profile.as_deref(),
        ),
        contains_ci(
            tags_text(coffee::Column::FlavourNotes),
            query.coffee_flavour.as_deref(),
        ),
    ];
    if let Some(ids) = matching_ids(coffee::Entity, coffee::Column::Id, coffee_conds) {
        select = select.filter(review::Column::CoffeeId.in_subquery(ids));
    }

    let roastery_conds = [
        contains_ci(qualified(roastery::Column::Country), query.roastery_country.as_deref()),
        contains_ci(qualified(roastery::Column::City), query.roastery_city.as_deref()),
    ];
    if let Some(ids) = matching_ids(roastery::Entity, roastery::Column::Id, roastery_conds) {
        select = select.filter(review::Column::RoasteryId.in_subquery(ids));
    }

    let shop_conds = [
        contains_ci(qualified(shop::Column::Country), query.shop_country.as_deref()),
        contains_ci(qualified(shop::Column::City), query.shop_city.as_deref()),
    ];
    if let Some(ids) = matching_ids(shop::Entity, shop::Column::Id, shop_conds) {
        select = select.filter(review::Column::CoffeeShopId.in_subquery(ids));
    }

    let rows = select.order_by_asc(review::Column::Id).all(&state.db).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `SELECT id FROM <entity> WHERE <conds>`, or `None` when no condition is set.
fn matching_ids<E, C, const N: usize>(
    entity: E,
    id: C,
    conds: [Option<Expr>; N],
) -> Option<SelectStatement>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let conds: Vec<Expr> = conds.into_iter().flatten().collect();
    if conds.is_empty() {
        return None;
    }

    let mut sub = SeaQuery::select();
    sub.column(id).from(entity.table_ref());
    for cond in conds {
        sub.and_where(cond);
    }
    Some(sub.to_owned())
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "Reviews",
    operation_id = "getReview",
    summary = "Get a review by ID",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review details", body = ReviewResponse),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_review(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ReviewResponse>, AppError> {
    let model = review::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "Reviews",
    operation_id = "updateReview",
    summary = "Update a review",
    description = "Changes the rating and/or text of your own review. The target and author cannot be changed.",
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    validate_update_review(&payload)?;

    let txn = state.db.begin().await?;

    let existing = review::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(not_found)?;
    auth_user.require_owner(existing.user_id, "reviews")?;

    if payload == UpdateReviewRequest::default() {
        txn.commit().await?;
        return Ok(Json(existing.into()));
    }

    let mut active: review::ActiveModel = existing.into();
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(text) = payload.review {
        active.review = Set(text);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "Reviews",
    operation_id = "deleteReview",
    summary = "Delete a review",
    description = "Permanently deletes your own review. It no longer appears in listings or rating aggregates.",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, AppError> {
    let txn = state.db.begin().await?;

    let existing = review::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(not_found)?;
    auth_user.require_owner(existing.user_id, "reviews")?;

    review::Entity::delete_by_id(existing.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

fn not_found() -> AppError {
    AppError::NotFound("Review not found".into())
}
