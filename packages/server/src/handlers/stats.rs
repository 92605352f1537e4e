use axum::{Json, extract::State};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{coffee, review, roastery, shop, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::stats::{RatingStats, StatsResponse, TargetRating};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/stats",
    tag = "Stats",
    operation_id = "getStats",
    summary = "Service statistics",
    description = "Counts every live user, roastery, coffee, shop and review, and aggregates review count and mean rating per reviewed entity. Entities without reviews are omitted from `ratings`.",
    responses(
        (status = 200, description = "Statistics snapshot", body = StatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let txn = state.db.begin().await?;

    let stats = StatsResponse {
        users: user::Entity::find().count(&txn).await?,
        roasteries: roastery::Entity::find().count(&txn).await?,
        coffees: coffee::Entity::find().count(&txn).await?,
        shops: shop::Entity::find().count(&txn).await?,
        reviews: review::Entity::find().count(&txn).await?,
        ratings: RatingStats {
            coffees: ratings_by(&txn, review::Column::CoffeeId).await?,
            roasteries: ratings_by(&txn, review::Column::RoasteryId).await?,
            shops: ratings_by(&txn, review::Column::CoffeeShopId).await?,
        },
    };

    txn.commit().await?;

    Ok(Json(stats))
}

/// Group reviews by one target column and compute count and mean rating per target.
async fn ratings_by<C: ConnectionTrait>(
    db: &C,
    target: review::Column,
) -> Result<Vec<TargetRating>, DbErr> {
    review::Entity::find()
        .select_only()
        .column_as(target, "id")
        .column_as(Expr::cust("COUNT(*)"), "review_count")
        .column_as(
            Expr::cust("AVG(CAST(rating AS DOUBLE PRECISION))"),
            "average_rating",
        )
        .filter(target.is_not_null())
        .group_by(target)
        .order_by_asc(target)
        .into_model::<TargetRating>()
        .all(db)
        .await
}
