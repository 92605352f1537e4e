use sea_orm::FromQueryResult;
use serde::Serialize;

/// Rating aggregate for one reviewed entity.
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetRating {
    /// Id of the coffee, roastery or shop.
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = 2)]
    pub review_count: i64,
    /// Arithmetic mean over live reviews.
    #[schema(example = 4.5)]
    pub average_rating: f64,
}

/// Per-kind rating aggregates. Entities without reviews are absent.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RatingStats {
    pub coffees: Vec<TargetRating>,
    pub roasteries: Vec<TargetRating>,
    pub shops: Vec<TargetRating>,
}

/// Point-in-time counts and rating aggregates across all stores.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StatsResponse {
    #[schema(example = 12)]
    pub users: u64,
    #[schema(example = 4)]
    pub roasteries: u64,
    #[schema(example = 9)]
    pub coffees: u64,
    #[schema(example = 3)]
    pub shops: u64,
    #[schema(example = 20)]
    pub reviews: u64,
    pub ratings: RatingStats,
}
