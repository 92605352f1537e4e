use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A rating attached to exactly one coffee, roastery or shop.
///
/// Exactly one of `coffee_id`, `roastery_id`, `coffee_shop_id` is non-NULL.
/// The target and author columns are plain values, not foreign keys: a review
/// outlives the entity it rates.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    pub coffee_id: Option<i32>,
    pub roastery_id: Option<i32>,
    pub coffee_shop_id: Option<i32>,

    /// 1-5 inclusive.
    pub rating: i32,
    pub review: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
