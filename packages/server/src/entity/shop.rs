use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A coffee shop. Same shape as a roastery, separate id space.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub website: String,
    pub description: String,
    pub image_url: String,
}

impl ActiveModelBehavior for ActiveModel {}
