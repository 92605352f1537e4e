use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coffee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    /// Checked against the roastery table on write; not a database foreign key,
    /// so deleting the roastery leaves this value in place.
    pub roastery_id: i32,
    pub country: String,
    pub region: String,
    pub farm: String,
    pub variety: String,
    pub process: String,
    pub roast_profile: String,
    /// Ordered list of tags stored as a JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub flavour_notes: serde_json::Value,
    pub description: String,
    pub image_url: String,
}

impl ActiveModelBehavior for ActiveModel {}
