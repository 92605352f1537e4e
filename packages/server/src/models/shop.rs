use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::{validate_required, validate_required_if_present};

/// Request body for creating a coffee shop.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShopRequest {
    #[schema(example = "Cafe Wawel")]
    pub name: String,
    #[schema(example = "Poland")]
    pub country: String,
    #[schema(example = "Katowice")]
    pub city: String,
    #[schema(example = "Wawelska 1")]
    pub address: String,
    #[serde(default)]
    #[schema(example = "https://cafe.example.com/")]
    pub website: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[schema(example = "https://example.com/shop.jpg")]
    pub image_url: String,
}

pub fn validate_create_shop(payload: &CreateShopRequest) -> Result<(), AppError> {
    validate_required("name", &payload.name)?;
    validate_required("country", &payload.country)?;
    validate_required("city", &payload.city)?;
    validate_required("address", &payload.address)?;
    Ok(())
}

/// Request body for updating a shop. Omitted fields keep their stored value.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub fn validate_update_shop(payload: &UpdateShopRequest) -> Result<(), AppError> {
    validate_required_if_present("name", payload.name.as_deref())?;
    validate_required_if_present("country", payload.country.as_deref())?;
    validate_required_if_present("city", payload.city.as_deref())?;
    validate_required_if_present("address", payload.address.as_deref())?;
    Ok(())
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShopListQuery {
    pub name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub name: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub website: String,
    pub description: String,
    pub image_url: String,
}

impl From<crate::entity::shop::Model> for ShopResponse {
    fn from(m: crate::entity::shop::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            country: m.country,
            city: m.city,
            address: m.address,
            website: m.website,
            description: m.description,
            image_url: m.image_url,
        }
    }
}
