use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::{validate_rating, validate_required, validate_required_if_present};

/// The single entity a review rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewTarget {
    Coffee(i32),
    Roastery(i32),
    Shop(i32),
}

impl ReviewTarget {
    /// Build a target from the three optional foreign keys of a payload.
    /// Exactly one must be set.
    pub fn from_parts(
        coffee_id: Option<i32>,
        roastery_id: Option<i32>,
        coffee_shop_id: Option<i32>,
    ) -> Result<Self, AppError> {
        match (coffee_id, roastery_id, coffee_shop_id) {
            (Some(id), None, None) => Ok(Self::Coffee(id)),
            (None, Some(id), None) => Ok(Self::Roastery(id)),
            (None, None, Some(id)) => Ok(Self::Shop(id)),
            _ => Err(AppError::Validation(
                "Review must target exactly one of: coffeeId, roasteryId, coffeeShopId".into(),
            )),
        }
    }

    /// Split back into `(coffee_id, roastery_id, coffee_shop_id)` columns.
    pub fn into_columns(self) -> (Option<i32>, Option<i32>, Option<i32>) {
        match self {
            Self::Coffee(id) => (Some(id), None, None),
            Self::Roastery(id) => (None, Some(id), None),
            Self::Shop(id) => (None, None, Some(id)),
        }
    }
}

/// Request body for creating a review. The author is the authenticated caller.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    /// Integer 1-5.
    #[schema(example = 4)]
    pub rating: i32,
    #[schema(example = "Bright acidity, long finish.")]
    pub review: String,
    pub coffee_id: Option<i32>,
    pub roastery_id: Option<i32>,
    pub coffee_shop_id: Option<i32>,
}

/// Validate a create payload and resolve its target.
pub fn validate_create_review(payload: &CreateReviewRequest) -> Result<ReviewTarget, AppError> {
    validate_rating(payload.rating)?;
    validate_required("review", &payload.review)?;
    ReviewTarget::from_parts(
        payload.coffee_id,
        payload.roastery_id,
        payload.coffee_shop_id,
    )
}

/// Request body for updating a review. Target and author cannot change.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateReviewRequest {
    #[schema(example = 5)]
    pub rating: Option<i32>,
    pub review: Option<String>,
}

pub fn validate_update_review(payload: &UpdateReviewRequest) -> Result<(), AppError> {
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }
    validate_required_if_present("review", payload.review.as_deref())?;
    Ok(())
}

/// Query parameters for review listing. All supplied filters must match.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReviewListQuery {
    /// Reviews of this coffee.
    pub coffee_id: Option<i32>,
    /// Reviews of this roastery.
    pub roastery_id: Option<i32>,
    /// Reviews of this shop.
    pub coffee_shop_id: Option<i32>,
    /// Reviews written by this user.
    pub user_id: Option<i32>,
    /// Inclusive lower rating bound.
    pub min_rating: Option<i32>,
    /// Inclusive upper rating bound.
    pub max_rating: Option<i32>,
    /// Created on or after this UTC day, `YYYY-MM-DD`.
    #[param(example = "2024-03-01")]
    pub from_date: Option<NaiveDate>,
    /// Created on or before this UTC day, `YYYY-MM-DD`.
    #[param(example = "2024-03-01")]
    pub to_date: Option<NaiveDate>,
    /// Country of the reviewed coffee. Case-insensitive substring, as are
    /// the other target filters; reviews of other kinds never match.
    pub coffee_country: Option<String>,
    pub coffee_process: Option<String>,
    pub coffee_roast_profile: Option<String>,
    /// Any flavour note of the reviewed coffee.
    pub coffee_flavour: Option<String>,
    pub roastery_country: Option<String>,
    pub roastery_city: Option<String>,
    pub shop_country: Option<String>,
    pub shop_city: Option<String>,
}

impl ReviewListQuery {
    /// Inclusive lower bound on the creation time.
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.from_date.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Exclusive upper bound: midnight after `to_date`.
    pub fn created_before(&self) -> Option<DateTime<Utc>> {
        self.to_date
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[schema(example = 1)]
    pub id: i32,
    /// Author.
    #[schema(example = 42)]
    pub user_id: i32,
    /// Exactly one of the three target ids is non-null.
    pub coffee_id: Option<i32>,
    pub roastery_id: Option<i32>,
    pub coffee_shop_id: Option<i32>,
    #[schema(example = 4)]
    pub rating: i32,
    pub review: String,
    pub date_of_creation: DateTime<Utc>,
}

impl From<crate::entity::review::Model> for ReviewResponse {
    fn from(m: crate::entity::review::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            coffee_id: m.coffee_id,
            roastery_id: m.roastery_id,
            coffee_shop_id: m.coffee_shop_id,
            rating: m.rating,
            review: m.review,
            date_of_creation: m.created_at,
        }
    }
}
