use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

use super::shared::{validate_required, validate_required_if_present};

/// Request body for creating a coffee.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoffeeRequest {
    #[schema(example = "Huila Supremo")]
    pub name: String,
    /// Must reference an existing roastery.
    #[schema(example = 1)]
    pub roastery_id: i32,
    #[schema(example = "Colombia")]
    pub country: String,
    #[serde(default)]
    #[schema(example = "Huila")]
    pub region: String,
    #[serde(default)]
    pub farm: String,
    #[serde(default)]
    #[schema(example = "Caturra")]
    pub variety: String,
    #[schema(example = "Washed")]
    pub process: String,
    #[schema(example = "Medium")]
    pub roast_profile: String,
    #[serde(default)]
    #[schema(example = json!(["citrus", "chocolate", "nuts"]))]
    pub flavour_notes: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

pub fn validate_create_coffee(payload: &CreateCoffeeRequest) -> Result<(), AppError> {
    validate_required("name", &payload.name)?;
    validate_required("country", &payload.country)?;
    validate_required("process", &payload.process)?;
    validate_required("roastProfile", &payload.roast_profile)?;
    validate_flavour_notes(&payload.flavour_notes)?;
    Ok(())
}

/// Request body for updating a coffee. Omitted fields keep their stored value.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoffeeRequest {
    pub name: Option<String>,
    /// If present, must reference an existing roastery.
    pub roastery_id: Option<i32>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub farm: Option<String>,
    pub variety: Option<String>,
    pub process: Option<String>,
    pub roast_profile: Option<String>,
    pub flavour_notes: Option<Vec<String>>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub fn validate_update_coffee(payload: &UpdateCoffeeRequest) -> Result<(), AppError> {
    validate_required_if_present("name", payload.name.as_deref())?;
    validate_required_if_present("country", payload.country.as_deref())?;
    validate_required_if_present("process", payload.process.as_deref())?;
    validate_required_if_present("roastProfile", payload.roast_profile.as_deref())?;
    if let Some(notes) = &payload.flavour_notes {
        validate_flavour_notes(notes)?;
    }
    Ok(())
}

fn validate_flavour_notes(notes: &[String]) -> Result<(), AppError> {
    if notes.iter().any(|n| n.trim().is_empty()) {
        return Err(AppError::Validation(
            "flavourNotes must not contain empty tags".into(),
        ));
    }
    Ok(())
}

/// Query parameters for coffee listing. Text filters are case-insensitive substrings.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CoffeeListQuery {
    pub name: Option<String>,
    /// Exact roastery match.
    pub roastery_id: Option<i32>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub farm: Option<String>,
    pub variety: Option<String>,
    pub process: Option<String>,
    pub roast_profile: Option<String>,
    /// Matches coffees with any flavour note containing this text.
    pub flavour: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub name: String,
    pub roastery_id: i32,
    pub country: String,
    pub region: String,
    pub farm: String,
    pub variety: String,
    pub process: String,
    pub roast_profile: String,
    pub flavour_notes: Vec<String>,
    pub description: String,
    pub image_url: String,
}

/// Column value for an ordered tag list.
pub fn notes_to_json(notes: Vec<String>) -> Value {
    Value::from(notes)
}

/// Read back a stored tag list; non-string entries are skipped.
pub fn notes_from_json(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

impl From<crate::entity::coffee::Model> for CoffeeResponse {
    fn from(m: crate::entity::coffee::Model) -> Self {
        let flavour_notes = notes_from_json(&m.flavour_notes);
        Self {
            id: m.id,
            name: m.name,
            roastery_id: m.roastery_id,
            country: m.country,
            region: m.region,
            farm: m.farm,
            variety: m.variety,
            process: m.process,
            roast_profile: m.roast_profile,
            flavour_notes,
            description: m.description,
            image_url: m.image_url,
        }
    }
}
