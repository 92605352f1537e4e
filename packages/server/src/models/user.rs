use serde::Serialize;

/// Public view of a user account.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice_wonder")]
    pub username: String,
    /// Only present when the caller is the user themselves.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
}

impl UserResponse {
    /// Build the view for `viewer_id`, hiding the email from everyone but its owner.
    pub fn for_viewer(user: crate::entity::user::Model, viewer_id: i32) -> Self {
        let email = (user.id == viewer_id).then_some(user.email);
        Self {
            id: user.id,
            username: user.username,
            email,
        }
    }
}
