use sea_orm::sea_query::Index;
use sea_orm::*;
use tracing::info;

use crate::config::BootstrapUser;
use crate::entity::{review, user};
use crate::error::AppError;
use crate::models::auth::{RegisterRequest, validate_register_request};
use crate::utils::hash;

/// Create the configured bootstrap account unless a user with that name exists.
///
/// The account goes through the same checks as `POST /register`; an invalid
/// one fails startup.
pub async fn seed_bootstrap_user(
    db: &DatabaseConnection,
    bootstrap: Option<&BootstrapUser>,
) -> Result<(), DbErr> {
    let Some(account) = bootstrap else {
        return Ok(());
    };

    let request = RegisterRequest {
        username: account.username.trim().to_string(),
        password: account.password.clone(),
        email: account.email.trim().to_string(),
    };
    match validate_register_request(&request) {
        Ok(()) => {}
        Err(AppError::Validation(msg)) => {
            return Err(DbErr::Custom(format!("Invalid seed.admin account: {msg}")));
        }
        Err(e) => return Err(DbErr::Custom(format!("Invalid seed.admin account: {e:?}"))),
    }

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password = hash::hash_password(&request.password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    let model = user::ActiveModel {
        username: Set(request.username),
        password: Set(password),
        email: Set(request.email),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(created) => {
            info!(user_id = created.id, username = %created.username, "Seeded bootstrap user");
            Ok(())
        }
        // Another instance seeded it first.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Ensure the review lookup indexes exist.
///
/// Reviews are filtered by target and author, and grouped by target for stats;
/// schema-sync only creates single-column unique indexes, so these are added here.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes = [
        ("idx_review_coffee", review::Column::CoffeeId),
        ("idx_review_roastery", review::Column::RoasteryId),
        ("idx_review_shop", review::Column::CoffeeShopId),
        ("idx_review_user", review::Column::UserId),
    ];

    let backend = db.get_database_backend();
    for (name, column) in indexes {
        let stmt = Index::create()
            .if_not_exists()
            .name(name)
            .table(review::Entity)
            .col(column)
            .to_owned();

        match db.execute_raw(backend.build(&stmt)).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}
