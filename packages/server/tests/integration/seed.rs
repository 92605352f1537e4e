use coffee_server::config::BootstrapUser;
use coffee_server::entity::user;
use coffee_server::seed::seed_bootstrap_user;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tempfile::TempDir;

async fn open_db() -> (TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("seed.db").display());
    let db = coffee_server::database::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");
    (dir, db)
}

fn account(username: &str, email: &str) -> BootstrapUser {
    BootstrapUser {
        username: username.into(),
        password: "barista-pass".into(),
        email: email.into(),
    }
}

#[tokio::test]
async fn seeds_account_once() {
    let (_dir, db) = open_db().await;
    let admin = account("head_barista", "head@coffee.test");

    seed_bootstrap_user(&db, Some(&admin)).await.unwrap();
    seed_bootstrap_user(&db, Some(&admin)).await.unwrap();

    let users = user::Entity::find().all(&db).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "head_barista");
    assert_eq!(users[0].email, "head@coffee.test");
}

#[tokio::test]
async fn missing_account_is_a_no_op() {
    let (_dir, db) = open_db().await;

    seed_bootstrap_user(&db, None).await.unwrap();

    assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_email_fails_startup() {
    let (_dir, db) = open_db().await;

    let err = seed_bootstrap_user(&db, Some(&account("head_barista", "not-an-email")))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid seed.admin account"), "{err}");
    assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_username_fails_startup() {
    let (_dir, db) = open_db().await;

    let res = seed_bootstrap_user(&db, Some(&account("head barista!", "head@coffee.test"))).await;

    assert!(res.is_err());
    assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
}
