use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(roastery_routes())
        .merge(coffee_routes())
        .merge(shop_routes())
        .merge(review_routes())
        .routes(routes!(handlers::stats::get_stats))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::user::get_user))
}

fn roastery_routes() -> OpenApiRouter<AppState> {
    use handlers::roastery::*;
    OpenApiRouter::new()
        .routes(routes!(list_roasteries, create_roastery))
        .routes(routes!(get_roastery, update_roastery, delete_roastery))
}

fn coffee_routes() -> OpenApiRouter<AppState> {
    use handlers::coffee::*;
    OpenApiRouter::new()
        .routes(routes!(list_coffees, create_coffee))
        .routes(routes!(get_coffee, update_coffee, delete_coffee))
}

fn shop_routes() -> OpenApiRouter<AppState> {
    use handlers::shop::*;
    OpenApiRouter::new()
        .routes(routes!(list_shops, create_shop))
        .routes(routes!(get_shop, update_shop, delete_shop))
}

fn review_routes() -> OpenApiRouter<AppState> {
    use handlers::review::*;
    OpenApiRouter::new()
        .routes(routes!(list_reviews, create_review))
        .routes(routes!(get_review, update_review, delete_review))
}
