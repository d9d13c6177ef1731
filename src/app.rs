use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{comments, photos, root, social_medias, users};
use crate::state::AppState;

/// Build the full router. Auth is enforced per handler by the `AuthUser` extractor,
/// so public reads and protected writes can share a path.
pub fn app(state: AppState) -> Router {
    let enable_cors = state.enable_cors;

    let router = Router::new()
        // Public
        .route("/", get(root::welcome))
        .route("/health", get(root::health))
        .merge(user_routes())
        .merge(photo_routes())
        .merge(comment_routes())
        .merge(social_media_routes())
        .layer(TraceLayer::new_for_http());

    let router = if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users", put(users::update).delete(users::delete))
}

fn photo_routes() -> Router<AppState> {
    Router::new()
        .route("/photos", get(photos::list).post(photos::create))
        .route(
            "/photos/:id",
            get(photos::get).put(photos::update).delete(photos::delete),
        )
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", get(comments::list).post(comments::create))
        .route(
            "/comments/:id",
            get(comments::get).put(comments::update).delete(comments::delete),
        )
}

fn social_media_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/socialmedias",
            get(social_medias::list).post(social_medias::create),
        )
        .route(
            "/socialmedias/:id",
            get(social_medias::get)
                .put(social_medias::update)
                .delete(social_medias::delete),
        )
}
