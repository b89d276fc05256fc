use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, security_headers_middleware, trace_id};
use crate::routes::{activities, auth, guides, health, invitations, users};
use shared::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let jwt = JwtConfig::with_leeway(
        &config.jwt.secret,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    )?;

    let request_timeout = config.server.request_timeout_secs;
    let cors = build_cors(&config);

    let state = AppState {
        pool,
        config: Arc::new(config),
        jwt: Arc::new(jwt),
    };

    // Token issuance (public; authentication is the operation itself)
    let token_routes = Router::new()
        .route("/api/token", post(auth::obtain_token))
        .route("/api/token/refresh", post(auth::refresh_token));

    // Resource routes; each handler authenticates via the CurrentUser
    // extractor and filters through the visibility predicate
    let api_routes = Router::new()
        .route("/api/me", get(users::me))
        .route("/api/guides", get(guides::list_guides).post(guides::create_guide))
        .route(
            "/api/guides/:guide_id",
            get(guides::get_guide)
                .put(guides::update_guide)
                .patch(guides::update_guide)
                .delete(guides::delete_guide),
        )
        .route("/api/guides/:guide_id/activities", get(guides::guide_activities))
        .route(
            "/api/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/api/activities/:activity_id",
            get(activities::get_activity)
                .put(activities::update_activity)
                .patch(activities::update_activity)
                .delete(activities::delete_activity),
        )
        .route(
            "/api/invitations",
            get(invitations::list_invitations).post(invitations::create_invitation),
        )
        .route(
            "/api/invitations/:invitation_id",
            axum::routing::delete(invitations::delete_invitation),
        )
        .route(
            "/api/invitations/:invitation_id/accept",
            post(invitations::accept_invitation),
        )
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:user_id",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(token_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}

fn build_cors(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
