use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use steeple_core::health::{healthz, readyz};
use steeple_core::middleware::request_id_layer;

use crate::handlers::{
    church::{create_church, get_church, get_church_stats, recompute_church_stats},
    event::{create_event, delete_event},
    membership::{
        approve_membership, leave_church, my_memberships, pending_memberships,
        reject_membership, request_membership, update_member_role,
    },
    sermon::{create_sermon, delete_sermon},
    user::{create_user, delete_user, get_me, update_me},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Memberships
        .route("/memberships/request", post(request_membership))
        .route("/memberships/my", get(my_memberships))
        .route(
            "/memberships/churches/{church_id}/leave",
            delete(leave_church),
        )
        .route(
            "/memberships/churches/{church_id}/pending",
            get(pending_memberships),
        )
        .route(
            "/memberships/churches/{church_id}/approve/{user_id}",
            put(approve_membership),
        )
        .route(
            "/memberships/churches/{church_id}/reject/{user_id}",
            put(reject_membership),
        )
        .route(
            "/memberships/churches/{church_id}/members/{user_id}/role",
            put(update_member_role),
        )
        // Users
        .route("/users", post(create_user))
        .route("/users/@me", get(get_me))
        .route("/users/@me", patch(update_me))
        .route("/users/{user_id}", delete(delete_user))
        // Churches
        .route("/churches", post(create_church))
        .route("/churches/{church_id}", get(get_church))
        .route("/churches/{church_id}/stats", get(get_church_stats))
        .route(
            "/churches/{church_id}/stats/recompute",
            post(recompute_church_stats),
        )
        // Sermons
        .route("/churches/{church_id}/sermons", post(create_sermon))
        .route("/sermons/{sermon_id}", delete(delete_sermon))
        // Events
        .route("/churches/{church_id}/events", post(create_event))
        .route("/events/{event_id}", delete(delete_event))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
