mod enhance;
mod resumes;
mod upload;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(upload::router())
        .merge(enhance::router())
        .nest("/resumes", resumes::router())
}
