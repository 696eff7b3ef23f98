use axum::{Router, routing::get};

use std::sync::Arc;

use crate::{balance, entries};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

pub(crate) fn router(state: ServerState) -> Router {
    Router::new()
        .route("/entries/ledger", get(entries::index))
        .route("/entries/ledger/{entry_id}", get(entries::show))
        .route("/balance/{kind}/{id}", get(balance::get))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
