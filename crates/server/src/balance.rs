//! Balance API endpoint

use api_types::{balance::BalanceResponse, entry::Ledgerable};
use axum::{
    Json,
    extract::{Path, State},
};
use engine::Party;

use crate::{ServerError, server::ServerState};

/// Current balance of a ledgerable; `escrow` as kind selects the escrow ledger.
pub async fn get(
    State(state): State<ServerState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let party = Party::from_key(&kind, &id)?;
    let balance = state.engine.balance(&party).await?;
    let key = party.key();

    Ok(Json(BalanceResponse {
        ledgerable: Ledgerable {
            kind: key.kind,
            id: key.id,
        },
        balance,
    }))
}
