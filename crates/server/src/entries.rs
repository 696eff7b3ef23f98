//! Ledger entries API endpoints (read-only)

use api_types::entry::{EntryKind, EntryList, EntryListResponse, EntryView, Ledgerable};
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{ServerError, server::ServerState};

const DEFAULT_PAGE_SIZE: u64 = 50;

pub(crate) fn map_entry(entry: engine::LedgerEntry) -> EntryView {
    EntryView {
        id: entry.id,
        ledgerable: Ledgerable {
            kind: entry.owner.kind,
            id: entry.owner.id,
        },
        money_to: entry.money_to,
        money_from: entry.money_from,
        reason: entry.reason,
        kind: match entry.kind {
            engine::EntryKind::Credit => EntryKind::Credit,
            engine::EntryKind::Debit => EntryKind::Debit,
        },
        credit: entry.kind == engine::EntryKind::Credit,
        debit: entry.kind == engine::EntryKind::Debit,
        amount: entry.amount,
        current_balance: entry.current_balance,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    }
}

/// List all entries, newest first.
pub async fn index(
    State(state): State<ServerState>,
    Query(query): Query<EntryList>,
) -> Result<Json<EntryListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let (entries, next_cursor) = state
        .engine
        .list_entries_page(limit, query.cursor.as_deref())
        .await?;

    Ok(Json(EntryListResponse {
        entries: entries.into_iter().map(map_entry).collect(),
        next_cursor,
    }))
}

/// Show one entry.
pub async fn show(
    State(state): State<ServerState>,
    Path(entry_id): Path<i32>,
) -> Result<Json<EntryView>, ServerError> {
    let entry = state.engine.entry(entry_id).await?;
    Ok(Json(map_entry(entry)))
}
