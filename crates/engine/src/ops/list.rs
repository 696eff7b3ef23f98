use base64::Engine as _;
use serde::{Deserialize, Serialize};

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{EngineError, LedgerEntry, ResultEngine, entry};

use super::Engine;

/// Upper bound for a single listing page.
pub const MAX_PAGE_SIZE: u64 = 200;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct EntriesCursor {
    entry_id: i32,
}

impl EntriesCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid entries cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid entries cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid entries cursor".to_string()))
    }
}

impl Engine {
    /// Lists entries of every owner, with cursor-based pagination.
    ///
    /// Pagination is newest → older by entry id. `limit` is clamped to
    /// `1..=MAX_PAGE_SIZE`; the returned cursor is `None` on the last page.
    pub async fn list_entries_page(
        &self,
        limit: u64,
        cursor: Option<&str>,
    ) -> ResultEngine<(Vec<LedgerEntry>, Option<String>)> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let mut query = entry::Entity::find()
            .order_by_desc(entry::Column::Id)
            .limit(limit + 1);
        if let Some(cursor) = cursor {
            let cursor = EntriesCursor::decode(cursor)?;
            query = query.filter(entry::Column::Id.lt(cursor.entry_id));
        }

        let rows: Vec<entry::Model> = query.all(&self.database).await?;
        let has_more = rows.len() > limit as usize;

        let out = rows
            .into_iter()
            .take(limit as usize)
            .map(LedgerEntry::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let next_cursor = if has_more {
            out.last()
                .map(|entry| EntriesCursor { entry_id: entry.id }.encode())
                .transpose()?
        } else {
            None
        };

        Ok((out, next_cursor))
    }

    /// Looks up one entry by id.
    pub async fn entry(&self, entry_id: i32) -> ResultEngine<LedgerEntry> {
        entry::Entity::find_by_id(entry_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("entry {entry_id}")))
            .and_then(LedgerEntry::try_from)
    }
}
