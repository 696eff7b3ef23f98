//! Wire types of the read-only ledger API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod entry {
    use super::*;

    /// Direction of an entry from its owner's point of view.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EntryKind {
        Credit,
        Debit,
    }

    /// Owner of an entry: discriminator + id.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Ledgerable {
        #[serde(rename = "type")]
        pub kind: String,
        pub id: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EntryView {
        pub id: i32,
        pub ledgerable: Ledgerable,
        pub money_to: Option<String>,
        pub money_from: Option<String>,
        pub reason: Option<String>,
        pub kind: EntryKind,
        pub credit: bool,
        pub debit: bool,
        pub amount: i64,
        pub current_balance: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string of the listing endpoint.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EntryList {
        /// Page size (default: 50).
        pub limit: Option<u64>,
        /// Opaque cursor returned by the previous page.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryListResponse {
        pub entries: Vec<EntryView>,
        /// `None` on the last page.
        pub next_cursor: Option<String>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub ledgerable: super::entry::Ledgerable,
        pub balance: i64,
    }
}
