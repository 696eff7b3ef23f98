//! Ledger accounting core.
//!
//! Monetary movements between ledgerables are kept as an append-only list of
//! signed entries; balances are derived from that list. The [`Engine`]
//! exposes three groups of operations:
//!
//! - balance calculator: [`Engine::balance`], [`Engine::entries`],
//!   [`Engine::credits`], [`Engine::debits`];
//! - entry recorder: [`Engine::record`], [`Engine::debit`], [`Engine::credit`];
//! - transfer orchestrator: [`Engine::transfer`], including escrow routing and
//!   fan-out to many recipients.
//!
//! Read-only listing ([`Engine::list_entries_page`], [`Engine::entry`]) backs
//! the query API.

pub use commands::{
    CreditCmd, DEFAULT_TRANSFER_REASON, DebitCmd, Recipients, TransferCmd, Transferred,
};
pub use entry::{EntryData, EntryKind, LedgerEntry};
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, MAX_PAGE_SIZE};
pub use party::{ESCROW_KIND, ESCROW_NAME, Holder, LedgerKey, Ledgerable, Party};

mod commands;
mod entry;
mod error;
mod locks;
mod ops;
mod party;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
