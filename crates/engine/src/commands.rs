//! Command structs for engine operations.
//!
//! These types group parameters for write operations (debit/credit/transfer),
//! keeping call sites readable and avoiding long argument lists.

use crate::{LedgerEntry, Party};

/// Reason recorded on transfer entries when the caller gives none.
pub const DEFAULT_TRANSFER_REASON: &str = "funds transfer";

/// Increase `to`'s balance, attributing the money to `from_name`.
#[derive(Clone, Debug)]
pub struct DebitCmd {
    pub to: Party,
    pub from_name: String,
    pub amount: i64,
    pub reason: Option<String>,
}

impl DebitCmd {
    #[must_use]
    pub fn new(to: Party, from_name: impl Into<String>, amount: i64) -> Self {
        Self {
            to,
            from_name: from_name.into(),
            amount,
            reason: None,
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Decrease `from`'s balance, attributing the money to `to_name`.
#[derive(Clone, Debug)]
pub struct CreditCmd {
    pub from: Party,
    pub to_name: String,
    pub amount: i64,
    pub reason: Option<String>,
}

impl CreditCmd {
    #[must_use]
    pub fn new(from: Party, to_name: impl Into<String>, amount: i64) -> Self {
        Self {
            from,
            to_name: to_name.into(),
            amount,
            reason: None,
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Who receives a transfer.
#[derive(Clone, Debug)]
pub enum Recipients {
    One(Party),
    /// Fan-out: every recipient receives the full `amount`, in order.
    Many(Vec<Party>),
}

impl From<Party> for Recipients {
    fn from(party: Party) -> Self {
        Self::One(party)
    }
}

impl From<Vec<Party>> for Recipients {
    fn from(parties: Vec<Party>) -> Self {
        Self::Many(parties)
    }
}

/// Move `amount` from `from` to every recipient in `to`.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub from: Party,
    pub to: Recipients,
    pub amount: i64,
    pub reason: String,
}

impl TransferCmd {
    #[must_use]
    pub fn new(from: Party, to: impl Into<Recipients>, amount: i64) -> Self {
        Self {
            from,
            to: to.into(),
            amount,
            reason: DEFAULT_TRANSFER_REASON.to_string(),
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// Debit entries written by a transfer, one per recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transferred {
    One(LedgerEntry),
    Many(Vec<LedgerEntry>),
}

impl Transferred {
    pub fn entries(&self) -> &[LedgerEntry] {
        match self {
            Self::One(entry) => std::slice::from_ref(entry),
            Self::Many(entries) => entries,
        }
    }

    pub fn into_entries(self) -> Vec<LedgerEntry> {
        match self {
            Self::One(entry) => vec![entry],
            Self::Many(entries) => entries,
        }
    }
}
