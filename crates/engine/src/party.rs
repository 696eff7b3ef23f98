//! Ledgerables: anything that can hold a balance and own ledger entries.
//!
//! A concrete ledgerable is identified by a [`LedgerKey`] (type discriminator
//! plus id) and carries a display name used to attribute counterpart entries.
//! The escrow ledger is not a concrete entity: it is the [`Party::Escrow`]
//! variant with a reserved well-known key.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Discriminator reserved for the escrow ledger.
pub const ESCROW_KIND: &str = "escrow";
/// Display name the escrow ledger is attributed with on counterpart entries.
pub const ESCROW_NAME: &str = "Escrow";

/// Identity of an entry owner: discriminator + id.
///
/// Ordering is used to acquire per-owner locks deterministically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerKey {
    pub kind: String,
    pub id: String,
}

impl LedgerKey {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn escrow() -> Self {
        Self::new(ESCROW_KIND, ESCROW_KIND)
    }

    pub fn is_escrow(&self) -> bool {
        self.kind == ESCROW_KIND
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Capability implemented by every domain type that can own ledger entries.
pub trait Ledgerable {
    fn ledger_key(&self) -> LedgerKey;

    fn ledger_name(&self) -> String;

    fn is_escrow(&self) -> bool {
        false
    }
}

/// Plain concrete ledgerable, for callers that only know the raw identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Holder {
    key: LedgerKey,
    name: String,
}

impl Holder {
    /// Build a concrete reference. Discriminator, id and name must be
    /// non-blank and the discriminator must not be the escrow one.
    pub fn new(kind: &str, id: &str, name: &str) -> ResultEngine<Self> {
        let kind = normalize_required(kind, "kind")?;
        let id = normalize_required(id, "id")?;
        let name = normalize_required(name, "name")?;
        if is_escrow_kind(&kind) {
            return Err(EngineError::InvalidId(format!(
                "\"{ESCROW_KIND}\" is reserved for the escrow ledger"
            )));
        }
        Ok(Self {
            key: LedgerKey { kind, id },
            name,
        })
    }

    pub fn key(&self) -> &LedgerKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Holder {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Holder {}

impl Ledgerable for Holder {
    fn ledger_key(&self) -> LedgerKey {
        self.key.clone()
    }

    fn ledger_name(&self) -> String {
        self.name.clone()
    }
}

/// A participant in a ledger operation: the escrow hub or a concrete holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "party", rename_all = "snake_case")]
pub enum Party {
    Escrow,
    Holder(Holder),
}

impl Party {
    /// Resolve any ledgerable into a party, validating concrete identities.
    pub fn of<L: Ledgerable + ?Sized>(ledgerable: &L) -> ResultEngine<Self> {
        if ledgerable.is_escrow() {
            return Ok(Self::Escrow);
        }
        let key = ledgerable.ledger_key();
        Holder::new(&key.kind, &key.id, &ledgerable.ledger_name()).map(Self::Holder)
    }

    /// Build a party from a bare key. The display name of a holder defaults
    /// to its id, so this is meant for reads.
    pub fn from_key(kind: &str, id: &str) -> ResultEngine<Self> {
        if is_escrow_kind(kind) {
            return Ok(Self::Escrow);
        }
        Holder::new(kind, id, id).map(Self::Holder)
    }

    pub fn key(&self) -> LedgerKey {
        match self {
            Self::Escrow => LedgerKey::escrow(),
            Self::Holder(holder) => holder.key.clone(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Escrow => ESCROW_NAME,
            Self::Holder(holder) => &holder.name,
        }
    }

    pub fn is_escrow(&self) -> bool {
        matches!(self, Self::Escrow)
    }
}

impl Ledgerable for Party {
    fn ledger_key(&self) -> LedgerKey {
        self.key()
    }

    fn ledger_name(&self) -> String {
        self.name().to_string()
    }

    fn is_escrow(&self) -> bool {
        Party::is_escrow(self)
    }
}

impl From<Holder> for Party {
    fn from(holder: Holder) -> Self {
        Self::Holder(holder)
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Escrow => f.write_str(ESCROW_KIND),
            Self::Holder(holder) => write!(f, "{}:{}", holder.key, holder.name),
        }
    }
}

/// Parses `escrow` or `kind:id:name`. The name may itself contain colons.
impl FromStr for Party {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if is_escrow_kind(s) {
            return Ok(Self::Escrow);
        }
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(id), Some(name)) => Holder::new(kind, id, name).map(Self::Holder),
            _ => Err(EngineError::InvalidId(format!(
                "expected \"escrow\" or \"kind:id:name\", got \"{s}\""
            ))),
        }
    }
}

fn is_escrow_kind(kind: &str) -> bool {
    kind.trim().eq_ignore_ascii_case(ESCROW_KIND)
}

fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidId(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}
