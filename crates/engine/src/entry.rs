//! The module contains the `LedgerEntry` type, one signed movement against
//! exactly one ledgerable.
//!
//! Entries are append-only: they are inserted once and never updated. The
//! `current_balance` snapshot is the owner's balance *after* the entry.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, LedgerKey};

/// Direction of an entry from the owner's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Money leaving the owner's balance.
    Credit,
    /// Money entering the owner's balance.
    Debit,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Signed effect of `amount` on the owner's balance.
    pub fn apply(self, balance: i64, amount: i64) -> i64 {
        match self {
            Self::Credit => balance - amount,
            Self::Debit => balance + amount,
        }
    }
}

/// Fields of an entry except its owner, as handed to the recorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryData {
    pub kind: EntryKind,
    pub money_to: Option<String>,
    pub money_from: Option<String>,
    pub reason: Option<String>,
    pub amount: i64,
    pub current_balance: i64,
}

impl EntryData {
    pub fn credit(to_name: impl Into<String>, amount: i64, current_balance: i64) -> Self {
        Self {
            kind: EntryKind::Credit,
            money_to: Some(to_name.into()),
            money_from: None,
            reason: None,
            amount,
            current_balance,
        }
    }

    pub fn debit(from_name: impl Into<String>, amount: i64, current_balance: i64) -> Self {
        Self {
            kind: EntryKind::Debit,
            money_to: None,
            money_from: Some(from_name.into()),
            reason: None,
            amount,
            current_balance,
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }
}

/// A persisted ledger entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i32,
    pub owner: LedgerKey,
    pub money_to: Option<String>,
    pub money_from: Option<String>,
    pub reason: Option<String>,
    pub kind: EntryKind,
    pub amount: i64,
    pub current_balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn is_credit(&self) -> bool {
        self.kind == EntryKind::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.kind == EntryKind::Debit
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ledgerable_type: String,
    pub ledgerable_id: String,
    pub money_to: Option<String>,
    pub money_from: Option<String>,
    pub reason: Option<String>,
    pub credit: bool,
    pub debit: bool,
    pub amount: i64,
    pub current_balance: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_entry(owner: &LedgerKey, data: EntryData, now: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::NotSet,
            ledgerable_type: ActiveValue::Set(owner.kind.clone()),
            ledgerable_id: ActiveValue::Set(owner.id.clone()),
            money_to: ActiveValue::Set(data.money_to),
            money_from: ActiveValue::Set(data.money_from),
            reason: ActiveValue::Set(data.reason),
            credit: ActiveValue::Set(data.kind == EntryKind::Credit),
            debit: ActiveValue::Set(data.kind == EntryKind::Debit),
            amount: ActiveValue::Set(data.amount),
            current_balance: ActiveValue::Set(data.current_balance),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = match (model.credit, model.debit) {
            (true, false) => EntryKind::Credit,
            (false, true) => EntryKind::Debit,
            _ => {
                return Err(EngineError::Database(DbErr::Custom(format!(
                    "corrupt ledger entry {}: expected exactly one of credit or debit",
                    model.id
                ))));
            }
        };
        Ok(Self {
            id: model.id,
            owner: LedgerKey::new(model.ledgerable_type, model.ledgerable_id),
            money_to: model.money_to,
            money_from: model.money_from,
            reason: model.reason,
            kind,
            amount: model.amount,
            current_balance: model.current_balance,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(credit: bool, debit: bool) -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            ledgerable_type: "user".to_string(),
            ledgerable_id: "1".to_string(),
            money_to: None,
            money_from: Some("Bob".to_string()),
            reason: None,
            credit,
            debit,
            amount: 10,
            current_balance: 10,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn model_flags_map_to_kind() {
        let entry = LedgerEntry::try_from(model(false, true)).unwrap();
        assert!(entry.is_debit());
        assert!(!entry.is_credit());
        assert_eq!(entry.owner, LedgerKey::new("user", "1"));
    }

    #[test]
    fn ambiguous_flags_are_reported_as_corrupt_rows() {
        for (credit, debit) in [(true, true), (false, false)] {
            let err = LedgerEntry::try_from(model(credit, debit)).unwrap_err();
            assert!(matches!(err, EngineError::Database(DbErr::Custom(_))));
        }
    }

    #[test]
    fn kind_applies_signed_amount() {
        assert_eq!(EntryKind::Debit.apply(70, 30), 100);
        assert_eq!(EntryKind::Credit.apply(100, 30), 70);
    }
}
