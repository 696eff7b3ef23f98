use chrono::Utc;
use sea_orm::{ConnectionTrait, TransactionTrait, prelude::*};

use crate::{
    CreditCmd, DebitCmd, EngineError, EntryData, LedgerEntry, LedgerKey, Ledgerable, Party,
    ResultEngine, entry,
    util::{ensure_positive_amount, normalize_optional_text},
};

use super::{Engine, balances::balance_of, with_tx};

impl Engine {
    /// Append `data` as an entry owned by `ledgerable`.
    ///
    /// This is the raw recorder: it does not look at balances, so the caller
    /// is responsible for a consistent `current_balance`. Use [`Engine::debit`]
    /// and [`Engine::credit`] for validated movements.
    pub async fn record<L>(&self, ledgerable: &L, data: EntryData) -> ResultEngine<LedgerEntry>
    where
        L: Ledgerable + ?Sized,
    {
        let owner = Party::of(ledgerable)?.key();
        let _guards = self.locks.acquire([owner.clone()]).await;
        with_tx!(self, |db_tx| { record_entry(&db_tx, &owner, data).await })
    }

    /// Increase a balance. A debit never fails for lack of funds.
    pub async fn debit(&self, cmd: DebitCmd) -> ResultEngine<LedgerEntry> {
        let DebitCmd {
            to,
            from_name,
            amount,
            reason,
        } = cmd;
        ensure_positive_amount(amount)?;
        let reason = normalize_optional_text(reason.as_deref());
        let _guards = self.locks.acquire([to.key()]).await;
        with_tx!(self, |db_tx| {
            debit_entry(&db_tx, &to, &from_name, amount, reason).await
        })
    }

    /// Decrease a balance.
    ///
    /// Fails with [`EngineError::InsufficientBalance`] when the balance is 0
    /// or lower than `amount`. Crediting the whole balance is allowed.
    pub async fn credit(&self, cmd: CreditCmd) -> ResultEngine<LedgerEntry> {
        let CreditCmd {
            from,
            to_name,
            amount,
            reason,
        } = cmd;
        ensure_positive_amount(amount)?;
        let reason = normalize_optional_text(reason.as_deref());
        let _guards = self.locks.acquire([from.key()]).await;
        with_tx!(self, |db_tx| {
            credit_entry(&db_tx, &from, &to_name, amount, reason).await
        })
    }
}

pub(super) async fn record_entry<C>(
    db: &C,
    owner: &LedgerKey,
    data: EntryData,
) -> ResultEngine<LedgerEntry>
where
    C: ConnectionTrait,
{
    let model = entry::ActiveModel::new_entry(owner, data, Utc::now())
        .insert(db)
        .await?;
    let entry = LedgerEntry::try_from(model)?;
    tracing::debug!(
        owner = %entry.owner,
        entry_id = entry.id,
        kind = entry.kind.as_str(),
        amount = entry.amount,
        current_balance = entry.current_balance,
        "ledger entry recorded"
    );
    Ok(entry)
}

pub(super) async fn debit_entry<C>(
    db: &C,
    to: &Party,
    from_name: &str,
    amount: i64,
    reason: Option<String>,
) -> ResultEngine<LedgerEntry>
where
    C: ConnectionTrait,
{
    let owner = to.key();
    let balance = balance_of(db, &owner).await?;
    let new_balance = balance
        .checked_add(amount)
        .ok_or_else(|| EngineError::InvalidAmount(format!("balance of {owner} would overflow")))?;
    let data = EntryData::debit(from_name, amount, new_balance).reason(reason);
    record_entry(db, &owner, data).await
}

pub(super) async fn credit_entry<C>(
    db: &C,
    from: &Party,
    to_name: &str,
    amount: i64,
    reason: Option<String>,
) -> ResultEngine<LedgerEntry>
where
    C: ConnectionTrait,
{
    let owner = from.key();
    let balance = balance_of(db, &owner).await?;
    if balance == 0 || amount > balance {
        tracing::warn!(owner = %owner, balance, amount, "credit rejected");
        return Err(EngineError::InsufficientBalance(format!(
            "{owner} has {balance}, cannot credit {amount}"
        )));
    }
    let data = EntryData::credit(to_name, amount, balance - amount).reason(reason);
    record_entry(db, &owner, data).await
}
