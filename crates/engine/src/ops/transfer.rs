use std::iter;

use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::{
    DEFAULT_TRANSFER_REASON, ESCROW_NAME, EngineError, LedgerEntry, Party, Recipients, ResultEngine,
    TransferCmd, Transferred,
    util::{ensure_positive_amount, normalize_optional_text},
};

use super::{
    Engine,
    balances::balance_of,
    record::{credit_entry, debit_entry},
    with_tx,
};

impl Engine {
    /// Move `amount` from `cmd.from` to one or many recipients.
    ///
    /// Each recipient costs one credit on the source side and one debit on
    /// the recipient side, credit first. A fan-out checks `amount * n`
    /// against the source balance up front and is all-or-nothing: if any
    /// recipient fails, no entry of the batch is kept.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<Transferred> {
        let TransferCmd {
            from,
            to,
            amount,
            reason,
        } = cmd;
        ensure_positive_amount(amount)?;
        let reason = normalize_optional_text(Some(&reason))
            .unwrap_or_else(|| DEFAULT_TRANSFER_REASON.to_string());

        match to {
            Recipients::One(to) => {
                let _guards = self.locks.acquire([from.key(), to.key()]).await;
                let entry = with_tx!(self, |db_tx| {
                    transfer_once(&db_tx, &from, &to, amount, &reason).await
                })?;
                Ok(Transferred::One(entry))
            }
            Recipients::Many(recipients) => {
                if recipients.is_empty() {
                    return Err(EngineError::InvalidRecipient(
                        "at least one recipient is required".to_string(),
                    ));
                }
                let count = i64::try_from(recipients.len())
                    .map_err(|_| EngineError::InvalidAmount("too many recipients".to_string()))?;
                let total = amount.checked_mul(count).ok_or_else(|| {
                    EngineError::InvalidAmount(format!("{amount} x {count} overflows"))
                })?;

                let keys = iter::once(from.key()).chain(recipients.iter().map(Party::key));
                let _guards = self.locks.acquire(keys).await;
                let entries = with_tx!(self, |db_tx| {
                    transfer_many(&db_tx, &from, &recipients, amount, total, &reason).await
                })?;
                Ok(Transferred::Many(entries))
            }
        }
    }
}

/// Which ledger is credited and which is debited for a single transfer, and
/// the counterpart name each entry is attributed with.
#[derive(Debug, PartialEq, Eq)]
struct Route<'a> {
    credit_owner: &'a Party,
    credit_to_name: &'a str,
    debit_owner: &'a Party,
    debit_from_name: &'a str,
}

impl<'a> Route<'a> {
    fn resolve(from: &'a Party, to: &'a Party) -> ResultEngine<Self> {
        if from.key() == to.key() {
            return Err(EngineError::InvalidRecipient(
                "source and recipient cannot be the same ledgerable".to_string(),
            ));
        }

        let route = match (from, to) {
            // Paying into escrow: the escrow ledger is debited on behalf of `from`.
            (_, Party::Escrow) => Self {
                credit_owner: from,
                credit_to_name: ESCROW_NAME,
                debit_owner: to,
                debit_from_name: from.name(),
            },
            // Paying out of escrow: the escrow ledger is credited towards `to`.
            (Party::Escrow, _) => Self {
                credit_owner: from,
                credit_to_name: to.name(),
                debit_owner: to,
                debit_from_name: ESCROW_NAME,
            },
            _ => Self {
                credit_owner: from,
                credit_to_name: to.name(),
                debit_owner: to,
                debit_from_name: from.name(),
            },
        };
        Ok(route)
    }
}

/// Fan-out body: one balance check for the whole batch, then one pair per
/// recipient in input order.
async fn transfer_many<C>(
    db: &C,
    from: &Party,
    recipients: &[Party],
    amount: i64,
    total: i64,
    reason: &str,
) -> ResultEngine<Vec<LedgerEntry>>
where
    C: ConnectionTrait,
{
    let balance = balance_of(db, &from.key()).await?;
    if total > balance {
        tracing::warn!(from = %from.key(), balance, total, "fan-out rejected");
        return Err(EngineError::InsufficientBalance(format!(
            "{} has {balance}, cannot transfer {total}",
            from.key()
        )));
    }

    let mut entries = Vec::with_capacity(recipients.len());
    for to in recipients {
        entries.push(transfer_once(db, from, to, amount, reason).await?);
    }
    Ok(entries)
}

/// One credit/debit pair. Returns the debit entry.
async fn transfer_once<C>(
    db: &C,
    from: &Party,
    to: &Party,
    amount: i64,
    reason: &str,
) -> ResultEngine<LedgerEntry>
where
    C: ConnectionTrait,
{
    let route = Route::resolve(from, to)?;
    let reason = Some(reason.to_string());

    credit_entry(
        db,
        route.credit_owner,
        route.credit_to_name,
        amount,
        reason.clone(),
    )
    .await?;
    let entry = debit_entry(
        db,
        route.debit_owner,
        route.debit_from_name,
        amount,
        reason,
    )
    .await?;

    tracing::info!(
        from = %from.key(),
        to = %to.key(),
        amount,
        entry_id = entry.id,
        "transfer recorded"
    );
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Holder;

    fn holder(id: &str, name: &str) -> Party {
        Party::Holder(Holder::new("user", id, name).unwrap())
    }

    #[test]
    fn ordinary_route_cross_references_names() {
        let a = holder("1", "Alice");
        let b = holder("2", "Bob");
        let route = Route::resolve(&a, &b).unwrap();
        assert_eq!(route.credit_owner, &a);
        assert_eq!(route.credit_to_name, "Bob");
        assert_eq!(route.debit_owner, &b);
        assert_eq!(route.debit_from_name, "Alice");
    }

    #[test]
    fn into_escrow_route() {
        let a = holder("1", "Alice");
        let route = Route::resolve(&a, &Party::Escrow).unwrap();
        assert_eq!(route.credit_owner, &a);
        assert_eq!(route.credit_to_name, "Escrow");
        assert!(route.debit_owner.is_escrow());
        assert_eq!(route.debit_from_name, "Alice");
    }

    #[test]
    fn out_of_escrow_route() {
        let b = holder("2", "Bob");
        let route = Route::resolve(&Party::Escrow, &b).unwrap();
        assert!(route.credit_owner.is_escrow());
        assert_eq!(route.credit_to_name, "Bob");
        assert_eq!(route.debit_owner, &b);
        assert_eq!(route.debit_from_name, "Escrow");
    }

    #[test]
    fn same_ledgerable_is_rejected() {
        let a = holder("1", "Alice");
        let renamed = holder("1", "Alice Smith");
        assert!(matches!(
            Route::resolve(&a, &renamed),
            Err(EngineError::InvalidRecipient(_))
        ));
        assert!(matches!(
            Route::resolve(&Party::Escrow, &Party::Escrow),
            Err(EngineError::InvalidRecipient(_))
        ));
    }

    #[test]
    fn same_id_different_kind_is_allowed() {
        let user = holder("1", "Alice");
        let shop = Party::Holder(Holder::new("shop", "1", "Alice's").unwrap());
        assert!(Route::resolve(&user, &shop).is_ok());
    }
}
