use sea_orm::{
    Condition, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, Func, SimpleExpr},
};

use crate::{EntryKind, LedgerEntry, LedgerKey, Ledgerable, Party, ResultEngine, entry};

use super::Engine;

impl Engine {
    /// Current balance of `ledgerable`: sum of its debits minus sum of its
    /// credits.
    ///
    /// A ledgerable without entries has balance 0.
    pub async fn balance<L>(&self, ledgerable: &L) -> ResultEngine<i64>
    where
        L: Ledgerable + ?Sized,
    {
        let owner = Party::of(ledgerable)?.key();
        balance_of(&self.database, &owner).await
    }

    /// All entries owned by `ledgerable`, oldest first.
    pub async fn entries<L>(&self, ledgerable: &L) -> ResultEngine<Vec<LedgerEntry>>
    where
        L: Ledgerable + ?Sized,
    {
        let owner = Party::of(ledgerable)?.key();
        owner_entries(&self.database, &owner, None).await
    }

    /// Credit entries owned by `ledgerable`, oldest first.
    pub async fn credits<L>(&self, ledgerable: &L) -> ResultEngine<Vec<LedgerEntry>>
    where
        L: Ledgerable + ?Sized,
    {
        let owner = Party::of(ledgerable)?.key();
        owner_entries(&self.database, &owner, Some(EntryKind::Credit)).await
    }

    /// Debit entries owned by `ledgerable`, oldest first.
    pub async fn debits<L>(&self, ledgerable: &L) -> ResultEngine<Vec<LedgerEntry>>
    where
        L: Ledgerable + ?Sized,
    {
        let owner = Party::of(ledgerable)?.key();
        owner_entries(&self.database, &owner, Some(EntryKind::Debit)).await
    }
}

/// Signed running total of the owner's entries in insertion order, so the
/// aggregate never leaves the range of the stored balance snapshots.
pub(super) async fn balance_of<C>(db: &C, owner: &LedgerKey) -> ResultEngine<i64>
where
    C: ConnectionTrait,
{
    let signed_amount = Expr::case(
        entry::Column::Debit.eq(true),
        Expr::col(entry::Column::Amount),
    )
    .finally(Expr::col(entry::Column::Amount).mul(-1));

    let total: Option<Option<i64>> = entry::Entity::find()
        .select_only()
        .column_as(SimpleExpr::from(Func::sum(signed_amount)), "total")
        .filter(owned_by(owner))
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

async fn owner_entries<C>(
    db: &C,
    owner: &LedgerKey,
    kind: Option<EntryKind>,
) -> ResultEngine<Vec<LedgerEntry>>
where
    C: ConnectionTrait,
{
    let mut query = entry::Entity::find()
        .filter(owned_by(owner))
        .order_by_asc(entry::Column::Id);
    if let Some(kind) = kind {
        query = query.filter(kind_column(kind).eq(true));
    }

    query
        .all(db)
        .await?
        .into_iter()
        .map(LedgerEntry::try_from)
        .collect()
}

fn owned_by(owner: &LedgerKey) -> Condition {
    Condition::all()
        .add(entry::Column::LedgerableType.eq(owner.kind.as_str()))
        .add(entry::Column::LedgerableId.eq(owner.id.as_str()))
}

fn kind_column(kind: EntryKind) -> entry::Column {
    match kind {
        EntryKind::Credit => entry::Column::Credit,
        EntryKind::Debit => entry::Column::Debit,
    }
}
