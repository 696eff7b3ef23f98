use sea_orm::DatabaseConnection;

use crate::{ResultEngine, locks::OwnerLocks};

mod balances;
mod list;
mod record;
mod transfer;

pub use list::MAX_PAGE_SIZE;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger accounting core.
///
/// Every write serializes on the owners it touches and runs in a single
/// database transaction, so a balance read and the entries computed from it
/// are committed together or not at all.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    locks: OwnerLocks,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            locks: OwnerLocks::default(),
        })
    }
}
