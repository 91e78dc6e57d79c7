use async_trait::async_trait;
use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use clubfund_core::errors::Result;
use clubfund_core::units::{
    FundCommit, FundRepositoryTrait, FundSnapshot, FundState, MemberPosition, Transaction,
};

use crate::errors::StorageError;

/// Everything persisted for one fund.
#[derive(Debug, Clone, Default)]
struct FundStore {
    fund: FundState,
    positions: BTreeMap<String, MemberPosition>,
    transactions: Vec<Transaction>,
    transaction_ids: HashSet<String>,
}

/// Repository keeping fund state in process memory.
#[derive(Debug, Default)]
pub struct InMemoryFundRepository {
    store: RwLock<FundStore>,
}

impl InMemoryFundRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding raw state, as written by a batch import
    /// that bypassed the engine. Nothing is validated here; the engine
    /// reconciles it on first load.
    pub fn with_snapshot(snapshot: FundSnapshot) -> Self {
        let positions = snapshot
            .positions
            .into_iter()
            .map(|p| (p.member_id.clone(), p))
            .collect();
        Self {
            store: RwLock::new(FundStore {
                fund: snapshot.fund,
                positions,
                transactions: Vec::new(),
                transaction_ids: HashSet::new(),
            }),
        }
    }
}

#[async_trait]
impl FundRepositoryTrait for InMemoryFundRepository {
    fn load(&self) -> Result<FundSnapshot> {
        let store = self.store.read().map_err(StorageError::from)?;
        Ok(FundSnapshot {
            fund: store.fund.clone(),
            positions: store.positions.values().cloned().collect(),
        })
    }

    /// Applies the commit as a unit. A commit repeating a stored transaction
    /// id is refused before anything is written.
    async fn commit(&self, commit: FundCommit) -> Result<()> {
        let mut store = self.store.write().map_err(StorageError::from)?;
        let mut incoming = HashSet::new();
        for tx in &commit.transactions {
            if store.transaction_ids.contains(&tx.id) || !incoming.insert(tx.id.as_str()) {
                return Err(StorageError::DuplicateTransaction(tx.id.clone()).into());
            }
        }
        debug!(
            "Storing fund state with {} position update(s) and {} transaction(s)",
            commit.positions.len(),
            commit.transactions.len()
        );
        store.fund = commit.fund;
        for position in commit.positions {
            store.positions.insert(position.member_id.clone(), position);
        }
        for tx in commit.transactions {
            store.transaction_ids.insert(tx.id.clone());
            store.transactions.push(tx);
        }
        Ok(())
    }

    fn list_transactions(&self, member_id: Option<&str>) -> Result<Vec<Transaction>> {
        let store = self.store.read().map_err(StorageError::from)?;
        Ok(store
            .transactions
            .iter()
            .filter(|tx| member_id.is_none() || tx.member_id.as_deref() == member_id)
            .cloned()
            .collect())
    }
}
