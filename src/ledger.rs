//! The remote ledger as seen by the client.
//!
//! Any RPC transport can sit behind [`Ledger`]; failures of the transport
//! come back as [`NameServiceError::Transport`] carrying the transport's own
//! message.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use solana_program::{hash::Hash, pubkey::Pubkey};
use solana_sdk::{account::Account, signature::Signature, transaction::Transaction};
use tracing::debug;

use crate::{
    constants::ANCHOR_DISCRIMINATOR,
    error::{NameServiceError, Result},
};

#[async_trait]
pub trait Ledger: Send + Sync {
    /// The account at `address`, or `None` if nothing is stored there.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    /// All accounts owned by `program_id` whose data starts with `discriminator`.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8; ANCHOR_DISCRIMINATOR],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    async fn get_latest_blockhash(&self) -> Result<Hash>;

    /// Submits a signed transaction and waits for confirmation.
    async fn submit_transaction(&self, transaction: &Transaction) -> Result<Signature>;
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: BTreeMap<Pubkey, Account>,
    submitted: Vec<Transaction>,
    query_failure: Option<String>,
    submit_rejection: Option<String>,
    account_queries: usize,
}

/// In-process ledger for tests and offline dry runs.
#[derive(Debug)]
pub struct MemoryLedger {
    blockhash: Hash,
    state: Mutex<MemoryState>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        let account = Account {
            lamports: 1,
            data,
            owner,
            executable: false,
            rent_epoch: 0,
        };
        self.state().accounts.insert(address, account);
    }

    /// Makes every query fail with `message` until cleared.
    pub fn fail_queries(&self, message: Option<&str>) {
        self.state().query_failure = message.map(str::to_string);
    }

    /// Makes every submission fail with `message` until cleared.
    pub fn reject_submissions(&self, message: Option<&str>) {
        self.state().submit_rejection = message.map(str::to_string);
    }

    pub fn submitted(&self) -> Vec<Transaction> {
        self.state().submitted.clone()
    }

    /// Number of single-account queries served so far.
    pub fn account_queries(&self) -> usize {
        self.state().account_queries
    }

    fn check_queries(state: &MemoryState) -> Result<()> {
        match &state.query_failure {
            Some(message) => Err(NameServiceError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let mut state = self.state();
        state.account_queries += 1;
        Self::check_queries(&state)?;
        Ok(state.accounts.get(address).cloned())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        discriminator: &[u8; ANCHOR_DISCRIMINATOR],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let state = self.state();
        Self::check_queries(&state)?;
        Ok(state
            .accounts
            .iter()
            .filter(|(_, account)| {
                account.owner == *program_id && account.data.starts_with(discriminator)
            })
            .map(|(address, account)| (*address, account.data.clone()))
            .collect())
    }

    async fn get_latest_blockhash(&self) -> Result<Hash> {
        Self::check_queries(&self.state())?;
        Ok(self.blockhash)
    }

    async fn submit_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        let mut state = self.state();
        if let Some(message) = &state.submit_rejection {
            return Err(NameServiceError::Transport(message.clone()));
        }
        if transaction.message.recent_blockhash != self.blockhash {
            return Err(NameServiceError::Transport("Blockhash not found".to_string()));
        }
        transaction
            .verify()
            .map_err(|e| NameServiceError::Transport(e.to_string()))?;
        let signature = transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| NameServiceError::Transport("transaction has no signatures".into()))?;
        debug!(%signature, "memory ledger accepted transaction");
        state.submitted.push(transaction.clone());
        Ok(signature)
    }
}
