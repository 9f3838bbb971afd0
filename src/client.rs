use std::time::{SystemTime, UNIX_EPOCH};

use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_sdk::{signature::Signature, signer::signers::Signers, transaction::Transaction};
use tracing::{debug, info, warn};

use crate::{
    assembler::{Assembler, NameAction},
    availability::Availability,
    config::ClientConfig,
    error::{NameServiceError, Result},
    ledger::Ledger,
    pda::name_record_address,
    portfolio::{self, PortfolioEntry},
    state::{NameRecord, ProgramAccount},
    validation::{canonical_name, normalize_name, validate_name},
};

/// Current unix time in seconds.
pub fn unix_now() -> Result<i64> {
    unix_seconds(SystemTime::now())
}

fn unix_seconds(time: SystemTime) -> Result<i64> {
    let elapsed = time
        .duration_since(UNIX_EPOCH)
        .map_err(|_| NameServiceError::ClockBeforeEpoch)?;
    i64::try_from(elapsed.as_secs()).map_err(|_| NameServiceError::ClockBeforeEpoch)
}

pub struct NameServiceClient<L> {
    config: ClientConfig,
    ledger: L,
}

impl<L> NameServiceClient<L>
where
    L: Ledger,
{
    pub fn new(config: ClientConfig, ledger: L) -> Self {
        Self { config, ledger }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    fn assembler(&self) -> Assembler<'_, L> {
        Assembler::new(&self.config, &self.ledger)
    }

    /// Looks a name up, folding every failure into [`Availability::Error`].
    /// Input that is not a valid name yields [`Availability::Idle`].
    pub async fn lookup(&self, raw_name: &str, caller: Option<&Pubkey>, now: i64) -> Availability {
        let name = normalize_name(raw_name);
        if validate_name(&name).is_err() {
            return Availability::Idle;
        }
        match self.try_lookup(&name, caller, now).await {
            Ok(availability) => availability,
            Err(e) => {
                warn!(%name, "lookup failed: {e}");
                Availability::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    pub async fn try_lookup(
        &self,
        raw_name: &str,
        caller: Option<&Pubkey>,
        now: i64,
    ) -> Result<Availability> {
        let name = canonical_name(raw_name)?;
        let address = name_record_address(&name, &self.config.program_id)?.address;
        let record = match self.ledger.get_account(&address).await? {
            Some(account) => Some(NameRecord::try_deserialize(&account.data)?),
            None => None,
        };
        let availability = Availability::classify(record.as_ref(), now, caller);
        debug!(%name, %address, ?availability, "lookup");
        Ok(availability)
    }

    pub async fn portfolio(&self, owner: &Pubkey, now: i64) -> Result<Vec<PortfolioEntry>> {
        portfolio::scan(&self.ledger, &self.config.program_id, owner, now).await
    }

    pub async fn build(&self, authority: &Pubkey, action: NameAction) -> Result<Vec<Instruction>> {
        self.assembler().assemble(authority, action).await
    }

    pub async fn build_register(
        &self,
        payer: &Pubkey,
        name: &str,
        years: u8,
    ) -> Result<Vec<Instruction>> {
        self.assembler().assemble_register(payer, name, years).await
    }

    pub fn build_transfer(
        &self,
        owner: &Pubkey,
        name: &str,
        new_owner: Pubkey,
    ) -> Result<Instruction> {
        self.assembler().assemble_transfer(owner, name, new_owner)
    }

    pub fn build_set_resolver(
        &self,
        owner: &Pubkey,
        name: &str,
        new_resolver: Pubkey,
    ) -> Result<Instruction> {
        self.assembler().assemble_set_resolver(owner, name, new_resolver)
    }

    pub fn build_set_primary(&self, owner: &Pubkey, name: &str) -> Result<Instruction> {
        self.assembler().assemble_set_primary(owner, name)
    }

    /// Signs `instructions` against a fresh blockhash and submits them once.
    /// Failures are returned as reported; retrying is up to the caller.
    pub async fn send<S: Signers>(
        &self,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &S,
    ) -> Result<Signature> {
        let blockhash = self.ledger.get_latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(instructions, Some(payer));
        transaction
            .try_sign(signers, blockhash)
            .map_err(|e| NameServiceError::Transport(e.to_string()))?;
        match self.ledger.submit_transaction(&transaction).await {
            Ok(signature) => {
                info!(%signature, "transaction confirmed");
                Ok(signature)
            }
            Err(e) => {
                warn!("transaction rejected: {e}");
                Err(e)
            }
        }
    }

    /// Registers, extends or renews `name` for `years`.
    ///
    /// Availability is re-read right before submitting; a name held by
    /// someone else is refused without building anything.
    pub async fn register<S: Signers>(
        &self,
        payer: &Pubkey,
        signers: &S,
        name: &str,
        years: u8,
        now: i64,
    ) -> Result<Signature> {
        let name = canonical_name(name)?;
        let availability = self.try_lookup(&name, Some(payer), now).await?;
        if availability.is_locked_by_others() {
            return Err(NameServiceError::NameLocked);
        }
        let instructions = self.build_register(payer, &name, years).await?;
        self.send(&instructions, payer, signers).await
    }

    pub async fn execute<S: Signers>(
        &self,
        authority: &Pubkey,
        signers: &S,
        action: NameAction,
    ) -> Result<Signature> {
        if let NameAction::Register { name, years } = action {
            let now = unix_now()?;
            return self.register(authority, signers, &name, years, now).await;
        }
        let instructions = self.build(authority, action).await?;
        self.send(&instructions, authority, signers).await
    }
}
