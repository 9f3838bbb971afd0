//! Turns user actions into ordered instruction lists.
//!
//! Assembly only reads from the ledger. Every precondition is resolved
//! before the first instruction is built, so a failing check never leaves
//! a partial list behind.

use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use tracing::{debug, info};

use crate::{
    config::ClientConfig,
    error::{NameServiceError, Result},
    constants::{TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID},
    hash::name_seed,
    instruction::{self, RegisterAccounts},
    ledger::Ledger,
    pda::{associated_token_address, name_record_address, reverse_record_address},
    state::TokenAccountHeader,
    validation::{canonical_name, validate_years},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameAction {
    /// Registers a free name, or extends/renews one the payer holds.
    Register { name: String, years: u8 },
    Transfer { name: String, new_owner: Pubkey },
    SetResolver { name: String, new_resolver: Pubkey },
    SetPrimary { name: String },
}

pub struct Assembler<'a, L: ?Sized> {
    config: &'a ClientConfig,
    ledger: &'a L,
}

impl<'a, L> Assembler<'a, L>
where
    L: Ledger + ?Sized,
{
    pub fn new(config: &'a ClientConfig, ledger: &'a L) -> Self {
        Self { config, ledger }
    }

    /// `authority` pays for registration and signs owner-only actions.
    pub async fn assemble(
        &self,
        authority: &Pubkey,
        action: NameAction,
    ) -> Result<Vec<Instruction>> {
        let instructions = match action {
            NameAction::Register { name, years } => {
                self.assemble_register(authority, &name, years).await?
            }
            NameAction::Transfer { name, new_owner } => {
                vec![self.assemble_transfer(authority, &name, new_owner)?]
            }
            NameAction::SetResolver { name, new_resolver } => {
                vec![self.assemble_set_resolver(authority, &name, new_resolver)?]
            }
            NameAction::SetPrimary { name } => vec![self.assemble_set_primary(authority, &name)?],
        };
        debug!(count = instructions.len(), "assembled instructions");
        Ok(instructions)
    }

    pub async fn assemble_register(
        &self,
        payer: &Pubkey,
        raw_name: &str,
        years: u8,
    ) -> Result<Vec<Instruction>> {
        let name = canonical_name(raw_name)?;
        validate_years(years)?;

        let token_program = self.resolve_token_program().await?;
        let treasury_ata = self.require_treasury_ata(&token_program).await?;
        let payer_ata = associated_token_address(payer, &self.config.mint, &token_program)?;
        let payer_ata_exists = self.ledger.get_account(&payer_ata).await?.is_some();

        let seed = name_seed(&name);
        let name_record = name_record_address(&name, &self.config.program_id)?;

        let mut instructions = Vec::with_capacity(3);
        instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(
            self.config.compute_unit_limit,
        ));
        if !payer_ata_exists {
            debug!(%payer_ata, "payer token account missing, creating it");
            instructions.push(instruction::create_associated_token_account(
                payer,
                &payer_ata,
                payer,
                &self.config.mint,
                &token_program,
            ));
        }
        instructions.push(instruction::register(
            &self.config.program_id,
            &RegisterAccounts {
                payer: *payer,
                name_record: name_record.address,
                treasury: self.config.treasury,
                payer_ata,
                treasury_ata,
                mint: self.config.mint,
                token_program,
            },
            name,
            years,
            seed,
        )?);
        Ok(instructions)
    }

    pub fn assemble_transfer(
        &self,
        owner: &Pubkey,
        raw_name: &str,
        new_owner: Pubkey,
    ) -> Result<Instruction> {
        let name = canonical_name(raw_name)?;
        let name_record = name_record_address(&name, &self.config.program_id)?;
        instruction::transfer_name(
            &self.config.program_id,
            owner,
            &name_record.address,
            name,
            new_owner,
        )
    }

    pub fn assemble_set_resolver(
        &self,
        owner: &Pubkey,
        raw_name: &str,
        new_resolver: Pubkey,
    ) -> Result<Instruction> {
        let name = canonical_name(raw_name)?;
        let name_record = name_record_address(&name, &self.config.program_id)?;
        instruction::set_resolver(
            &self.config.program_id,
            owner,
            &name_record.address,
            name,
            new_resolver,
        )
    }

    pub fn assemble_set_primary(&self, owner: &Pubkey, raw_name: &str) -> Result<Instruction> {
        let name = canonical_name(raw_name)?;
        let name_record = name_record_address(&name, &self.config.program_id)?;
        let reverse_record = reverse_record_address(owner, &self.config.program_id)?;
        instruction::set_primary(
            &self.config.program_id,
            owner,
            &name_record.address,
            &reverse_record.address,
            name,
        )
    }

    /// Classic SPL token or Token-2022, whichever owns the mint account.
    async fn resolve_token_program(&self) -> Result<Pubkey> {
        let mint = &self.config.mint;
        let account = self.ledger.get_account(mint).await?.ok_or_else(|| {
            NameServiceError::NotFound(format!("Payment mint {mint} does not exist"))
        })?;
        if account.owner != TOKEN_PROGRAM_ID && account.owner != TOKEN_2022_PROGRAM_ID {
            return Err(NameServiceError::Configuration(format!(
                "Payment mint {mint} is owned by {}, not an SPL token program",
                account.owner
            )));
        }
        debug!(%mint, token_program = %account.owner, "resolved token program");
        Ok(account.owner)
    }

    /// The treasury's token account must already exist; it is never created here.
    async fn require_treasury_ata(&self, token_program: &Pubkey) -> Result<Pubkey> {
        let treasury = &self.config.treasury;
        let mint = &self.config.mint;
        let ata = associated_token_address(treasury, mint, token_program)?;
        let account = self.ledger.get_account(&ata).await?.ok_or_else(|| {
            NameServiceError::NotFound(format!(
                "Treasury CARV token account is missing ({ata}). \
                 Create it once on the treasury wallet."
            ))
        })?;
        let header = TokenAccountHeader::unpack(&account.data)?;
        if header.owner != *treasury {
            return Err(NameServiceError::Configuration(
                "Treasury token account owner mismatch".to_string(),
            ));
        }
        if header.mint != *mint {
            return Err(NameServiceError::Configuration(
                "Treasury token account mint mismatch".to_string(),
            ));
        }
        info!(%ata, "using existing treasury token account");
        Ok(ata)
    }
}
