use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

use crate::{
    constants::{ANCHOR_DISCRIMINATOR, ASSOCIATED_TOKEN_PROGRAM_ID},
    error::{NameServiceError, Result},
    hash::instruction_discriminator,
};

/// Instructions understood by the naming program. Data is the eight byte
/// `sha256("global:<ix_name>")` prefix followed by the Borsh arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameServiceInstruction {
    /// Register a name, or extend/renew one already held
    /// Accounts expected:
    /// 0. `[writable, signer]` The payer
    /// 1. `[writable]` The name record PDA
    /// 2. `[]` The treasury wallet
    /// 3. `[writable]` The payer's token account
    /// 4. `[writable]` The treasury's token account
    /// 5. `[]` The payment mint
    /// 6. `[]` The token program
    /// 7. `[]` The system program
    Register {
        name: String,
        years: u8,
        name_seed: [u8; 32],
    },

    /// Transfer ownership of a name
    /// Accounts expected:
    /// 0. `[writable, signer]` The current owner
    /// 1. `[writable]` The name record PDA
    TransferName { name: String, new_owner: Pubkey },

    /// Point a name at a new address
    /// Accounts expected:
    /// 0. `[writable, signer]` The owner
    /// 1. `[writable]` The name record PDA
    SetResolver { name: String, new_resolver: Pubkey },

    /// Make a name the owner's primary name
    /// Accounts expected:
    /// 0. `[writable, signer]` The owner
    /// 1. `[]` The name record PDA
    /// 2. `[writable]` The owner's reverse record PDA
    /// 3. `[]` The system program
    SetPrimary { name: String },
}

impl NameServiceInstruction {
    pub fn ix_name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::TransferName { .. } => "transfer_name",
            Self::SetResolver { .. } => "set_resolver",
            Self::SetPrimary { .. } => "set_primary",
        }
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut data = instruction_discriminator(self.ix_name()).to_vec();
        match self {
            Self::Register {
                name,
                years,
                name_seed,
            } => {
                name.serialize(&mut data)?;
                years.serialize(&mut data)?;
                name_seed.serialize(&mut data)?;
            }
            Self::TransferName { name, new_owner } => {
                name.serialize(&mut data)?;
                new_owner.serialize(&mut data)?;
            }
            Self::SetResolver { name, new_resolver } => {
                name.serialize(&mut data)?;
                new_resolver.serialize(&mut data)?;
            }
            Self::SetPrimary { name } => {
                name.serialize(&mut data)?;
            }
        }
        Ok(data)
    }

    pub fn unpack(input: &[u8]) -> Result<Self> {
        if input.len() < ANCHOR_DISCRIMINATOR {
            return Err(NameServiceError::InvalidInstructionData);
        }
        let (tag, mut rest) = input.split_at(ANCHOR_DISCRIMINATOR);
        let rest = &mut rest;
        let instruction = if tag == instruction_discriminator("register").as_slice() {
            Self::Register {
                name: read(rest)?,
                years: read(rest)?,
                name_seed: read(rest)?,
            }
        } else if tag == instruction_discriminator("transfer_name").as_slice() {
            Self::TransferName {
                name: read(rest)?,
                new_owner: read(rest)?,
            }
        } else if tag == instruction_discriminator("set_resolver").as_slice() {
            Self::SetResolver {
                name: read(rest)?,
                new_resolver: read(rest)?,
            }
        } else if tag == instruction_discriminator("set_primary").as_slice() {
            Self::SetPrimary { name: read(rest)? }
        } else {
            return Err(NameServiceError::InvalidInstructionData);
        };
        if !rest.is_empty() {
            return Err(NameServiceError::InvalidInstructionData);
        }
        Ok(instruction)
    }
}

fn read<T: BorshDeserialize>(buf: &mut &[u8]) -> Result<T> {
    T::deserialize(buf).map_err(|_| NameServiceError::InvalidInstructionData)
}

/// Accounts for [`NameServiceInstruction::Register`].
#[derive(Debug, Clone, Copy)]
pub struct RegisterAccounts {
    pub payer: Pubkey,
    pub name_record: Pubkey,
    pub treasury: Pubkey,
    pub payer_ata: Pubkey,
    pub treasury_ata: Pubkey,
    pub mint: Pubkey,
    pub token_program: Pubkey,
}

pub fn register(
    program_id: &Pubkey,
    accounts: &RegisterAccounts,
    name: String,
    years: u8,
    name_seed: [u8; 32],
) -> Result<Instruction> {
    let data = NameServiceInstruction::Register {
        name,
        years,
        name_seed,
    }
    .pack()?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.payer, true),
            AccountMeta::new(accounts.name_record, false),
            AccountMeta::new_readonly(accounts.treasury, false),
            AccountMeta::new(accounts.payer_ata, false),
            AccountMeta::new(accounts.treasury_ata, false),
            AccountMeta::new_readonly(accounts.mint, false),
            AccountMeta::new_readonly(accounts.token_program, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

pub fn transfer_name(
    program_id: &Pubkey,
    owner: &Pubkey,
    name_record: &Pubkey,
    name: String,
    new_owner: Pubkey,
) -> Result<Instruction> {
    let data = NameServiceInstruction::TransferName { name, new_owner }.pack()?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*name_record, false),
        ],
        data,
    })
}

pub fn set_resolver(
    program_id: &Pubkey,
    owner: &Pubkey,
    name_record: &Pubkey,
    name: String,
    new_resolver: Pubkey,
) -> Result<Instruction> {
    let data = NameServiceInstruction::SetResolver { name, new_resolver }.pack()?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*name_record, false),
        ],
        data,
    })
}

pub fn set_primary(
    program_id: &Pubkey,
    owner: &Pubkey,
    name_record: &Pubkey,
    reverse_record: &Pubkey,
    name: String,
) -> Result<Instruction> {
    let data = NameServiceInstruction::SetPrimary { name }.pack()?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(*name_record, false),
            AccountMeta::new(*reverse_record, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

/// Associated token program `Create` instruction.
pub fn create_associated_token_account(
    funder: &Pubkey,
    associated_account: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*funder, true),
            AccountMeta::new(*associated_account, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::name_seed;

    #[test]
    fn test_register_args_survive_pack() {
        let ix = NameServiceInstruction::Register {
            name: "alice".to_string(),
            years: 3,
            name_seed: name_seed("alice"),
        };
        let data = ix.pack().unwrap();
        assert_eq!(&data[..8], instruction_discriminator("register").as_slice());
        // discriminator + (4 + 5) + 1 + 32
        assert_eq!(data.len(), 8 + 9 + 1 + 32);
        assert_eq!(data[17], 3);
        assert_eq!(&data[18..], name_seed("alice").as_slice());
        assert_eq!(NameServiceInstruction::unpack(&data).unwrap(), ix);
    }

    #[test]
    fn test_owner_instructions_survive_pack() {
        let new_key = Pubkey::new_unique();
        for ix in [
            NameServiceInstruction::TransferName {
                name: "bob".to_string(),
                new_owner: new_key,
            },
            NameServiceInstruction::SetResolver {
                name: "bob".to_string(),
                new_resolver: new_key,
            },
            NameServiceInstruction::SetPrimary {
                name: "bob".to_string(),
            },
        ] {
            let data = ix.pack().unwrap();
            assert_eq!(NameServiceInstruction::unpack(&data).unwrap(), ix);
        }
    }

    #[test]
    fn test_unpack_rejects_garbage() {
        assert_eq!(
            NameServiceInstruction::unpack(&[1, 2, 3]),
            Err(NameServiceError::InvalidInstructionData)
        );
        assert_eq!(
            NameServiceInstruction::unpack(&[0u8; 16]),
            Err(NameServiceError::InvalidInstructionData)
        );

        let mut data = NameServiceInstruction::SetPrimary {
            name: "bob".to_string(),
        }
        .pack()
        .unwrap();
        data.push(0);
        assert_eq!(
            NameServiceInstruction::unpack(&data),
            Err(NameServiceError::InvalidInstructionData)
        );
    }

    #[test]
    fn test_set_primary_accounts() {
        let program_id = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let record = Pubkey::new_unique();
        let reverse = Pubkey::new_unique();
        let ix = set_primary(&program_id, &owner, &record, &reverse, "bob".to_string()).unwrap();
        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts.len(), 4);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, reverse);
        assert!(ix.accounts[2].is_writable);
        assert_eq!(ix.accounts[3].pubkey, system_program::id());
    }
}
