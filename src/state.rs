use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{
    constants::{ANCHOR_DISCRIMINATOR, TOKEN_ACCOUNT_MINT_OFFSET, TOKEN_ACCOUNT_OWNER_OFFSET},
    error::{NameServiceError, Result},
    hash::account_discriminator,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRecord {
    pub name: String,
    pub owner: Pubkey,
    pub resolver: Pubkey,
    pub created_at: i64,
    pub expires_at: i64,
    pub initialized: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseRecord {
    pub name: String,
    pub set_at: i64,
}

/// The account schemas owned by the naming program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    NameRecord,
    ReverseRecord,
}

impl AccountKind {
    pub const ALL: [AccountKind; 2] = [AccountKind::NameRecord, AccountKind::ReverseRecord];

    pub fn type_name(self) -> &'static str {
        match self {
            AccountKind::NameRecord => "NameRecord",
            AccountKind::ReverseRecord => "ReverseRecord",
        }
    }

    pub fn discriminator(self) -> [u8; ANCHOR_DISCRIMINATOR] {
        account_discriminator(self.type_name())
    }

    pub fn from_discriminator(bytes: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| bytes == kind.discriminator().as_slice())
    }
}

/// Schema with an eight byte type prefix in front of its Borsh body.
pub trait ProgramAccount: BorshDeserialize + BorshSerialize {
    const KIND: AccountKind;

    /// Decodes account data, rejecting a foreign discriminator.
    ///
    /// Accounts are allocated at their maximum size, so bytes after the
    /// last field are padding and ignored.
    fn try_deserialize(data: &[u8]) -> Result<Self> {
        if data.len() < ANCHOR_DISCRIMINATOR {
            return Err(NameServiceError::MalformedAccount(format!(
                "{} bytes is shorter than the discriminator",
                data.len()
            )));
        }
        let (prefix, mut body) = data.split_at(ANCHOR_DISCRIMINATOR);
        if prefix != Self::KIND.discriminator().as_slice() {
            return Err(NameServiceError::DiscriminatorMismatch(Self::KIND.type_name()));
        }
        Ok(Self::deserialize(&mut body)?)
    }

    fn try_to_account_data(&self) -> Result<Vec<u8>> {
        let mut data = Self::KIND.discriminator().to_vec();
        self.serialize(&mut data)?;
        Ok(data)
    }
}

impl ProgramAccount for NameRecord {
    const KIND: AccountKind = AccountKind::NameRecord;
}

impl ProgramAccount for ReverseRecord {
    const KIND: AccountKind = AccountKind::ReverseRecord;
}

/// Any account of the naming program, resolved by its discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAccount {
    NameRecord(NameRecord),
    ReverseRecord(ReverseRecord),
}

impl DecodedAccount {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let prefix = data.get(..ANCHOR_DISCRIMINATOR).ok_or_else(|| {
            NameServiceError::MalformedAccount(format!(
                "{} bytes is shorter than the discriminator",
                data.len()
            ))
        })?;
        match AccountKind::from_discriminator(prefix) {
            Some(AccountKind::NameRecord) => {
                NameRecord::try_deserialize(data).map(Self::NameRecord)
            }
            Some(AccountKind::ReverseRecord) => {
                ReverseRecord::try_deserialize(data).map(Self::ReverseRecord)
            }
            None => Err(NameServiceError::UnknownAccount),
        }
    }
}

/// Leading `mint` and `owner` fields of an SPL token account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountHeader {
    pub mint: Pubkey,
    pub owner: Pubkey,
}

impl TokenAccountHeader {
    pub const LEN: usize = 64;

    pub fn unpack(data: &[u8]) -> Result<Self> {
        if data.len() < Self::LEN {
            return Err(NameServiceError::MalformedAccount(
                "token account shorter than 64 bytes".to_string(),
            ));
        }
        let read_key = |offset: usize| {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&data[offset..offset + 32]);
            Pubkey::new_from_array(bytes)
        };
        Ok(Self {
            mint: read_key(TOKEN_ACCOUNT_MINT_OFFSET),
            owner: read_key(TOKEN_ACCOUNT_OWNER_OFFSET),
        })
    }
}
