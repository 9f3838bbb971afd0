//! Program derived addresses used by the name service.
//!
//! Every address goes through [`find_program_address`], which walks bump
//! seeds from 255 downward and keeps the first candidate that is off the
//! ed25519 curve, the same search the runtime performs on-chain.

use solana_program::pubkey::Pubkey;

use crate::{
    constants::{ASSOCIATED_TOKEN_PROGRAM_ID, NAME_RECORD_SEED, REVERSE_RECORD_SEED},
    error::{NameServiceError, Result},
    hash::name_seed,
};

/// Address and bump seed of a program derived account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<DerivedAddress> {
    let (address, bump) = Pubkey::try_find_program_address(seeds, program_id)
        .ok_or(NameServiceError::PdaNotFound)?;
    Ok(DerivedAddress { address, bump })
}

/// Name record PDA: `["cns", sha256(lowercase(name))]`.
pub fn name_record_address(name: &str, program_id: &Pubkey) -> Result<DerivedAddress> {
    let seed = name_seed(name);
    find_program_address(&[NAME_RECORD_SEED, &seed], program_id)
}

/// Reverse record PDA: `["reverse", owner]`.
pub fn reverse_record_address(owner: &Pubkey, program_id: &Pubkey) -> Result<DerivedAddress> {
    find_program_address(&[REVERSE_RECORD_SEED, owner.as_ref()], program_id)
}

/// Associated token account of `owner` for `mint` under `token_program`.
pub fn associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey> {
    find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|derived| derived.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CARV_MINT, TOKEN_PROGRAM_ID};

    #[test]
    fn test_name_record_address_is_deterministic() {
        let program_id = Pubkey::new_unique();
        let first = name_record_address("alice", &program_id).unwrap();
        let second = name_record_address("alice", &program_id).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, name_record_address("ALICE", &program_id).unwrap());
    }

    #[test]
    fn test_name_record_address_is_off_curve() {
        let program_id = Pubkey::new_unique();
        let derived = name_record_address("alice", &program_id).unwrap();
        assert!(!derived.address.is_on_curve());

        let seed = name_seed("alice");
        let recreated =
            Pubkey::create_program_address(&[NAME_RECORD_SEED, &seed, &[derived.bump]], &program_id)
                .unwrap();
        assert_eq!(recreated, derived.address);
    }

    #[test]
    fn test_distinct_names_distinct_addresses() {
        let program_id = Pubkey::new_unique();
        let names = ["abc", "abd", "alice", "bob", "carv-name", "x-1"];
        let mut seen = std::collections::HashSet::new();
        for name in names {
            assert!(seen.insert(name_record_address(name, &program_id).unwrap().address));
        }
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let program_id = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let reverse = reverse_record_address(&owner, &program_id).unwrap();
        let (expected, bump) =
            Pubkey::find_program_address(&[REVERSE_RECORD_SEED, owner.as_ref()], &program_id);
        assert_eq!(reverse, DerivedAddress { address: expected, bump });
        assert_ne!(
            reverse.address,
            find_program_address(&[NAME_RECORD_SEED, owner.as_ref()], &program_id)
                .unwrap()
                .address
        );
    }

    #[test]
    fn test_associated_token_address_matches_manual_derivation() {
        let owner = Pubkey::new_unique();
        let ata = associated_token_address(&owner, &CARV_MINT, &TOKEN_PROGRAM_ID).unwrap();
        let (expected, _) = Pubkey::find_program_address(
            &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), CARV_MINT.as_ref()],
            &ASSOCIATED_TOKEN_PROGRAM_ID,
        );
        assert_eq!(ata, expected);
    }
}
