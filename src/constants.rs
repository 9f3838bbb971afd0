//! Protocol constants shared with the on-chain naming program.
//!
//! Seeds, discriminator preimages and time windows must match the program
//! byte for byte, otherwise derived addresses and decoded accounts diverge.

use solana_program::{pubkey, pubkey::Pubkey};

pub const ANCHOR_DISCRIMINATOR: usize = 8;

// PDA Seeds
pub const NAME_RECORD_SEED: &[u8] = b"cns";
pub const REVERSE_RECORD_SEED: &[u8] = b"reverse";

// Discriminator preimage namespaces
pub const ACCOUNT_NAMESPACE: &str = "account";
pub const INSTRUCTION_NAMESPACE: &str = "global";

/// Seven days, during which only the previous owner may renew.
pub const GRACE_PERIOD_SECONDS: i64 = 7 * 24 * 60 * 60;

pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 64;

pub const MIN_REGISTER_YEARS: u8 = 1;
pub const MAX_REGISTER_YEARS: u8 = 10;

pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 200_000;
pub const DEFAULT_NAME_SUFFIX: &str = ".carv";

pub const CARV_MINT: Pubkey = pubkey!("D7WVEw9Pkf4dfCCE3fwGikRCCTvm9ipqTYPHRENLiw3s");

pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const TOKEN_2022_PROGRAM_ID: Pubkey = pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

// SPL token account layout: mint, then owner
pub const TOKEN_ACCOUNT_MINT_OFFSET: usize = 0;
pub const TOKEN_ACCOUNT_OWNER_OFFSET: usize = 32;
