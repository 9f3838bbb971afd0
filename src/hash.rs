use sha2::{Digest, Sha256};

use crate::constants::{ACCOUNT_NAMESPACE, ANCHOR_DISCRIMINATOR, INSTRUCTION_NAMESPACE};

/// SHA-256 of the raw bytes.
pub fn digest(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Derivation seed for a name record: `SHA-256(lowercase(name))`.
pub fn name_seed(name: &str) -> [u8; 32] {
    digest(name.to_lowercase().as_bytes())
}

fn sighash(namespace: &str, ident: &str) -> [u8; ANCHOR_DISCRIMINATOR] {
    let preimage = format!("{namespace}:{ident}");
    let mut out = [0u8; ANCHOR_DISCRIMINATOR];
    out.copy_from_slice(&digest(preimage.as_bytes())[..ANCHOR_DISCRIMINATOR]);
    out
}

/// First eight bytes of `SHA-256("account:" + type_name)`.
pub fn account_discriminator(type_name: &str) -> [u8; ANCHOR_DISCRIMINATOR] {
    sighash(ACCOUNT_NAMESPACE, type_name)
}

/// First eight bytes of `SHA-256("global:" + ix_name)`.
pub fn instruction_discriminator(ix_name: &str) -> [u8; ANCHOR_DISCRIMINATOR] {
    sighash(INSTRUCTION_NAMESPACE, ix_name)
}
