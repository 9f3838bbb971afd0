//! Client configuration.
//!
//! Program and treasury identities have no defaults: a client without them
//! refuses to run rather than talk to the wrong program.

use std::str::FromStr;

use serde::Deserialize;
use solana_program::pubkey::Pubkey;

use crate::{
    constants::{CARV_MINT, DEFAULT_COMPUTE_UNIT_LIMIT},
    error::{NameServiceError, Result},
};

pub const ENV_PROGRAM_ID: &str = "CNS_PROGRAM_ID";
pub const ENV_TREASURY: &str = "CNS_TREASURY";
pub const ENV_MINT: &str = "CNS_MINT";
pub const ENV_COMPUTE_UNIT_LIMIT: &str = "CNS_COMPUTE_UNIT_LIMIT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub program_id: Pubkey,
    pub treasury: Pubkey,
    /// Payment mint. Its token program (classic SPL or Token-2022) is read
    /// from the mint account's owner at assembly time.
    pub mint: Pubkey,
    pub compute_unit_limit: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    program_id: Option<String>,
    treasury: Option<String>,
    mint: Option<String>,
    compute_unit_limit: Option<u32>,
}

impl ClientConfig {
    pub fn new(program_id: Pubkey, treasury: Pubkey) -> Self {
        Self {
            program_id,
            treasury,
            mint: CARV_MINT,
            compute_unit_limit: DEFAULT_COMPUTE_UNIT_LIMIT,
        }
    }

    pub fn with_mint(mut self, mint: Pubkey) -> Self {
        self.mint = mint;
        self
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(input)
            .map_err(|e| NameServiceError::Configuration(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `CNS_*` variables supplied by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let compute_unit_limit = lookup(ENV_COMPUTE_UNIT_LIMIT)
            .map(|value| {
                value.trim().parse::<u32>().map_err(|_| {
                    NameServiceError::Configuration(format!(
                        "{ENV_COMPUTE_UNIT_LIMIT} is not a number: {value}"
                    ))
                })
            })
            .transpose()?;
        Self::from_raw(RawConfig {
            program_id: lookup(ENV_PROGRAM_ID),
            treasury: lookup(ENV_TREASURY),
            mint: lookup(ENV_MINT),
            compute_unit_limit,
        })
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let program_id = required_key("program_id", raw.program_id)?;
        let treasury = required_key("treasury", raw.treasury)?;
        let mut config = Self::new(program_id, treasury);
        if let Some(mint) = raw.mint {
            config.mint = parse_key("mint", &mint)?;
        }
        if let Some(limit) = raw.compute_unit_limit {
            if limit == 0 {
                return Err(NameServiceError::Configuration(
                    "compute_unit_limit must be positive".to_string(),
                ));
            }
            config.compute_unit_limit = limit;
        }
        Ok(config)
    }
}

fn required_key(field: &str, value: Option<String>) -> Result<Pubkey> {
    let value = value.ok_or_else(|| {
        NameServiceError::Configuration(format!("missing {field}"))
    })?;
    parse_key(field, &value)
}

fn parse_key(field: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim()).map_err(|e| {
        NameServiceError::Configuration(format!("invalid {field} `{value}`: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_toml_defaults() {
        let program_id = Pubkey::new_unique();
        let treasury = Pubkey::new_unique();
        let config = ClientConfig::from_toml_str(&format!(
            "program_id = \"{program_id}\"\ntreasury = \"{treasury}\"\n"
        ))
        .unwrap();
        assert_eq!(config, ClientConfig::new(program_id, treasury));
        assert_eq!(config.mint, CARV_MINT);
        assert_eq!(config.compute_unit_limit, 200_000);
    }

    #[test]
    fn test_from_toml_overrides() {
        let mint = Pubkey::new_unique();
        let config = ClientConfig::from_toml_str(&format!(
            "program_id = \"{}\"\ntreasury = \"{}\"\nmint = \"{mint}\"\n\
             compute_unit_limit = 300000\n",
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        ))
        .unwrap();
        assert_eq!(config.mint, mint);
        assert_eq!(config.compute_unit_limit, 300_000);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = ClientConfig::from_toml_str(&format!(
            "program_id = \"{}\"\ntreasury = \"{}\"\nnetwork = \"devnet\"\n",
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        ))
        .unwrap_err();
        assert!(matches!(err, NameServiceError::Configuration(_)));
    }

    #[test]
    fn test_placeholder_identity_is_rejected() {
        let err = ClientConfig::from_toml_str(&format!(
            "program_id = \"REPLACE_WITH_YOUR_DEPLOYED_PROGRAM_ID\"\ntreasury = \"{}\"\n",
            Pubkey::new_unique()
        ))
        .unwrap_err();
        assert!(matches!(err, NameServiceError::Configuration(_)));
    }

    #[test]
    fn test_missing_treasury_is_rejected() {
        let err = ClientConfig::from_toml_str(&format!(
            "program_id = \"{}\"\n",
            Pubkey::new_unique()
        ))
        .unwrap_err();
        assert_eq!(
            err,
            NameServiceError::Configuration("missing treasury".to_string())
        );
    }

    #[test]
    fn test_from_lookup() {
        let program_id = Pubkey::new_unique();
        let treasury = Pubkey::new_unique();
        let vars: HashMap<&str, String> = HashMap::from([
            (ENV_PROGRAM_ID, program_id.to_string()),
            (ENV_TREASURY, treasury.to_string()),
            (ENV_COMPUTE_UNIT_LIMIT, "150000".to_string()),
        ]);
        let config = ClientConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.program_id, program_id);
        assert_eq!(config.treasury, treasury);
        assert_eq!(config.compute_unit_limit, 150_000);

        let vars: HashMap<&str, String> = HashMap::from([
            (ENV_PROGRAM_ID, program_id.to_string()),
            (ENV_TREASURY, treasury.to_string()),
            (ENV_COMPUTE_UNIT_LIMIT, "lots".to_string()),
        ]);
        assert!(ClientConfig::from_lookup(|key| vars.get(key).cloned()).is_err());
    }
}
