use solana_program::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::{
    availability::ExpiryStatus,
    error::Result,
    ledger::Ledger,
    pda::reverse_record_address,
    state::{AccountKind, DecodedAccount, ProgramAccount, ReverseRecord},
};

/// One name held by the scanned owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioEntry {
    pub address: Pubkey,
    pub name: String,
    pub resolver: Pubkey,
    pub expires_at: i64,
    pub status: ExpiryStatus,
    pub is_primary: bool,
}

/// Every initialized name record owned by `owner`, soonest expiry first.
///
/// Records that fail to decode are skipped; a failed bulk query fails the scan.
pub async fn scan<L>(
    ledger: &L,
    program_id: &Pubkey,
    owner: &Pubkey,
    now: i64,
) -> Result<Vec<PortfolioEntry>>
where
    L: Ledger + ?Sized,
{
    let discriminator = AccountKind::NameRecord.discriminator();
    let accounts = ledger
        .get_program_accounts(program_id, &discriminator)
        .await?;
    let primary = primary_name(ledger, program_id, owner).await?;

    let mut entries = Vec::new();
    for (address, data) in accounts {
        let record = match DecodedAccount::decode(&data) {
            Ok(DecodedAccount::NameRecord(record)) => record,
            Ok(other) => {
                warn!(%address, ?other, "skipping account that is not a name record");
                continue;
            }
            Err(e) => {
                warn!(%address, "skipping undecodable name record: {e}");
                continue;
            }
        };
        if !record.initialized || record.owner != *owner {
            continue;
        }
        let is_primary = primary.as_deref() == Some(record.name.as_str());
        entries.push(PortfolioEntry {
            address,
            status: ExpiryStatus::at(record.expires_at, now),
            name: record.name,
            resolver: record.resolver,
            expires_at: record.expires_at,
            is_primary,
        });
    }
    entries.sort_by(|a, b| {
        a.expires_at
            .cmp(&b.expires_at)
            .then_with(|| a.name.cmp(&b.name))
    });
    debug!(%owner, count = entries.len(), "portfolio scan complete");
    Ok(entries)
}

async fn primary_name<L>(ledger: &L, program_id: &Pubkey, owner: &Pubkey) -> Result<Option<String>>
where
    L: Ledger + ?Sized,
{
    let reverse = reverse_record_address(owner, program_id)?;
    let Some(account) = ledger.get_account(&reverse.address).await? else {
        return Ok(None);
    };
    match ReverseRecord::try_deserialize(&account.data) {
        Ok(record) => Ok(Some(record.name)),
        Err(e) => {
            warn!(address = %reverse.address, "ignoring undecodable reverse record: {e}");
            Ok(None)
        }
    }
}
