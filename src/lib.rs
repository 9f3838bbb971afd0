//! Client for the CARV Name Service naming program.
//!
//! Derives name and reverse record addresses, decodes the program's
//! accounts, classifies names against the clock and assembles the
//! instructions for register, renew, transfer, set-resolver and
//! set-primary. Network access goes through the [`Ledger`] trait.

pub mod assembler;
pub mod availability;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod hash;
pub mod instruction;
pub mod ledger;
pub mod pda;
pub mod portfolio;
pub mod session;
pub mod state;
pub mod validation;

pub use assembler::{Assembler, NameAction};
pub use availability::{Availability, ExpiryStatus, RegisterAction};
pub use client::{unix_now, NameServiceClient};
pub use config::ClientConfig;
pub use error::{NameServiceError, Result};
pub use ledger::{Ledger, MemoryLedger};
pub use pda::DerivedAddress;
pub use portfolio::PortfolioEntry;
pub use session::{Event, PortfolioState, Session};
pub use state::{AccountKind, DecodedAccount, NameRecord, ProgramAccount, ReverseRecord};
