//! Per-session lookup and portfolio state as a pure transition function.
//!
//! Each new request takes a fresh token; a result carrying an older token
//! arrived after its query was superseded and is dropped. A request is
//! superseded when either the name or the connected wallet changes.

use solana_program::pubkey::Pubkey;

use crate::{
    availability::Availability,
    error::NameServiceError,
    portfolio::PortfolioEntry,
    validation::{normalize_name, validate_name},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PortfolioState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<PortfolioEntry>),
    Failed(NameServiceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user edited the name being looked up.
    QueryChanged(String),
    /// A wallet connected, disconnected or switched accounts.
    CallerChanged(Option<Pubkey>),
    LookupFinished {
        token: u64,
        availability: Availability,
    },
    PortfolioRequested,
    PortfolioFinished {
        token: u64,
        result: Result<Vec<PortfolioEntry>, NameServiceError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    query: String,
    caller: Option<Pubkey>,
    lookup_token: u64,
    availability: Availability,
    portfolio_token: u64,
    portfolio: PortfolioState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn caller(&self) -> Option<&Pubkey> {
        self.caller.as_ref()
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn portfolio(&self) -> &PortfolioState {
        &self.portfolio
    }

    /// Token and name of the lookup the caller should run, if any.
    pub fn pending_lookup(&self) -> Option<(u64, &str)> {
        match self.availability {
            Availability::Checking => Some((self.lookup_token, self.query.as_str())),
            _ => None,
        }
    }

    pub fn pending_portfolio(&self) -> Option<u64> {
        match self.portfolio {
            PortfolioState::Loading => Some(self.portfolio_token),
            _ => None,
        }
    }

    pub fn apply(mut self, event: Event) -> Self {
        match event {
            Event::QueryChanged(raw) => {
                let query = normalize_name(&raw);
                let settled = !matches!(
                    self.availability,
                    Availability::Idle | Availability::Error { .. }
                );
                if query == self.query && settled {
                    return self;
                }
                self.query = query;
                self.restart_lookup();
            }
            Event::CallerChanged(caller) => {
                if caller == self.caller {
                    return self;
                }
                self.caller = caller;
                self.restart_lookup();
                self.portfolio_token += 1;
                self.portfolio = match self.caller {
                    Some(_) => PortfolioState::Loading,
                    None => PortfolioState::Idle,
                };
            }
            Event::LookupFinished {
                token,
                availability,
            } => {
                if token == self.lookup_token && self.availability == Availability::Checking {
                    self.availability = availability;
                }
            }
            Event::PortfolioRequested => {
                self.portfolio_token += 1;
                self.portfolio = PortfolioState::Loading;
            }
            Event::PortfolioFinished { token, result } => {
                if token == self.portfolio_token && self.portfolio == PortfolioState::Loading {
                    self.portfolio = match result {
                        Ok(entries) => PortfolioState::Loaded(entries),
                        Err(e) => PortfolioState::Failed(e),
                    };
                }
            }
        }
        self
    }

    fn restart_lookup(&mut self) {
        self.lookup_token += 1;
        self.availability = match validate_name(&self.query) {
            Ok(()) => Availability::Checking,
            Err(_) => Availability::Idle,
        };
    }
}
