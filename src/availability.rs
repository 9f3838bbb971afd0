//! Classifies a name against wall-clock time.
//!
//! A registered name is active until `expires_at` (inclusive), then sits in
//! a seven day grace window where only its owner may renew it, then expires
//! and becomes open to anyone.

use solana_program::pubkey::Pubkey;

use crate::{constants::GRACE_PERIOD_SECONDS, state::NameRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Active,
    Grace,
    Expired,
}

impl ExpiryStatus {
    pub fn at(expires_at: i64, now: i64) -> Self {
        if now <= expires_at {
            ExpiryStatus::Active
        } else if now <= grace_ends_at(expires_at) {
            ExpiryStatus::Grace
        } else {
            ExpiryStatus::Expired
        }
    }
}

pub fn grace_ends_at(expires_at: i64) -> i64 {
    expires_at.saturating_add(GRACE_PERIOD_SECONDS)
}

/// Lookup state of a single name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Idle,
    Checking,
    Available,
    Taken {
        owner: Pubkey,
        resolver: Pubkey,
        expires_at: i64,
        is_yours: bool,
    },
    Grace {
        owner: Pubkey,
        resolver: Pubkey,
        expires_at: i64,
        grace_ends_at: i64,
        is_yours: bool,
    },
    Expired {
        owner: Pubkey,
        resolver: Pubkey,
        expires_at: i64,
    },
    Error {
        message: String,
    },
}

/// What a register submission would do for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAction {
    Register,
    Extend,
    Renew,
}

impl Availability {
    /// Classifies the account stored at a name's address. `None` means no
    /// account exists there.
    pub fn classify(record: Option<&NameRecord>, now: i64, caller: Option<&Pubkey>) -> Self {
        let record = match record {
            Some(record) if record.initialized => record,
            _ => return Availability::Available,
        };
        let is_yours = caller == Some(&record.owner);
        match ExpiryStatus::at(record.expires_at, now) {
            ExpiryStatus::Active => Availability::Taken {
                owner: record.owner,
                resolver: record.resolver,
                expires_at: record.expires_at,
                is_yours,
            },
            ExpiryStatus::Grace => Availability::Grace {
                owner: record.owner,
                resolver: record.resolver,
                expires_at: record.expires_at,
                grace_ends_at: grace_ends_at(record.expires_at),
                is_yours,
            },
            ExpiryStatus::Expired => Availability::Expired {
                owner: record.owner,
                resolver: record.resolver,
                expires_at: record.expires_at,
            },
        }
    }

    pub fn is_yours(&self) -> bool {
        matches!(
            self,
            Availability::Taken { is_yours: true, .. } | Availability::Grace { is_yours: true, .. }
        )
    }

    /// Taken or in grace under someone else's key.
    pub fn is_locked_by_others(&self) -> bool {
        matches!(
            self,
            Availability::Taken {
                is_yours: false,
                ..
            } | Availability::Grace {
                is_yours: false,
                ..
            }
        )
    }

    /// `None` while the state does not permit submitting.
    pub fn register_action(&self) -> Option<RegisterAction> {
        match self {
            Availability::Available | Availability::Expired { .. } => {
                Some(RegisterAction::Register)
            }
            Availability::Taken { is_yours: true, .. } => Some(RegisterAction::Extend),
            Availability::Grace { is_yours: true, .. } => Some(RegisterAction::Renew),
            _ => None,
        }
    }

    /// Countdown until the grace window closes, for grace states.
    pub fn grace_countdown(&self, now: i64) -> Option<String> {
        match self {
            Availability::Grace { grace_ends_at, .. } => {
                Some(format_remaining(grace_ends_at.saturating_sub(now)))
            }
            _ => None,
        }
    }
}

/// `90061` -> `"1d 1h 1m 1s remaining"`. Negative spans clamp to zero.
pub fn format_remaining(seconds: i64) -> String {
    let remaining = seconds.max(0);
    let days = remaining / 86_400;
    let hours = (remaining % 86_400) / 3_600;
    let minutes = (remaining % 3_600) / 60;
    let secs = remaining % 60;
    format!("{days}d {hours}h {minutes}m {secs}s remaining")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPIRES_AT: i64 = 1_800_000_000;

    fn record(owner: Pubkey) -> NameRecord {
        NameRecord {
            name: "alice".to_string(),
            owner,
            resolver: owner,
            created_at: EXPIRES_AT - 31_536_000,
            expires_at: EXPIRES_AT,
            initialized: true,
        }
    }

    #[test]
    fn test_missing_or_uninitialized_is_available() {
        assert_eq!(Availability::classify(None, 0, None), Availability::Available);
        let mut stale = record(Pubkey::new_unique());
        stale.initialized = false;
        assert_eq!(
            Availability::classify(Some(&stale), EXPIRES_AT - 10, None),
            Availability::Available
        );
    }

    #[test]
    fn test_boundaries() {
        let owner = Pubkey::new_unique();
        let record = record(owner);
        let at = |now| Availability::classify(Some(&record), now, Some(&owner));

        assert!(matches!(at(EXPIRES_AT - 1), Availability::Taken { .. }));
        assert!(matches!(at(EXPIRES_AT), Availability::Taken { .. }));
        assert!(matches!(at(EXPIRES_AT + 1), Availability::Grace { .. }));
        assert!(matches!(
            at(EXPIRES_AT + GRACE_PERIOD_SECONDS),
            Availability::Grace { .. }
        ));
        assert!(matches!(
            at(EXPIRES_AT + GRACE_PERIOD_SECONDS + 1),
            Availability::Expired { .. }
        ));
    }

    #[test]
    fn test_grace_ownership() {
        let owner = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let record = record(owner);
        let now = EXPIRES_AT + GRACE_PERIOD_SECONDS - 1;

        let mine = Availability::classify(Some(&record), now, Some(&owner));
        assert_eq!(
            mine,
            Availability::Grace {
                owner,
                resolver: owner,
                expires_at: EXPIRES_AT,
                grace_ends_at: EXPIRES_AT + GRACE_PERIOD_SECONDS,
                is_yours: true,
            }
        );
        assert_eq!(mine.register_action(), Some(RegisterAction::Renew));
        assert_eq!(mine.grace_countdown(now).as_deref(), Some("0d 0h 0m 1s remaining"));

        let theirs = Availability::classify(Some(&record), now, Some(&stranger));
        assert!(theirs.is_locked_by_others());
        assert_eq!(theirs.register_action(), None);

        let anonymous = Availability::classify(Some(&record), now, None);
        assert!(!anonymous.is_yours());
    }

    #[test]
    fn test_classification_is_total_and_idempotent() {
        let owner = Pubkey::new_unique();
        let record = record(owner);
        let offsets = [
            -100,
            -1,
            0,
            1,
            GRACE_PERIOD_SECONDS - 1,
            GRACE_PERIOD_SECONDS,
            GRACE_PERIOD_SECONDS + 1,
        ];
        for offset in offsets {
            let now = EXPIRES_AT + offset;
            let first = Availability::classify(Some(&record), now, Some(&owner));
            let second = Availability::classify(Some(&record), now, Some(&owner));
            assert_eq!(first, second);
            assert!(matches!(
                first,
                Availability::Taken { .. }
                    | Availability::Grace { .. }
                    | Availability::Expired { .. }
            ));
        }
    }

    #[test]
    fn test_register_actions() {
        let owner = Pubkey::new_unique();
        let record = record(owner);
        assert_eq!(
            Availability::Available.register_action(),
            Some(RegisterAction::Register)
        );
        assert_eq!(
            Availability::classify(Some(&record), EXPIRES_AT, Some(&owner)).register_action(),
            Some(RegisterAction::Extend)
        );
        assert_eq!(
            Availability::classify(Some(&record), EXPIRES_AT + GRACE_PERIOD_SECONDS + 1, None)
                .register_action(),
            Some(RegisterAction::Register)
        );
        assert_eq!(
            Availability::Error {
                message: "boom".to_string()
            }
            .register_action(),
            None
        );
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(90_061), "1d 1h 1m 1s remaining");
        assert_eq!(format_remaining(-5), "0d 0h 0m 0s remaining");
    }
}
