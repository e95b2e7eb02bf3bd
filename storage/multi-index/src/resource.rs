//! Payer authorization and resource accounting collaborators.
//!
//! The table engine never decides on its own who may pay for
//! storage, nor does it keep the accounts' balances. Both are
//! delegated to the execution layer through these traits:
//!
//! - [`PayerAuthority`] is asked on every `store` and `update`
//! - [`ResourceLedger`] is charged on every `store`, `update` and `remove`
//!
//! [`ActionPayers`] and [`RamUsage`] are the default implementations.

//---------------------------------------------------------------------------------------------------- Import
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{TableError, TableResult},
    types::AccountName,
};

//---------------------------------------------------------------------------------------------------- PayerAuthority
/// Decides which accounts may be charged by the executing contract.
pub trait PayerAuthority {
    /// Check that `receiver` may charge `payer`.
    ///
    /// Returns the account that will actually be charged;
    /// implementations may resolve placeholders such as `0`.
    ///
    /// # Errors
    /// Returns [`TableError::AuthorizationDenied`] if `payer` may not be charged.
    fn authorize(&self, receiver: AccountName, payer: AccountName) -> TableResult<AccountName>;
}

/// The accounts that signed for the current action.
///
/// Accepts the receiver, the sender and the origin.
/// Payer `0` means "the receiver pays".
///
/// ```rust
/// # use tabula_multi_index::{ActionPayers, PayerAuthority, TableError};
/// let payers = ActionPayers { sender: 2, origin: 3 };
///
/// assert_eq!(payers.authorize(1, 0).unwrap(), 1);
/// assert_eq!(payers.authorize(1, 2).unwrap(), 2);
/// assert!(matches!(
///     payers.authorize(1, 4),
///     Err(TableError::AuthorizationDenied { payer: 4 })
/// ));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionPayers {
    /// The account that sent the action.
    pub sender: AccountName,
    /// The account that signed the enclosing transaction.
    pub origin: AccountName,
}

impl PayerAuthority for ActionPayers {
    fn authorize(&self, receiver: AccountName, payer: AccountName) -> TableResult<AccountName> {
        if payer == 0 {
            return Ok(receiver);
        }

        if payer == receiver || payer == self.sender || payer == self.origin {
            Ok(payer)
        } else {
            Err(TableError::AuthorizationDenied { payer })
        }
    }
}

//---------------------------------------------------------------------------------------------------- ResourceLedger
/// Per-account storage usage.
pub trait ResourceLedger {
    /// Charge (`delta > 0`) or refund (`delta < 0`) `payer` for `delta` bytes.
    ///
    /// # Errors
    /// Implementations may reject the charge, e.g. when `payer`
    /// is over quota, or return [`TableError::ResourceUnderflow`]
    /// when a refund exceeds the account's usage.
    fn update_ram_usage(&mut self, payer: AccountName, delta: i64) -> TableResult<()>;
}

/// In-memory [`ResourceLedger`] keeping a running total per account.
///
/// ```rust
/// # use tabula_multi_index::{RamUsage, ResourceLedger};
/// let mut ram = RamUsage::new();
/// ram.update_ram_usage(1, 112).unwrap();
/// ram.update_ram_usage(1, -12).unwrap();
///
/// assert_eq!(ram.usage(1), 100);
/// assert_eq!(ram.usage(2), 0);
/// assert!(ram.update_ram_usage(2, -1).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RamUsage {
    /// Accounts with a non-zero usage.
    usage: BTreeMap<AccountName, u64>,
}

impl RamUsage {
    /// Create an empty [`RamUsage`].
    pub const fn new() -> Self {
        Self {
            usage: BTreeMap::new(),
        }
    }

    /// The bytes currently charged to `account`.
    pub fn usage(&self, account: AccountName) -> u64 {
        self.usage.get(&account).copied().unwrap_or(0)
    }

    /// Sum of all accounts' usage.
    pub fn total(&self) -> u64 {
        self.usage.values().sum()
    }

    /// Iterate over `(account, usage)` of all accounts with a non-zero usage.
    pub fn iter(&self) -> impl Iterator<Item = (AccountName, u64)> + '_ {
        self.usage.iter().map(|(account, usage)| (*account, *usage))
    }
}

impl ResourceLedger for RamUsage {
    fn update_ram_usage(&mut self, payer: AccountName, delta: i64) -> TableResult<()> {
        let current = self.usage(payer);

        let usage = if delta >= 0 {
            current.saturating_add(delta.unsigned_abs())
        } else {
            current
                .checked_sub(delta.unsigned_abs())
                .ok_or(TableError::ResourceUnderflow { payer })?
        };

        if usage == 0 {
            self.usage.remove(&payer);
        } else {
            self.usage.insert(payer, usage);
        }

        Ok(())
    }
}

//---------------------------------------------------------------------------------------------------- Tests
#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn action_payers() {
        let payers = ActionPayers {
            sender: 20,
            origin: 30,
        };

        for (payer, expected) in [(0, 10), (10, 10), (20, 20), (30, 30)] {
            assert_eq!(payers.authorize(10, payer).unwrap(), expected);
        }

        assert!(matches!(
            payers.authorize(10, 40),
            Err(TableError::AuthorizationDenied { payer: 40 })
        ));
    }

    #[test]
    fn ram_usage() {
        let mut ram = RamUsage::new();
        ram.update_ram_usage(1, 100).unwrap();
        ram.update_ram_usage(2, 50).unwrap();
        ram.update_ram_usage(1, 0).unwrap();
        assert_eq!(ram.total(), 150);
        assert_eq!(ram.iter().collect::<Vec<_>>(), vec![(1, 100), (2, 50)]);

        // Refunding everything forgets the account.
        ram.update_ram_usage(2, -50).unwrap();
        assert_eq!(ram.iter().collect::<Vec<_>>(), vec![(1, 100)]);

        assert!(matches!(
            ram.update_ram_usage(1, -101),
            Err(TableError::ResourceUnderflow { payer: 1 })
        ));
        // A failed refund changes nothing.
        assert_eq!(ram.usage(1), 100);
    }
}
