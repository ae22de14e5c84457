use std::sync::Arc;

use dashmap::DashMap;
use economy_core::{AccountId, Price};
use economy_ports::Accounts;
use rust_decimal::Decimal;

/// In-memory ledger
///
/// Thread-safe balances keyed by account id, using DashMap.
/// Clones share the same balances.
#[derive(Debug)]
pub struct InMemoryAccounts {
    balances: Arc<DashMap<AccountId, Decimal>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self {
            balances: Arc::new(DashMap::new()),
        }
    }

    /// Create or overwrite an account balance
    pub fn set_balance(&self, account: AccountId, balance: Decimal) {
        self.balances.insert(account, balance);
    }

    /// Balance of an account, zero if it was never funded
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.balances
            .get(&account)
            .map(|b| *b.value())
            .unwrap_or_default()
    }

    /// All accounts sorted by id
    pub fn list(&self) -> Vec<(AccountId, Decimal)> {
        let mut accounts: Vec<(AccountId, Decimal)> = self
            .balances
            .iter()
            .map(|e| (*e.key(), *e.value()))
            .collect();
        accounts.sort_by_key(|(id, _)| *id);
        accounts
    }

    /// Sum of all balances
    pub fn total(&self) -> Decimal {
        self.balances.iter().map(|e| *e.value()).sum()
    }
}

impl Default for InMemoryAccounts {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryAccounts {
    fn clone(&self) -> Self {
        Self {
            balances: Arc::clone(&self.balances),
        }
    }
}

impl Accounts for InMemoryAccounts {
    fn credit(&self, account: AccountId, amount: Price) {
        *self.balances.entry(account).or_default() += amount;
    }

    fn debit_if_possible(&self, account: AccountId, amount: Price) -> bool {
        // the guard holds the shard lock across check and update
        let Some(mut balance) = self.balances.get_mut(&account) else {
            return amount <= Decimal::ZERO;
        };
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_creates_account() {
        let accounts = InMemoryAccounts::new();
        accounts.credit(7, dec!(15));
        accounts.credit(7, dec!(5));

        assert_eq!(accounts.balance(7), dec!(20));
    }

    #[test]
    fn test_debit_refuses_insufficient_funds() {
        let accounts = InMemoryAccounts::new();
        accounts.set_balance(1, dec!(10));

        assert!(!accounts.debit_if_possible(1, dec!(11)));
        assert_eq!(accounts.balance(1), dec!(10));

        assert!(accounts.debit_if_possible(1, dec!(10)));
        assert_eq!(accounts.balance(1), dec!(0));
    }

    #[test]
    fn test_unknown_account_cannot_pay() {
        let accounts = InMemoryAccounts::new();
        assert!(!accounts.debit_if_possible(99, dec!(1)));
        assert!(accounts.debit_if_possible(99, dec!(0)));
    }

    #[test]
    fn test_list_sorted_by_id() {
        let accounts = InMemoryAccounts::new();
        accounts.set_balance(3, dec!(30));
        accounts.set_balance(1, dec!(10));
        accounts.set_balance(2, dec!(20));

        assert_eq!(
            accounts.list(),
            vec![(1, dec!(10)), (2, dec!(20)), (3, dec!(30))]
        );
        assert_eq!(accounts.total(), dec!(60));
    }

    #[test]
    fn test_clones_share_balances() {
        let accounts = InMemoryAccounts::new();
        let other = accounts.clone();
        other.set_balance(1, dec!(5));

        assert_eq!(accounts.balance(1), dec!(5));
    }

    #[test]
    fn test_concurrent_debits_never_overdraw() {
        let accounts = InMemoryAccounts::new();
        accounts.set_balance(1, dec!(100));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let accounts = accounts.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|_| accounts.debit_if_possible(1, dec!(1)))
                        .count()
                })
            })
            .collect();
        let debited: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(debited, 100);
        assert_eq!(accounts.balance(1), dec!(0));
    }
}
