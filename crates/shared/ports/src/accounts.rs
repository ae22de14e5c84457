use economy_core::{AccountId, Price};

/// Port for the ledger the engine settles against
///
/// The engine never owns balances; it only moves funds through this
/// capability. Implementations must be safe to call from many threads.
pub trait Accounts: Send + Sync {
    /// Add funds to an account. Must not fail observably.
    fn credit(&self, account: AccountId, amount: Price);

    /// Atomically remove funds if the balance covers them.
    ///
    /// Returns false and leaves the balance unchanged otherwise.
    fn debit_if_possible(&self, account: AccountId, amount: Price) -> bool;
}

impl<T: Accounts + ?Sized> Accounts for std::sync::Arc<T> {
    fn credit(&self, account: AccountId, amount: Price) {
        (**self).credit(account, amount)
    }

    fn debit_if_possible(&self, account: AccountId, amount: Price) -> bool {
        (**self).debit_if_possible(account, amount)
    }
}
