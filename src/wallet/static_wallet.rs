//! In-process wallet with a fixed account list
//!
//! Stands in for a browser wallet when running from the command line: the
//! account is supplied up front and access is always granted.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use super::{ChainParams, WalletError, WalletProvider};
use crate::contract::Address;

pub struct StaticWallet {
    accounts: Vec<Address>,
    state: Mutex<ChainState>,
}

struct ChainState {
    current: u64,
    known: HashSet<u64>,
}

impl StaticWallet {
    /// Wallet holding `accounts`, sitting on `chain_id`
    pub fn new(accounts: Vec<Address>, chain_id: u64) -> Self {
        Self {
            accounts,
            state: Mutex::new(ChainState {
                current: chain_id,
                known: HashSet::from([chain_id]),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ChainState>, WalletError> {
        self.state
            .lock()
            .map_err(|_| WalletError::Request("wallet state poisoned".to_string()))
    }
}

#[async_trait]
impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        if self.accounts.is_empty() {
            return Err(WalletError::Rejected);
        }
        Ok(self.accounts.clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.lock()?.current)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let mut state = self.lock()?;
        if !state.known.contains(&chain_id) {
            return Err(WalletError::UnknownChain(chain_id));
        }
        state.current = chain_id;
        Ok(())
    }

    /// Registers and selects the chain, as browser wallets do after an add
    async fn add_chain(&self, params: &ChainParams) -> Result<(), WalletError> {
        let chain_id = params
            .numeric_chain_id()
            .ok_or_else(|| WalletError::Request(format!("invalid chain id {}", params.chain_id)))?;

        let mut state = self.lock()?;
        state.known.insert(chain_id);
        state.current = chain_id;
        Ok(())
    }
}
