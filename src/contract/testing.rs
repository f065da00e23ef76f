//! Scripted in-memory contract used by loader and dashboard tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::{Address, ContractReader, FixedPoint, NavEntry, PositionInfo, RpcError, RpcResult, WAD};

#[derive(Debug, Clone, Default)]
pub struct MockPosition {
    pub whitelisted: bool,
    pub shares: u128,
    pub value: u128,
    pub initial_investment: u128,
    pub return_bps: i128,
    pub investment_date: u64,
}

impl MockPosition {
    pub fn whitelisted(shares: u128, value: u128, initial: u128, return_bps: i128) -> Self {
        Self {
            whitelisted: true,
            shares,
            value,
            initial_investment: initial,
            return_bps,
            investment_date: 1_690_000_000,
        }
    }
}

pub struct MockReader {
    pub name: String,
    pub description: String,
    pub nav: u128,
    pub supply: u128,
    pub inception: u64,
    pub history: Vec<(u64, u128)>,
    pub positions: HashMap<Address, MockPosition>,
    /// Method names that fail with a node error
    failing: Mutex<HashSet<&'static str>>,
    /// Per-address latency for position reads
    delays: HashMap<Address, Duration>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockReader {
    fn default() -> Self {
        Self {
            name: "Meridian Growth Fund".to_string(),
            description: "Diversified digital asset fund".to_string(),
            nav: 1_040_000_000_000_000_000,
            supply: 250_000 * WAD,
            inception: 1_672_531_200,
            history: vec![
                (1_672_531_200, WAD),
                (1_675_209_600, 1_010_000_000_000_000_000),
                (1_677_628_800, 1_040_000_000_000_000_000),
            ],
            positions: HashMap::new(),
            failing: Mutex::new(HashSet::new()),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockReader {
    pub fn with_position(mut self, address: Address, position: MockPosition) -> Self {
        self.positions.insert(address, position);
        self
    }

    pub fn with_history(mut self, history: Vec<(u64, u128)>) -> Self {
        self.history = history;
        self
    }

    pub fn with_delay(mut self, address: Address, delay: Duration) -> Self {
        self.delays.insert(address, delay);
        self
    }

    pub fn failing(self, method: &'static str) -> Self {
        self.fail(method);
        self
    }

    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.failing.lock().unwrap().remove(method);
    }

    /// Number of calls made to `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == method)
            .count()
    }

    fn record(&self, method: &'static str) -> RpcResult<()> {
        self.calls.lock().unwrap().push(method.to_string());
        if self.failing.lock().unwrap().contains(method) {
            return Err(RpcError::Node {
                code: 3,
                message: format!("{} reverted", method),
            });
        }
        Ok(())
    }

    async fn position_read(&self, method: &'static str, address: &Address) -> RpcResult<MockPosition> {
        if let Some(delay) = self.delays.get(address) {
            tokio::time::sleep(*delay).await;
        }
        self.record(method)?;
        Ok(self.positions.get(address).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ContractReader for MockReader {
    async fn name(&self) -> RpcResult<String> {
        self.record("name")?;
        Ok(self.name.clone())
    }

    async fn description(&self) -> RpcResult<String> {
        self.record("description")?;
        Ok(self.description.clone())
    }

    async fn current_nav(&self) -> RpcResult<FixedPoint> {
        self.record("current_nav")?;
        Ok(FixedPoint::from_raw(self.nav))
    }

    async fn total_supply(&self) -> RpcResult<FixedPoint> {
        self.record("total_supply")?;
        Ok(FixedPoint::from_raw(self.supply))
    }

    async fn inception_date(&self) -> RpcResult<u64> {
        self.record("inception_date")?;
        Ok(self.inception)
    }

    async fn nav_history_length(&self) -> RpcResult<u64> {
        self.record("nav_history_length")?;
        Ok(self.history.len() as u64)
    }

    async fn nav_history_at(&self, index: u64) -> RpcResult<NavEntry> {
        // Later indices answer faster, so unordered collection would be caught
        let pending = self.history.len() as u64 - index.min(self.history.len() as u64);
        tokio::time::sleep(Duration::from_millis(pending * 2)).await;

        self.record("nav_history_at")?;
        let (timestamp, nav) = self
            .history
            .get(index as usize)
            .copied()
            .ok_or_else(|| RpcError::Node {
                code: 3,
                message: "index out of bounds".to_string(),
            })?;
        Ok(NavEntry {
            timestamp,
            nav: FixedPoint::from_raw(nav),
        })
    }

    async fn whitelist_status(&self, address: &Address) -> RpcResult<bool> {
        Ok(self.position_read("whitelist_status", address).await?.whitelisted)
    }

    async fn balance_of(&self, address: &Address) -> RpcResult<FixedPoint> {
        let p = self.position_read("balance_of", address).await?;
        Ok(FixedPoint::from_raw(p.shares))
    }

    async fn value_of(&self, address: &Address) -> RpcResult<FixedPoint> {
        let p = self.position_read("value_of", address).await?;
        Ok(FixedPoint::from_raw(p.value))
    }

    async fn return_of(&self, address: &Address) -> RpcResult<i128> {
        Ok(self.position_read("return_of", address).await?.return_bps)
    }

    async fn position_info(&self, address: &Address) -> RpcResult<PositionInfo> {
        let p = self.position_read("position_info", address).await?;
        Ok(PositionInfo {
            initial_investment: FixedPoint::from_raw(p.initial_investment),
            investment_date: p.investment_date,
        })
    }
}
