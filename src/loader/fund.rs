//! Fund Data Loader
//!
//! Fetches fund-level state and the full NAV history. Independent of any
//! wallet connection.

use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::sync::Arc;

use crate::contract::{ContractReader, NavEntry, RpcResult};

/// NAV every fund launches at
pub const INITIAL_NAV: f64 = 1.0;

/// Fund-level metrics, replaced wholesale on refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundSnapshot {
    pub name: String,
    pub description: String,
    /// NAV per share
    pub current_nav: f64,
    pub total_shares: f64,
    /// Unix seconds
    pub inception_date: u64,
}

impl FundSnapshot {
    /// Percentage return since inception, from the launch NAV of 1.00
    pub fn return_since_inception(&self) -> f64 {
        (self.current_nav - INITIAL_NAV) / INITIAL_NAV * 100.0
    }

    /// Total fund value (NAV x shares outstanding)
    pub fn assets_under_management(&self) -> f64 {
        self.current_nav * self.total_shares
    }
}

/// One point of the NAV time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavHistoryPoint {
    /// Unix seconds
    pub timestamp: u64,
    pub nav: f64,
}

impl From<NavEntry> for NavHistoryPoint {
    fn from(entry: NavEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            nav: entry.nav.to_display(),
        }
    }
}

/// Result of a full fund load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundData {
    pub snapshot: FundSnapshot,
    /// Ascending by on-chain index
    pub history: Vec<NavHistoryPoint>,
}

pub struct FundDataLoader {
    reader: Arc<dyn ContractReader>,
    history_concurrency: usize,
}

impl FundDataLoader {
    /// `history_concurrency` bounds in-flight history reads; 1 is strictly sequential
    pub fn new(reader: Arc<dyn ContractReader>, history_concurrency: usize) -> Self {
        Self {
            reader,
            history_concurrency: history_concurrency.max(1),
        }
    }

    /// Load the snapshot, then the full history
    pub async fn load_fund_data(&self) -> RpcResult<FundData> {
        let snapshot = self.load_snapshot().await?;
        let history = self.load_history().await?;

        tracing::info!(
            fund = %snapshot.name,
            nav = snapshot.current_nav,
            history_points = history.len(),
            "Fund data loaded"
        );

        Ok(FundData { snapshot, history })
    }

    /// Issue the five scalar reads concurrently
    pub async fn load_snapshot(&self) -> RpcResult<FundSnapshot> {
        let reader = self.reader.as_ref();
        let (name, description, nav, supply, inception) = tokio::try_join!(
            reader.name(),
            reader.description(),
            reader.current_nav(),
            reader.total_supply(),
            reader.inception_date(),
        )?;

        Ok(FundSnapshot {
            name,
            description,
            current_nav: nav.to_display(),
            total_shares: supply.to_display(),
            inception_date: inception,
        })
    }

    /// Fetch indices `0..navHistoryLength`, preserving index order
    pub async fn load_history(&self) -> RpcResult<Vec<NavHistoryPoint>> {
        let reader = self.reader.as_ref();
        let len = reader.nav_history_length().await?;

        tracing::debug!(len, concurrency = self.history_concurrency, "Fetching NAV history");

        let points: Vec<NavHistoryPoint> = stream::iter(0..len)
            .map(|index| async move { reader.nav_history_at(index).await.map(NavHistoryPoint::from) })
            .buffered(self.history_concurrency)
            .try_collect()
            .await?;

        if points.windows(2).any(|w| w[1].timestamp < w[0].timestamp) {
            tracing::warn!("NAV history timestamps are not ascending by index");
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::testing::MockReader;
    use crate::contract::{RpcError, WAD};

    fn loader(reader: MockReader, concurrency: usize) -> (Arc<MockReader>, FundDataLoader) {
        let reader = Arc::new(reader);
        let loader = FundDataLoader::new(reader.clone(), concurrency);
        (reader, loader)
    }

    #[tokio::test]
    async fn test_snapshot_scaling() {
        let (_, loader) = loader(MockReader::default(), 4);
        let snapshot = loader.load_snapshot().await.unwrap();

        assert_eq!(snapshot.name, "Meridian Growth Fund");
        assert_eq!(snapshot.current_nav, 1.04);
        assert_eq!(snapshot.total_shares, 250_000.0);
        assert_eq!(snapshot.inception_date, 1_672_531_200);
    }

    #[tokio::test]
    async fn test_return_since_inception() {
        let (_, loader) = loader(MockReader::default(), 4);
        let snapshot = loader.load_snapshot().await.unwrap();
        assert!((snapshot.return_since_inception() - 4.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_history_order_preserved_under_concurrency() {
        let history: Vec<(u64, u128)> = (0..12)
            .map(|i| (1_700_000_000 + i * 86_400, WAD + i as u128))
            .collect();
        let (reader, loader) = loader(MockReader::default().with_history(history), 4);

        let points = loader.load_history().await.unwrap();
        assert_eq!(points.len(), 12);
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(reader.call_count("nav_history_at"), 12);
    }

    #[tokio::test]
    async fn test_sequential_history() {
        let (reader, loader) = loader(MockReader::default(), 1);
        let points = loader.load_history().await.unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].nav, 1.0);
        assert_eq!(points[2].nav, 1.04);
        assert_eq!(reader.call_count("nav_history_length"), 1);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let (reader, loader) = loader(MockReader::default().with_history(Vec::new()), 4);
        let data = loader.load_fund_data().await.unwrap();
        assert!(data.history.is_empty());
        assert_eq!(reader.call_count("nav_history_at"), 0);
    }

    #[tokio::test]
    async fn test_scalar_failure_fails_load() {
        let (_, loader) = loader(MockReader::default().failing("total_supply"), 4);
        let err = loader.load_fund_data().await.unwrap_err();
        assert!(matches!(err, RpcError::Node { .. }));
    }

    #[tokio::test]
    async fn test_history_failure_fails_load() {
        let (_, loader) = loader(MockReader::default().failing("nav_history_at"), 2);
        assert!(loader.load_fund_data().await.is_err());
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let loader = FundDataLoader::new(Arc::new(MockReader::default()), 0);
        assert_eq!(loader.history_concurrency, 1);
    }
}
