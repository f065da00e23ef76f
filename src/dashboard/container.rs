//! Dashboard State Container
//!
//! Owns the render state and runs the wallet connection state machine:
//!
//! ```text
//! Disconnected --connect--> Connecting --accounts+chain+position--> Connected(a)
//!      ^                        |                                      |
//!      +------ rejected --------+        accountsChanged([b]) ---> Connected(b)
//!      +------------- disconnect / accountsChanged([]) ----------------+
//! ```
//!
//! A chain change discards everything and mounts again.
//!
//! Position loads are tagged with the account they were issued for and a
//! generation counter. A result is committed only if both still match, so a
//! load overtaken by an account switch or disconnect is dropped.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

use super::error::DashboardError;
use super::messages::Inbound;
use super::state::{ConnectionState, RenderState};
use crate::config::NetworkConfig;
use crate::contract::{Address, ContractReader, RpcResult};
use crate::loader::{FundDataLoader, Position, PositionLoader};
use crate::wallet::{ChainParams, WalletError, WalletEvent, WalletProvider};

/// Result of a position load, tagged for supersession checks
#[derive(Debug)]
pub struct PositionOutcome {
    pub address: Address,
    pub generation: u64,
    pub result: RpcResult<Position>,
}

/// What the event loop should do after applying a message
#[derive(Debug, PartialEq, Eq)]
enum Next {
    Idle,
    LoadPosition(Address),
    Stop,
}

pub struct Dashboard {
    network: NetworkConfig,
    fund_loader: FundDataLoader,
    position_loader: Arc<PositionLoader>,
    wallet: Option<Arc<dyn WalletProvider>>,
    state: RenderState,
    /// Account the next committed position must belong to
    target: Option<Address>,
    /// Bumped whenever outstanding position loads become stale
    generation: u64,
    /// The banner currently shows a failed fund load
    fund_error_shown: bool,
    publisher: watch::Sender<RenderState>,
}

impl Dashboard {
    /// Create a dashboard; `wallet` is `None` in read-only mode
    pub fn new(
        network: NetworkConfig,
        reader: Arc<dyn ContractReader>,
        history_concurrency: usize,
        wallet: Option<Arc<dyn WalletProvider>>,
    ) -> Self {
        let (publisher, _) = watch::channel(RenderState::default());

        Self {
            network,
            fund_loader: FundDataLoader::new(Arc::clone(&reader), history_concurrency),
            position_loader: Arc::new(PositionLoader::new(reader)),
            wallet,
            state: RenderState::default(),
            target: None,
            generation: 0,
            fund_error_shown: false,
            publisher,
        }
    }

    /// Current render state
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Receiver that observes every published render state
    pub fn subscribe(&self) -> watch::Receiver<RenderState> {
        self.publisher.subscribe()
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    fn publish(&self) {
        debug_assert!(self.state.is_consistent());
        self.publisher.send_replace(self.state.clone());
    }

    fn surface_error(&mut self, err: &DashboardError) {
        tracing::warn!(error = %err, "Dashboard error");
        self.state.error = Some(err.to_string());
        self.fund_error_shown = false;
    }

    pub fn dismiss_error(&mut self) {
        self.state.error = None;
        self.fund_error_shown = false;
        self.publish();
    }

    // ============================================
    // Fund data
    // ============================================

    /// Load fund data, keeping the previous snapshot if the load fails
    ///
    /// A successful load clears the banner only if it holds an earlier fund
    /// load failure; other errors stay until dismissed.
    pub async fn load_fund_data(&mut self) {
        self.state.loading.fund = true;
        self.publish();

        match self.fund_loader.load_fund_data().await {
            Ok(data) => {
                self.state.fund = Some(data.snapshot);
                self.state.nav_history = data.history;
                if self.fund_error_shown {
                    self.state.error = None;
                    self.fund_error_shown = false;
                }
            }
            Err(e) => {
                self.surface_error(&e.into());
                self.fund_error_shown = true;
            }
        }

        self.state.loading.fund = false;
        self.publish();
    }

    // ============================================
    // Mount / reinitialize
    // ============================================

    /// Initial load: fund data, then any already-authorized account
    pub async fn mount(&mut self) {
        if let Some(address) = self.mount_step().await {
            self.load_and_commit(address).await;
        }
    }

    async fn mount_step(&mut self) -> Option<Address> {
        self.load_fund_data().await;
        self.begin_detect().await
    }

    /// Discard all state, as after a chain change
    fn reset(&mut self) {
        self.generation += 1;
        self.target = None;
        self.fund_error_shown = false;
        self.state = RenderState::default();
        self.publish();
    }

    /// Pick up an account the wallet already authorized, without prompting
    ///
    /// Only connects when the wallet already sits on the configured chain.
    async fn begin_detect(&mut self) -> Option<Address> {
        if self.state.connection != ConnectionState::Disconnected {
            return None;
        }
        let wallet = self.wallet.as_ref()?;

        let accounts = match wallet.accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read authorized accounts");
                return None;
            }
        };

        let address = *accounts.first()?;

        // No prompt here, so a wallet on another chain waits for a connect action
        match wallet.chain_id().await {
            Ok(chain_id) if chain_id == self.network.chain_id => {}
            Ok(chain_id) => {
                tracing::info!(
                    address = %address,
                    chain_id,
                    target = self.network.chain_id,
                    "Authorized account is on another chain, staying disconnected"
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read wallet chain");
                return None;
            }
        }

        tracing::info!(address = %address, "Found previously authorized account");
        self.state.connection = ConnectionState::Connecting;
        Some(self.begin_position(address))
    }

    // ============================================
    // Connect / disconnect
    // ============================================

    /// Run the full connect flow, returning once the outcome is published
    pub async fn connect(&mut self) {
        if let Some(address) = self.begin_connect().await {
            self.load_and_commit(address).await;
        }
    }

    /// Disconnected -> Connecting, through account access and chain checks
    ///
    /// Returns the account whose position must load before the connection
    /// is published, or `None` if the attempt ended (or was not started).
    pub async fn begin_connect(&mut self) -> Option<Address> {
        if self.state.connection != ConnectionState::Disconnected {
            tracing::debug!(connection = ?self.state.connection, "Connect ignored");
            return None;
        }

        self.state.connection = ConnectionState::Connecting;
        self.publish();

        let wallet = match self.wallet.clone() {
            Some(wallet) => wallet,
            None => {
                self.fail_connect(DashboardError::WalletUnavailable);
                return None;
            }
        };

        let accounts = match wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::info!(error = %e, "Account access denied");
                self.fail_connect(DashboardError::WalletRejected);
                return None;
            }
        };

        let Some(address) = accounts.first().copied() else {
            self.fail_connect(DashboardError::WalletRejected);
            return None;
        };

        if let Err(e) = self.ensure_chain(wallet.as_ref()).await {
            self.fail_connect(e);
            return None;
        }

        tracing::info!(address = %address, "Wallet access granted");
        Some(self.begin_position(address))
    }

    fn fail_connect(&mut self, err: DashboardError) {
        self.state.connection = ConnectionState::Disconnected;
        self.state.loading.position = false;
        self.target = None;
        self.surface_error(&err);
        self.publish();
    }

    /// Make sure the wallet is on the configured chain
    async fn ensure_chain(&self, wallet: &dyn WalletProvider) -> Result<(), DashboardError> {
        let target = self.network.chain_id;
        let switch_failed = |e: WalletError| DashboardError::ChainSwitchFailed {
            chain: self.network.chain_name.clone(),
            reason: e.to_string(),
        };

        let current = wallet.chain_id().await.map_err(switch_failed)?;
        if current == target {
            return Ok(());
        }

        tracing::info!(current, target, "Wallet on wrong chain, requesting switch");
        match wallet.switch_chain(target).await {
            Ok(()) => Ok(()),
            Err(WalletError::UnknownChain(_)) => {
                tracing::info!(chain = %self.network.chain_name, "Chain unknown to wallet, requesting registration");
                // The wallet selects the chain after adding it
                wallet
                    .add_chain(&ChainParams::from_network(&self.network))
                    .await
                    .map_err(switch_failed)
            }
            Err(e) => Err(switch_failed(e)),
        }
    }

    /// Any state -> Disconnected, clearing position data immediately
    pub fn disconnect(&mut self) {
        tracing::info!(connection = ?self.state.connection, "Disconnecting wallet");
        self.generation += 1;
        self.target = None;
        self.state.connection = ConnectionState::Disconnected;
        self.state.position = None;
        self.state.loading.position = false;
        self.publish();
    }

    // ============================================
    // Wallet events
    // ============================================

    /// Apply a wallet notification and wait for any position load it starts
    pub async fn handle_event(&mut self, event: WalletEvent) {
        self.handle(Inbound::Wallet(event)).await;
    }

    /// Account switch while connected (or connecting)
    fn begin_account_switch(&mut self, address: Address) -> Option<Address> {
        match self.state.connection {
            ConnectionState::Disconnected => {
                tracing::debug!(address = %address, "Account change ignored while disconnected");
                None
            }
            ConnectionState::Connected(current) if current == address => None,
            ConnectionState::Connecting if self.target == Some(address) => None,
            _ => {
                tracing::info!(address = %address, "Wallet switched account");
                self.state.position = None;
                Some(self.begin_position(address))
            }
        }
    }

    // ============================================
    // Position loads
    // ============================================

    /// Mark `address` as the account awaiting its position
    fn begin_position(&mut self, address: Address) -> Address {
        self.generation += 1;
        self.target = Some(address);
        self.state.loading.position = true;
        self.publish();
        address
    }

    /// Future loading the position of `address`, detached from `self`
    pub fn position_task(&self, address: Address) -> impl Future<Output = PositionOutcome> + Send + 'static {
        let loader = Arc::clone(&self.position_loader);
        let generation = self.generation;

        async move {
            let result = loader.load_position(&address).await;
            PositionOutcome {
                address,
                generation,
                result,
            }
        }
    }

    /// Publish a finished position load as Connected, unless superseded
    ///
    /// Returns `false` when the outcome was discarded.
    pub fn commit_position(&mut self, outcome: PositionOutcome) -> bool {
        if outcome.generation != self.generation || self.target != Some(outcome.address) {
            tracing::debug!(address = %outcome.address, "Discarding superseded position load");
            return false;
        }

        match outcome.result {
            Ok(position) => self.state.position = Some(position),
            Err(e) => {
                // The account still connects, just without a position
                self.state.position = None;
                self.surface_error(&e.into());
            }
        }

        tracing::info!(address = %outcome.address, "Wallet connected");
        self.state.connection = ConnectionState::Connected(outcome.address);
        self.state.loading.position = false;
        self.publish();
        true
    }

    async fn load_and_commit(&mut self, address: Address) {
        let outcome = self.position_task(address).await;
        self.commit_position(outcome);
    }

    // ============================================
    // Message dispatch
    // ============================================

    async fn apply(&mut self, message: Inbound) -> Next {
        let next = match message {
            Inbound::Connect => self.begin_connect().await,
            Inbound::Disconnect => {
                self.disconnect();
                None
            }
            Inbound::Refresh => {
                self.load_fund_data().await;
                None
            }
            Inbound::DismissError => {
                self.dismiss_error();
                None
            }
            Inbound::Wallet(WalletEvent::AccountsChanged(accounts)) => match accounts.first() {
                None => {
                    if self.state.connection != ConnectionState::Disconnected {
                        tracing::info!("Wallet reported no accounts");
                        self.disconnect();
                    }
                    None
                }
                Some(address) => self.begin_account_switch(*address),
            },
            Inbound::Wallet(WalletEvent::ChainChanged(chain_id)) => {
                tracing::info!(chain_id, "Wallet changed chain, reinitializing");
                self.reset();
                self.mount_step().await
            }
            Inbound::Shutdown => return Next::Stop,
        };

        match next {
            Some(address) => Next::LoadPosition(address),
            None => Next::Idle,
        }
    }

    /// Apply one message, waiting for any position load it starts
    pub async fn handle(&mut self, message: Inbound) {
        if let Next::LoadPosition(address) = self.apply(message).await {
            self.load_and_commit(address).await;
        }
    }

    /// Mount, then consume inbound messages until shutdown or channel close
    ///
    /// Position loads run as separate tasks so that later messages (an
    /// account switch, a disconnect) are handled while a load is in flight.
    pub async fn run(&mut self, mut inbound: mpsc::Receiver<Inbound>) {
        let mut loads: JoinSet<PositionOutcome> = JoinSet::new();

        if let Some(address) = self.mount_step().await {
            loads.spawn(self.position_task(address));
        }

        loop {
            tokio::select! {
                message = inbound.recv() => {
                    let Some(message) = message else { break };
                    match self.apply(message).await {
                        Next::LoadPosition(address) => {
                            loads.spawn(self.position_task(address));
                        }
                        Next::Stop => break,
                        Next::Idle => {}
                    }
                }
                Some(joined) = loads.join_next(), if !loads.is_empty() => {
                    match joined {
                        Ok(outcome) => {
                            self.commit_position(outcome);
                        }
                        Err(e) => tracing::error!(error = %e, "Position load task failed"),
                    }
                }
            }
        }

        tracing::info!("Dashboard event loop stopped");
    }
}
