//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::notify::{LogNotifier, Notifier, SlackNotifier};
use crate::pagination::EventPaginator;
use crate::quotes::QuoteClient;
use crate::rpc::ChainClient;
use crate::sampler::FeeSampler;
use crate::scheduler::{shutdown_signal, Scheduler};
use crate::storage::FeeStore;
use crate::types::Chain;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
    config: AppConfig,
}

impl Runner {
    /// Load the configuration named on the command line (or the defaults)
    pub fn new(cli: Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => AppConfig::from_file(path)?,
            None => {
                let mut config = AppConfig::default();
                config.apply_env();
                config
            }
        };
        Self::with_config(cli, config)
    }

    /// Use an already loaded configuration
    pub fn with_config(cli: Cli, config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run => self.run_scheduler().await,
            Commands::Track => self.track().await,
            Commands::Report => self.report().await,
            Commands::Events { block, max_pages } => self.events(*block, *max_pages).await,
            Commands::BlockNumber => self.block_number().await,
            Commands::Price { symbol } => self.price(symbol).await,
            Commands::Gas { chain } => self.gas(*chain).await,
            Commands::Trigger {
                contract,
                selector,
                param,
            } => self.trigger(contract, selector, param).await,
        }
    }

    // ========================================================================
    // Wiring
    // ========================================================================

    fn http_client(&self) -> Result<HttpClient> {
        HttpClient::with_config(self.config.http_client_config())
    }

    fn quote_client(&self) -> Result<QuoteClient> {
        Ok(QuoteClient::new(
            self.http_client()?,
            self.config.endpoints.clone(),
            self.config.api_keys.clone(),
            &self.config.full_node,
        )?
        .with_parameter_lookup(self.config.tron.parameter_lookup.clone()))
    }

    fn chain_client(&self) -> Result<ChainClient> {
        Ok(ChainClient::new(
            self.http_client()?,
            &self.config.event_server,
            &self.config.full_node,
            self.config.transaction_info_url.clone(),
        )?
        .with_owner_address(self.config.tron.owner_address.clone()))
    }

    fn notifier(&self) -> Result<Arc<dyn Notifier>> {
        match &self.config.slack.webhook_url {
            Some(url) => Ok(Arc::new(SlackNotifier::new(self.http_client()?, url)?)),
            None => {
                warn!("no slack webhook configured, reports go to the log");
                Ok(Arc::new(LogNotifier))
            }
        }
    }

    fn open_store(&self) -> Result<Arc<FeeStore>> {
        let path = &self.config.database_path;
        let store = FeeStore::open(path)
            .with_context(|| format!("Failed to open fee store '{}'", path.display()))?;
        Ok(Arc::new(store))
    }

    fn sampler(&self, store: Arc<FeeStore>) -> Result<FeeSampler> {
        Ok(
            FeeSampler::new(self.quote_client()?, store, self.notifier()?)
                .with_model(self.config.fees.clone()),
        )
    }

    /// Close the store once every other handle is gone
    fn close_store(store: Arc<FeeStore>) -> Result<()> {
        Arc::try_unwrap(store)
            .map_err(|_| Error::Other("fee store still in use".to_string()))?
            .close()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    async fn run_scheduler(&self) -> Result<()> {
        let store = self.open_store()?;
        info!(database = %store.location(), "fee store opened");

        let scheduler = Scheduler::new(
            self.sampler(store.clone())?,
            self.config.schedule.track_interval(),
            self.config.schedule.report_at,
        );
        scheduler.run(shutdown_signal()).await;

        Self::close_store(store)
    }

    async fn track(&self) -> Result<()> {
        let store = self.open_store()?;
        let record = self.sampler(store.clone())?.track().await?;
        self.output_message(&serde_json::to_value(&record)?);
        Self::close_store(store)
    }

    async fn report(&self) -> Result<()> {
        let store = self.open_store()?;
        let text = self.sampler(store.clone())?.report().await?;
        self.output_message(&json!({ "report": text }));
        Self::close_store(store)
    }

    async fn events(&self, block: Option<u64>, max_pages: Option<u32>) -> Result<()> {
        let paginator = EventPaginator::new(self.http_client()?, &self.config.event_server)?
            .with_max_pages(max_pages.or(self.config.pagination.max_pages));
        let url = match block {
            Some(number) => paginator.block_events_url(number)?,
            None => paginator.latest_events_url()?,
        };

        let drain = paginator.drain::<Value>(&url).await;
        info!(
            pages = drain.state.pages,
            events = drain.events.len(),
            stop = ?drain.stop,
            "event feed drained"
        );
        for event in drain.into_events()? {
            self.output_message(&event);
        }
        Ok(())
    }

    async fn block_number(&self) -> Result<()> {
        let number = self.chain_client()?.block_number().await?;
        self.output_message(&json!({ "block_number": number }));
        Ok(())
    }

    async fn price(&self, symbol: &str) -> Result<()> {
        let quotes = self.quote_client()?;
        let usd = match symbol.parse::<Chain>() {
            Ok(Chain::Solana) => quotes.sol_price().await?,
            _ => quotes.token_price(&symbol.to_ascii_uppercase()).await?,
        };
        self.output_message(&json!({ "symbol": symbol.to_ascii_uppercase(), "usd": usd }));
        Ok(())
    }

    async fn gas(&self, chain: Chain) -> Result<()> {
        let quotes = self.quote_client()?;
        let gwei = match chain {
            Chain::Avalanche => quotes.avalanche_gas_price().await?,
            other => quotes.gas_price(other).await?,
        };
        self.output_message(&json!({ "chain": chain.label(), "gwei": gwei }));
        Ok(())
    }

    async fn trigger(&self, contract: &str, selector: &str, param: &str) -> Result<()> {
        let result = self
            .chain_client()?
            .trigger(contract, selector, param)
            .await?;
        self.output_message(&json!({ "constant_result": result }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
