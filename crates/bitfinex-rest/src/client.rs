//! Public and trading client implementations

use bitfinex_auth::{Credentials, NonceSource};
use parking_lot::Mutex;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use crate::endpoints::{AccountEndpoints, FundingEndpoints, MarketEndpoints};
use crate::error::{RestError, RestResult};
use crate::symbols::SymbolSet;
use crate::types::{
    AccountFees, Balance, Credit, FundingBook, HistoryEntry, HistoryQuery, Lend, Movement,
    MovementQuery, Offer, OfferRequest, OrderBook, PastTrade, PastTradesQuery, Stats, TakenFund,
    Ticker, Trade,
};

/// Versioned root every call path is appended to
pub const DEFAULT_BASE_URL: &str = "https://api.bitfinex.com/v1";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the versioned API root
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Proxy URL applied uniformly to every request
    pub proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set a custom user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Route every request through a proxy
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

fn build_http(config: &ClientConfig) -> RestResult<Client> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(
            config
                .user_agent
                .as_deref()
                .unwrap_or(concat!("bitfinex-rest/", env!("CARGO_PKG_VERSION"))),
        );

    if let Some(proxy) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| RestError::InvalidParameter(format!("Invalid proxy URL: {}", e)))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build().expect("Failed to create HTTP client"))
}

/// Client for the unauthenticated market-data endpoints
///
/// Construction fetches the tradable-symbol catalog; a client only exists
/// once that bootstrap call has succeeded. After construction the client is
/// read-only and can be shared freely across tasks.
///
/// # Example
///
/// ```no_run
/// use bitfinex_rest::PublicClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PublicClient::connect().await?;
///     let ticker = client.ticker("btcusd").await?;
///     println!("mid price: {}", ticker.mid);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PublicClient {
    http: Client,
    base_url: String,
    symbols: SymbolSet,
}

impl PublicClient {
    /// Connect with the default configuration
    pub async fn connect() -> RestResult<Self> {
        Self::with_config(ClientConfig::default()).await
    }

    /// Connect with a custom configuration
    ///
    /// Fails if the symbol-catalog bootstrap request fails; there is no
    /// retry, a fresh call is required.
    pub async fn with_config(config: ClientConfig) -> RestResult<Self> {
        let http = build_http(&config)?;
        let symbols = MarketEndpoints::fetch_symbols(&http, &config.base_url).await?;

        info!(symbols = symbols.len(), "Connected to Bitfinex public API");

        Ok(Self {
            http,
            base_url: config.base_url,
            symbols,
        })
    }

    /// Get market data endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.http, &self.base_url, &self.symbols)
    }

    /// Get the cached tradable-symbol catalog
    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Get the ticker for a trading pair
    pub async fn ticker(&self, symbol: &str) -> RestResult<Ticker> {
        self.market().ticker(symbol).await
    }

    /// Get volume statistics for a trading pair
    pub async fn stats(&self, symbol: &str) -> RestResult<Vec<Stats>> {
        self.market().stats(symbol).await
    }

    /// Get the order book for a trading pair
    pub async fn order_book(
        &self,
        symbol: &str,
        limit_bids: Option<u32>,
        limit_asks: Option<u32>,
        group: Option<bool>,
    ) -> RestResult<OrderBook> {
        self.market()
            .order_book(symbol, limit_bids, limit_asks, group)
            .await
    }

    /// Get the most recent trades for a trading pair
    pub async fn trades(
        &self,
        symbol: &str,
        timestamp: Option<f64>,
        limit_trades: Option<u32>,
    ) -> RestResult<Vec<Trade>> {
        self.market().trades(symbol, timestamp, limit_trades).await
    }

    /// Get the margin-funding book for a currency
    pub async fn funding_book(
        &self,
        currency: &str,
        limit_bids: Option<u32>,
        limit_asks: Option<u32>,
    ) -> RestResult<FundingBook> {
        self.market()
            .funding_book(currency, limit_bids, limit_asks)
            .await
    }

    /// Get the most recent margin lends for a currency
    pub async fn lends(
        &self,
        currency: &str,
        timestamp: Option<f64>,
        limit_lends: Option<u32>,
    ) -> RestResult<Vec<Lend>> {
        self.market().lends(currency, timestamp, limit_lends).await
    }
}

/// Client for the authenticated account and margin-funding endpoints
///
/// Holds a [`PublicClient`] for the market-data surface plus the signing
/// state for private calls. Construction performs the public symbol
/// bootstrap and one authenticated fee-info call, so an instance with bad
/// credentials never comes into existence.
///
/// Nonces are drawn from a single mutex-guarded [`NonceSource`], which
/// keeps them strictly increasing; the mutex covers only the draw, so two
/// calls issued concurrently through one client may still reach the server
/// out of nonce order and have the older one rejected. Callers needing
/// back-to-back authenticated calls should await each before issuing the
/// next.
///
/// # Example
///
/// ```no_run
/// use bitfinex_rest::{Credentials, TradingClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = Credentials::from_env()?;
///     let client = TradingClient::connect(creds).await?;
///
///     for balance in client.balances().await? {
///         println!("{} {}: {}", balance.wallet, balance.currency, balance.amount);
///     }
///     Ok(())
/// }
/// ```
pub struct TradingClient {
    public: PublicClient,
    credentials: Credentials,
    nonce: Mutex<NonceSource>,
}

impl TradingClient {
    /// Connect with the default configuration
    pub async fn connect(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::default(), credentials).await
    }

    /// Connect with a custom configuration
    pub async fn with_config(config: ClientConfig, credentials: Credentials) -> RestResult<Self> {
        let public = PublicClient::with_config(config).await?;

        let client = Self {
            public,
            credentials,
            nonce: Mutex::new(NonceSource::new()),
        };

        // Fail fast on bad credentials before handing the client out.
        client.account().fees().await?;

        info!("Authenticated against Bitfinex trading API");

        Ok(client)
    }

    /// Get the underlying public client
    pub fn public(&self) -> &PublicClient {
        &self.public
    }

    /// Get market data endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        self.public.market()
    }

    /// Get the cached tradable-symbol catalog
    pub fn symbols(&self) -> &SymbolSet {
        self.public.symbols()
    }

    /// Get account endpoints
    pub fn account(&self) -> AccountEndpoints<'_> {
        AccountEndpoints::new(
            &self.public.http,
            &self.public.base_url,
            &self.credentials,
            &self.nonce,
            &self.public.symbols,
        )
    }

    /// Get margin-funding endpoints
    pub fn funding(&self) -> FundingEndpoints<'_> {
        FundingEndpoints::new(
            &self.public.http,
            &self.public.base_url,
            &self.credentials,
            &self.nonce,
        )
    }

    /// Get the account's trading-fee information
    pub async fn account_fees(&self) -> RestResult<Vec<AccountFees>> {
        self.account().fees().await
    }

    /// Get all wallet balances
    pub async fn balances(&self) -> RestResult<Vec<Balance>> {
        self.account().balances().await
    }

    /// Get balance-ledger entries for a currency
    pub async fn balance_history(
        &self,
        currency: &str,
        query: &HistoryQuery,
    ) -> RestResult<Vec<HistoryEntry>> {
        self.account().balance_history(currency, query).await
    }

    /// Get past deposits and withdrawals for a currency
    pub async fn movements(
        &self,
        currency: &str,
        query: &MovementQuery,
    ) -> RestResult<Vec<Movement>> {
        self.account().movements(currency, query).await
    }

    /// Get the account's past trades for a trading pair
    pub async fn past_trades(
        &self,
        symbol: &str,
        query: &PastTradesQuery,
    ) -> RestResult<Vec<PastTrade>> {
        self.account().past_trades(symbol, query).await
    }

    /// Place a new margin-funding offer
    pub async fn new_offer(&self, offer: &OfferRequest) -> RestResult<Offer> {
        self.funding().new_offer(offer).await
    }

    /// Cancel an active offer
    pub async fn cancel_offer(&self, offer_id: u64) -> RestResult<Offer> {
        self.funding().cancel_offer(offer_id).await
    }

    /// Get the current status of an offer
    pub async fn offer_status(&self, offer_id: u64) -> RestResult<Offer> {
        self.funding().offer_status(offer_id).await
    }

    /// List the account's active offers
    pub async fn active_offers(&self) -> RestResult<Vec<Offer>> {
        self.funding().active_offers().await
    }

    /// List active credits (funds currently lent out)
    pub async fn active_credits(&self) -> RestResult<Vec<Credit>> {
        self.funding().active_credits().await
    }

    /// List margin funds taken and in use
    pub async fn taken_funds(&self) -> RestResult<Vec<TakenFund>> {
        self.funding().taken_funds().await
    }
}

impl std::fmt::Debug for TradingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingClient")
            .field("base_url", &self.public.base_url)
            .field("symbols", &self.public.symbols.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestError;

    const SYMBOLS_BODY: &str = r#"["btcusd","ethusd","ltcusd"]"#;
    const FEES_BODY: &str =
        r#"[{"maker_fees":"0.1","taker_fees":"0.2","fees":[{"pairs":"BTC","maker_fees":"0.1","taker_fees":"0.2"}]}]"#;

    fn config(server: &mockito::Server) -> ClientConfig {
        ClientConfig::new().with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_public_connect_fetches_symbols_once() {
        let mut server = mockito::Server::new_async().await;
        let symbols_mock = server
            .mock("GET", "/symbols")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SYMBOLS_BODY)
            .expect(1)
            .create_async()
            .await;

        let client = PublicClient::with_config(config(&server)).await.unwrap();

        assert_eq!(client.symbols().len(), 3);
        assert!(client.symbols().contains("BTCUSD"));
        symbols_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_public_connect_fails_on_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/symbols")
            .with_status(500)
            .create_async()
            .await;

        let result = PublicClient::with_config(config(&server)).await;
        assert!(matches!(result, Err(RestError::Http { status: 500 })));
    }

    #[tokio::test]
    async fn test_public_connect_fails_on_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/symbols")
            .with_status(200)
            .with_body("<html>down for maintenance</html>")
            .create_async()
            .await;

        let result = PublicClient::with_config(config(&server)).await;
        assert!(matches!(result, Err(RestError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_unsupported_symbol_costs_no_request() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/symbols")
            .with_status(200)
            .with_body(SYMBOLS_BODY)
            .create_async()
            .await;

        let client = PublicClient::with_config(config(&server)).await.unwrap();

        let no_call = server
            .mock("GET", mockito::Matcher::Regex("^/pubticker.*".to_string()))
            .expect(0)
            .create_async()
            .await;

        let result = client.ticker("dogeusd").await;
        assert!(matches!(result, Err(RestError::UnsupportedSymbol(s)) if s == "dogeusd"));
        no_call.assert_async().await;
    }

    #[tokio::test]
    async fn test_optional_query_params_are_omitted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/symbols")
            .with_status(200)
            .with_body(SYMBOLS_BODY)
            .create_async()
            .await;

        // limit_bids present, limit_asks and group absent from the query.
        let book_mock = server
            .mock("GET", "/book/btcusd")
            .match_query(mockito::Matcher::Exact("limit_bids=5".to_string()))
            .with_status(200)
            .with_body(r#"{"bids":[],"asks":[]}"#)
            .create_async()
            .await;

        let client = PublicClient::with_config(config(&server)).await.unwrap();
        let book = client.order_book("BTCUSD", Some(5), None, None).await.unwrap();

        assert!(book.bids.is_empty());
        book_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_trading_connect_bootstraps_symbols_and_fees() {
        let mut server = mockito::Server::new_async().await;
        let symbols_mock = server
            .mock("GET", "/symbols")
            .with_status(200)
            .with_body(SYMBOLS_BODY)
            .expect(1)
            .create_async()
            .await;

        let fees_mock = server
            .mock("POST", "/account_infos")
            .match_header("x-bfx-apikey", "key")
            .match_header("x-bfx-payload", mockito::Matcher::Regex(".+".to_string()))
            .match_header("x-bfx-signature", mockito::Matcher::Regex("^[0-9a-f]{96}$".to_string()))
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "request": "/v1/account_infos"
            })))
            .with_status(200)
            .with_body(FEES_BODY)
            .expect(1)
            .create_async()
            .await;

        let client =
            TradingClient::with_config(config(&server), Credentials::new("key", "secret"))
                .await
                .unwrap();

        assert!(client.symbols().contains("ethusd"));
        symbols_mock.assert_async().await;
        fees_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_trading_connect_fails_on_bad_credentials() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/symbols")
            .with_status(200)
            .with_body(SYMBOLS_BODY)
            .create_async()
            .await;

        // The service reports credential problems inside an HTTP 200 body.
        server
            .mock("POST", "/account_infos")
            .with_status(200)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let result =
            TradingClient::with_config(config(&server), Credentials::new("bad", "creds")).await;
        assert!(matches!(result, Err(RestError::Api(msg)) if msg == "Invalid API key"));
    }

    #[tokio::test]
    async fn test_authenticated_symbol_validation_spends_no_nonce() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/symbols")
            .with_status(200)
            .with_body(SYMBOLS_BODY)
            .create_async()
            .await;
        server
            .mock("POST", "/account_infos")
            .with_status(200)
            .with_body(FEES_BODY)
            .create_async()
            .await;

        let client =
            TradingClient::with_config(config(&server), Credentials::new("key", "secret"))
                .await
                .unwrap();

        let no_call = server
            .mock("POST", "/mytrades")
            .expect(0)
            .create_async()
            .await;

        let result = client.past_trades("dogeusd", &PastTradesQuery::new()).await;
        assert!(matches!(result, Err(RestError::UnsupportedSymbol(_))));
        no_call.assert_async().await;
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_proxy("http://localhost:8118");

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.proxy, Some("http://localhost:8118".to_string()));
        assert_eq!(ClientConfig::default().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_proxy_is_rejected() {
        let config = ClientConfig::new().with_proxy("::not a url::");
        let result = build_http(&config);
        assert!(matches!(result, Err(RestError::InvalidParameter(_))));
    }
}
