//! Catalog operations with the network round-trip wrapped in the retrying
//! executor.

use ecomarket_core::retry::{JitterSource, RandomJitter, Sleeper, ThreadSleeper};
use ecomarket_core::{
    ApiError, EcoMarketClient, HttpRequest, HttpResponse, NewProduct, Product, ProductPatch,
    RetryExecutor,
};

use crate::config::{ConfigError, EcoMarketConfig};
use crate::transport::{Transport, UreqTransport};

/// EcoMarket catalog client that performs I/O.
///
/// Every operation builds its request once, then runs the round-trip and the
/// response parse under the retry policy: a 5xx or a transport failure is
/// retried with backoff, any other failure comes back after the first attempt.
pub struct EcoMarket<T = UreqTransport, J = RandomJitter, S = ThreadSleeper> {
    client: EcoMarketClient,
    transport: T,
    executor: RetryExecutor<J, S>,
}

impl EcoMarket {
    pub fn new(config: &EcoMarketConfig) -> Self {
        Self::with_transport(config, UreqTransport::new(config.timeout))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(&EcoMarketConfig::from_env()?))
    }
}

impl<T: Transport> EcoMarket<T> {
    pub fn with_transport(config: &EcoMarketConfig, transport: T) -> Self {
        Self::with_parts(
            EcoMarketClient::new(&config.base_url),
            transport,
            RetryExecutor::new(config.retry),
        )
    }
}

impl<T, J, S> EcoMarket<T, J, S> {
    pub fn with_parts(client: EcoMarketClient, transport: T, executor: RetryExecutor<J, S>) -> Self {
        Self {
            client,
            transport,
            executor,
        }
    }

    pub fn client(&self) -> &EcoMarketClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn executor(&self) -> &RetryExecutor<J, S> {
        &self.executor
    }
}

impl<T: Transport, J: JitterSource, S: Sleeper> EcoMarket<T, J, S> {
    pub fn list_products(&mut self) -> Result<Vec<Product>, ApiError> {
        let request = self.client.build_list_products();
        self.call("list_products", request, EcoMarketClient::parse_list_products)
    }

    pub fn get_product(&mut self, id: i64) -> Result<Product, ApiError> {
        let request = self.client.build_get_product(id);
        self.call("get_product", request, EcoMarketClient::parse_get_product)
    }

    pub fn create_product(&mut self, input: &NewProduct) -> Result<Product, ApiError> {
        let request = self.client.build_create_product(input)?;
        self.call("create_product", request, EcoMarketClient::parse_create_product)
    }

    pub fn replace_product(&mut self, id: i64, input: &NewProduct) -> Result<Product, ApiError> {
        let request = self.client.build_replace_product(id, input)?;
        self.call("replace_product", request, EcoMarketClient::parse_replace_product)
    }

    pub fn update_product(&mut self, id: i64, patch: &ProductPatch) -> Result<Product, ApiError> {
        let request = self.client.build_update_product(id, patch)?;
        self.call("update_product", request, EcoMarketClient::parse_update_product)
    }

    pub fn delete_product(&mut self, id: i64) -> Result<(), ApiError> {
        let request = self.client.build_delete_product(id);
        self.call("delete_product", request, EcoMarketClient::parse_delete_product)
    }

    fn call<R, P>(&mut self, operation: &str, request: HttpRequest, parse: P) -> Result<R, ApiError>
    where
        P: Fn(&EcoMarketClient, HttpResponse) -> Result<R, ApiError>,
    {
        let client = &self.client;
        let transport = &self.transport;
        self.executor.run(operation, || {
            let response = transport.execute(&request)?;
            parse(client, response)
        })
    }
}
