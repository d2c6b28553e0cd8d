//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use product_service::config::ServiceConfig;
use product_service::http::HttpServer;
use product_service::lifecycle::Shutdown;
use product_service::products::{NewProduct, Product};
use product_service::storage::{InMemoryProductRepository, ProductRepository, RepositoryError};
use tokio::net::TcpListener;

/// A running server on an ephemeral port; stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the real server over `products`.
pub async fn spawn_server(products: Arc<dyn ProductRepository>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServiceConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, products);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        shutdown,
    }
}

pub fn new_product(name: &str, price: f64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price,
    }
}

/// In-memory store that counts every repository call.
#[derive(Default)]
pub struct CountingRepository {
    pub inner: InMemoryProductRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductRepository for CountingRepository {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.hit();
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn find_where_price_less_than(
        &self,
        limit: f64,
    ) -> Result<Vec<Product>, RepositoryError> {
        self.hit();
        self.inner.find_where_price_less_than(limit).await
    }

    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        self.hit();
        self.inner.save(product).await
    }

    async fn delete(&self, product: &Product) -> Result<(), RepositoryError> {
        self.hit();
        self.inner.delete(product).await
    }
}

/// Store whose failures are injected per operation.
pub struct FailingRepository {
    /// Row returned by lookups when they are allowed to succeed.
    pub row: Option<Product>,
    pub fail_reads: bool,
}

impl FailingRepository {
    /// Every call fails.
    pub fn everywhere() -> Self {
        Self {
            row: None,
            fail_reads: true,
        }
    }

    /// Lookups find `row`; saves and deletes fail.
    pub fn on_write(row: Product) -> Self {
        Self {
            row: Some(row),
            fail_reads: false,
        }
    }

    fn failure() -> RepositoryError {
        RepositoryError::Unavailable("connection refused (secret-host:5432)".into())
    }
}

#[async_trait]
impl ProductRepository for FailingRepository {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        if self.fail_reads {
            return Err(Self::failure());
        }
        Ok(self.row.iter().cloned().collect())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Product>, RepositoryError> {
        if self.fail_reads {
            return Err(Self::failure());
        }
        Ok(self.row.clone())
    }

    async fn find_where_price_less_than(
        &self,
        _limit: f64,
    ) -> Result<Vec<Product>, RepositoryError> {
        Err(Self::failure())
    }

    async fn save(&self, _product: Product) -> Result<Product, RepositoryError> {
        Err(Self::failure())
    }

    async fn delete(&self, _product: &Product) -> Result<(), RepositoryError> {
        Err(Self::failure())
    }
}
