use super::cache::{CacheStorage, Request, RequestMode, Response, ResponseKind};
use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid request method {0:?}")]
    Method(String),

    #[error("precaching {url} failed with status {status}")]
    Precache { url: String, status: u16 },

    #[error("{url} is not cached and the network is unavailable")]
    Offline { url: String },
}

/// Fetches a request from the network.
pub trait Network {
    fn fetch(&self, request: &Request) -> Result<Response, OfflineError>;
}

/// Blocking HTTP network. Relative URLs are resolved against `origin`.
pub struct HttpNetwork {
    origin: Url,
    http: Client,
}

impl HttpNetwork {
    pub fn new(origin: &str) -> Result<Self, OfflineError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            origin: Url::parse(origin)?,
            http,
        })
    }

    fn resolve(&self, url: &str) -> Result<Url, OfflineError> {
        Ok(self.origin.join(url)?)
    }

    /// Same scheme, host and port as the origin.
    fn kind_of(&self, url: &Url) -> ResponseKind {
        if url.origin() == self.origin.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        }
    }
}

impl Network for HttpNetwork {
    fn fetch(&self, request: &Request) -> Result<Response, OfflineError> {
        let url = self.resolve(&request.url)?;
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| OfflineError::Method(request.method.clone()))?;

        let response = self.http.request(method, url.clone()).send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        // Redirects may land on another origin.
        let kind = self.kind_of(response.url());
        let body = response.bytes()?.to_vec();
        debug!("{} {} -> {}", request.method, url, status);

        Ok(Response {
            status,
            kind,
            content_type,
            body,
        })
    }
}

/// Cache-first offline worker for one cache version.
pub struct OfflineWorker {
    version: String,
    precache: Vec<String>,
    storage: CacheStorage,
}

impl OfflineWorker {
    pub fn new(version: impl Into<String>, precache: Vec<String>) -> Self {
        Self::with_storage(version, precache, CacheStorage::new())
    }

    /// Worker over caches left behind by earlier versions.
    pub fn with_storage(
        version: impl Into<String>,
        precache: Vec<String>,
        storage: CacheStorage,
    ) -> Self {
        Self {
            version: version.into(),
            precache,
            storage,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Fetches every precache URL, then stores them all. Any failure leaves
    /// the storage untouched.
    pub fn install(&mut self, network: &dyn Network) -> Result<usize, OfflineError> {
        let mut fetched = Vec::with_capacity(self.precache.len());
        for url in &self.precache {
            let response = network.fetch(&Request::get(url.as_str()))?;
            if response.status != 200 {
                warn!("Precache of {} returned {}", url, response.status);
                return Err(OfflineError::Precache {
                    url: url.clone(),
                    status: response.status,
                });
            }
            fetched.push((url.clone(), response));
        }

        let count = fetched.len();
        let cache = self.storage.open(&self.version);
        for (url, response) in fetched {
            cache.put(url, response);
        }
        info!("Installed offline cache {} with {} entries", self.version, count);
        Ok(count)
    }

    /// Drops every cache but the current version and returns what was purged.
    pub fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .storage
            .names()
            .into_iter()
            .filter(|name| *name != self.version)
            .collect();
        for name in &stale {
            self.storage.delete(name);
            info!("Deleted stale offline cache {}", name);
        }
        stale
    }

    /// Serves from any cache, else from the network, storing successful
    /// same-origin GETs. Navigations fall back to the cached `/` offline.
    pub fn fetch(&mut self, network: &dyn Network, request: &Request) -> Result<Response, OfflineError> {
        if request.is_get() {
            if let Some(hit) = self.storage.lookup(&request.url) {
                debug!("Cache hit for {}", request.url);
                return Ok(hit.clone());
            }
        }

        match network.fetch(request) {
            Ok(response) => {
                if request.is_get() && response.is_cacheable() {
                    self.storage
                        .open(&self.version)
                        .put(request.url.clone(), response.clone());
                }
                Ok(response)
            }
            Err(e) if request.mode == RequestMode::Navigate => {
                warn!("Network failed for {}, serving cached root: {}", request.url, e);
                self.storage
                    .lookup("/")
                    .cloned()
                    .ok_or_else(|| OfflineError::Offline {
                        url: request.url.clone(),
                    })
            }
            Err(e) => Err(e),
        }
    }
}
