//! Resource fetching behind a trait seam.
//!
//! The converter only needs "give me the bytes at this location". Putting that
//! behind [`ResourceFetcher`] lets tests serve remote resources from memory
//! instead of the network.

use std::cell::OnceCell;
use std::fmt;
use std::path::PathBuf;

use log::debug;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::error::FetchError;

/// Prefix that marks a reference as remote
pub const REMOTE_PREFIX: &str = "http://";

/// A resolved resource reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocation {
    /// `http://` address, used verbatim
    Remote(String),
    /// Absolute filesystem path
    Local(PathBuf),
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Trait for abstracting resource retrieval.
pub trait ResourceFetcher {
    /// Return the full contents behind `location`.
    fn fetch(&self, location: &ResourceLocation) -> Result<Vec<u8>, FetchError>;
}

impl<F: ResourceFetcher + ?Sized> ResourceFetcher for &F {
    fn fetch(&self, location: &ResourceLocation) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(location)
    }
}

/// Real fetcher: plain HTTP GET for remote locations, `std::fs::read` for local ones.
///
/// The HTTP client is built on the first remote fetch, so stylesheets with only
/// local references never start one.
#[derive(Default)]
pub struct RealFetcher {
    client: OnceCell<Client>,
}

impl RealFetcher {
    /// Create a fetcher
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self, url: &str) -> Result<&Client, FetchError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;
        Ok(self.client.get_or_init(|| client))
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("GET {}", url);
        let http_err = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client(url)?.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(http_err)?;
        Ok(body.to_vec())
    }
}

impl ResourceFetcher for RealFetcher {
    fn fetch(&self, location: &ResourceLocation) -> Result<Vec<u8>, FetchError> {
        match location {
            ResourceLocation::Remote(url) => self.get(url),
            ResourceLocation::Local(path) => {
                debug!("reading {}", path.display());
                std::fs::read(path).map_err(|source| FetchError::Local {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}
