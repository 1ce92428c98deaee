use std::any::Any;

use anyhow::{Context as _, bail};
use log::info;
use serde::Deserialize;
use userdesk_states::{State, assign_impl};
use ustr::Ustr;

/// Largest page the users endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Origin of the backend, without a trailing slash.
    pub api_base_url: String,
    pub page_size: u32,
}

// Environment variables are optional; missing ones fall back to defaults.
#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    page_size: Option<u32>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into().trim_end_matches('/').to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Reads `API_BASE_URL` and `PAGE_SIZE` from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<S: AsRef<str>>(vars: impl IntoIterator<Item = (S, S)>) -> anyhow::Result<Self> {
        let raw: RawConfig = serde_env::from_iter(vars).context("invalid environment")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let mut config = match raw.api_base_url {
            Some(url) => {
                reqwest::Url::parse(&url).with_context(|| format!("API_BASE_URL {url:?}"))?;
                info!("Using API_BASE_URL {url}");
                Self::new(url)
            }
            None => Self::default(),
        };

        if let Some(page_size) = raw.page_size {
            if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
                bail!("PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}, got {page_size}");
            }
            config.page_size = page_size;
        }

        Ok(config)
    }

    /// Root of the versioned REST API.
    pub fn api_url(&self) -> Ustr {
        Ustr::from(&format!("{}/api/v1", self.api_base_url))
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        // Web builds replace this with the page origin at startup.
        if cfg!(target_arch = "wasm32") {
            Self::new("")
        } else {
            Self::new("http://localhost:8080")
        }
    }
}

impl State for BusinessConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}
