use anyhow::{Context, Result};
use url::Url;

pub const PRODUCTS_PATH: &str = "products.json";
pub const LOGS_PATH: &str = "api/logs";

/// Absolute locations of the two HTTP collaborators, resolved from one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub products: Url,
    pub logs: Url,
}

impl Endpoints {
    pub fn from_base(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url.trim())
            .with_context(|| format!("invalid catalog base url '{base_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            products: base
                .join(PRODUCTS_PATH)
                .context("failed to resolve products endpoint")?,
            logs: base.join(LOGS_PATH).context("failed to resolve log endpoint")?,
        })
    }
}
