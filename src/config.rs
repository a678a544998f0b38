use anyhow::Result;

/// Credentials for the hosted popularity scoring endpoint
#[derive(Debug)]
pub struct ScoringConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Optional deployment pin; when unset the endpoint's traffic rules
    /// pick the deployment.
    pub deployment: Option<String>,
}

/// Credentials for the catalog recommendation API
#[derive(Debug)]
pub struct CatalogConfig {
    pub base_url: String,
    pub token: String,
}

/// Load scoring configuration from `.env` and environment
pub fn load_scoring_config() -> Result<ScoringConfig> {
    dotenv::dotenv().ok();
    let endpoint = std::env::var("SCORING_URL")?;
    let api_key = std::env::var("SCORING_API_KEY")?;
    let deployment = std::env::var("SCORING_DEPLOYMENT").ok();
    Ok(ScoringConfig {
        endpoint,
        api_key,
        deployment,
    })
}

/// Load catalog configuration from `.env` and environment
pub fn load_catalog_config() -> Result<CatalogConfig> {
    dotenv::dotenv().ok();
    let base_url = std::env::var("CATALOG_URL")?;
    let token = std::env::var("CATALOG_TOKEN")?;
    Ok(CatalogConfig { base_url, token })
}
