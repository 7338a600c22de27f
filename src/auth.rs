use anyhow::{bail, Context, Result};
use google_sheets4::{hyper, hyper_rustls, oauth2, Sheets};
use tracing::{debug, info};

use crate::cfg::Cfg;
use crate::sheets::SheetsHub;

/// Build an authenticated Sheets hub. The first run opens a browser
/// authorization flow; the resulting token is cached at `auth_token_file`
/// and refreshed from there afterwards.
pub async fn sheets_hub(cfg: &Cfg) -> Result<SheetsHub> {
    if cfg.client_secret_file.is_empty() {
        bail!("no client secret file found; set client_secret_file in the config or pass --client-secret-file");
    }
    if cfg.auth_token_file.is_empty() {
        bail!("no auth token file found; set auth_token_file in the config or pass --auth-token-file");
    }

    info!("Initializing Google Sheets authentication");

    let secret = oauth2::read_application_secret(&cfg.client_secret_file)
        .await
        .with_context(|| {
            format!(
                "unable to read client secret file: {}",
                cfg.client_secret_file
            )
        })?;

    if let Some(parent) = std::path::Path::new(&cfg.auth_token_file).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let auth = oauth2::InstalledFlowAuthenticator::builder(
        secret,
        oauth2::InstalledFlowReturnMethod::HTTPRedirect,
    )
    .persist_tokens_to_disk(cfg.auth_token_file.as_str())
    .build()
    .await
    .context("unable to build authenticator")?;

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();
    let client = hyper::Client::builder().build::<_, hyper::Body>(https);

    debug!("Sheets hub ready");
    Ok(Sheets::new(client, auth))
}
