//! HTTP Client Factory
//!
//! Builds reqwest clients with the configured timeouts and proxy.

use std::time::Duration;

use studylink_core::transport::TransportConfig;

/// Build a `reqwest::Client` from the transport settings.
///
/// - `Some(proxy)` -> route all traffic through the proxy
/// - `None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
pub fn build_http_client(transport: &TransportConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(transport.request_timeout_secs))
        .connect_timeout(Duration::from_secs(transport.connect_timeout_secs));

    match &transport.proxy {
        Some(cfg) => {
            let mut proxy = reqwest::Proxy::all(cfg.url())?;
            if let (Some(user), Some(password)) = (&cfg.username, &cfg.password) {
                proxy = proxy.basic_auth(user, password);
            }
            builder = builder.proxy(proxy);
        }
        None => {
            builder = builder.no_proxy();
        }
    }

    builder.build()
}
