//! HTTPS with automatically provisioned Let's Encrypt certificates.

use axum::Router;
use futures::StreamExt;
use rustls_acme::{caches::DirCache, AcmeConfig};
use std::net::{Ipv6Addr, SocketAddr};
use std::path::Path;

use crate::config::constants::TLS_PORT;
use crate::error::Result;

/// Serve `app` on `:443`, obtaining certificates for `domain` only
///
/// Issuance is limited to the one configured domain; the resolver does not
/// filter handshakes by SNI, it just always presents that certificate.
pub async fn serve_with_acme(app: Router, domain: &str, cache_dir: &Path) -> Result<()> {
    let mut state = AcmeConfig::new([domain.to_string()])
        .cache(DirCache::new(cache_dir.to_path_buf()))
        .directory_lets_encrypt(true)
        .state();
    let acceptor = state.axum_acceptor(state.default_rustls_config());

    tokio::spawn(async move {
        while let Some(event) = state.next().await {
            match event {
                Ok(ok) => tracing::info!("ACME event: {:?}", ok),
                Err(err) => tracing::error!("ACME error: {:?}", err),
            }
        }
    });

    let addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, TLS_PORT));
    tracing::info!(domain = %domain, "Starting with AutoTLS on {}", addr);

    axum_server::bind(addr)
        .acceptor(acceptor)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}
