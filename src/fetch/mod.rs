// src/fetch/mod.rs

pub mod direct;
pub mod http;
pub mod scrape;

pub use http::{HttpResponse, ReqwestTransport, Transport};

use url::Url;

use crate::error::{Error, Result};

/// GET `url`, turning any non-success status into `Error::Fetch`.
pub fn get_checked<T: Transport + ?Sized>(transport: &T, url: &Url) -> Result<HttpResponse> {
    let resp = transport.get(url)?;
    if !resp.is_success() {
        return Err(Error::Fetch {
            endpoint: url.to_string(),
            status: resp.status,
        });
    }
    Ok(resp)
}
