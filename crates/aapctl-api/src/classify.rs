// Status contract of the controller API.
//
// 2xx is success with a body, 404 is `NotFound`, anything else is `Remote`
// carrying the status and literal body. Successful bodies that do not
// match the expected shape become `Decode`.

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::Error;
use crate::transport::RawResponse;

/// Turn a raw exchange into its body text, or the matching error.
pub fn check_status(method: &Method, path: &str, resp: RawResponse) -> Result<String, Error> {
    match resp.status {
        200..=299 => Ok(resp.body),
        404 => Err(Error::NotFound {
            method: method.clone(),
            path: path.to_owned(),
            body: resp.body,
        }),
        status => {
            warn!(%method, path, status, "controller rejected request");
            Err(Error::Remote {
                method: method.clone(),
                path: path.to_owned(),
                status,
                body: resp.body,
            })
        }
    }
}

/// Decode a successful body into `T`.
pub fn decode<T: DeserializeOwned>(method: &Method, path: &str, body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| Error::Decode {
        method: method.clone(),
        path: path.to_owned(),
        message: e.to_string(),
        body,
    })
}
