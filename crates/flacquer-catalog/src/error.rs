// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("catalog responded with status {status}")]
    HttpStatus { status: u16 },

    #[error("download response carries no Content-Length header")]
    MissingContentLength,

    #[error("invalid response from catalog: {0}")]
    InvalidResponse(String),

    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),
}
