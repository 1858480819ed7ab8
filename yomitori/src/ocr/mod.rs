//! OCR submission module
//!
//! This module carries a selected region (or a whole page) to a remote OCR
//! backend and turns the response into ordered text lines.
//!
//! # Architecture
//!
//! Two submission modes coexist and stay independent contracts:
//! - `RegionOcrClient` posts a cropped region as a multipart form
//!   (`image` + `orientation` fields) to the region endpoint.
//! - `PageOcrClient` posts a JSON body (`{"image": <locator>}`) to the
//!   whole-page endpoint, where the locator is a data URL or a plain URL.
//!
//! `OcrSession` wraps both clients and enforces the single-active-request
//! policy: overlapping submissions are rejected, and results that resolve
//! for a superseded selection are discarded by token comparison.
//!
//! # Configuration
//!
//! Behavior is controlled via `BackendConfig` and `FilterConfig` (see
//! `config.rs`):
//! - `page_url` / `region_url`: the two endpoints
//! - `timeout_secs`: request timeout for both clients
//! - `threshold`: binarization cutoff for the whole-page path
//!
//! # Usage
//!
//! ```rust,ignore
//! let session = OcrSession::new(&config.backend)?;
//! let lines = session.submit_region(region, orientation).await?;
//! ```

mod client;
mod preprocessing;
mod session;

pub use client::{PageOcrClient, RegionOcrClient};
pub use preprocessing::{binarize, preprocess_page};
pub use session::OcrSession;
