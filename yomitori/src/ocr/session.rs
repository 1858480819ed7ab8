use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{info, warn};

use crate::config::BackendConfig;
use crate::error::{Result, YomitoriError};
use crate::geometry::Orientation;
use crate::ocr::client::{PageOcrClient, RegionOcrClient};
use crate::raster::CroppedRegion;

/// Coordinates submissions against both OCR endpoints.
///
/// At most one request is in flight at a time: a second submission while one
/// is outstanding is rejected instead of racing it for the result slot.
/// Selections are correlated by a monotonically increasing token; a
/// submission that resolves after `invalidate` has issued a newer token is
/// discarded rather than applied (`Ok(None)`).
pub struct OcrSession {
    region: RegionOcrClient,
    page: PageOcrClient,
    selection_token: AtomicU64,
    busy: AtomicBool,
}

/// Releases the busy flag on every exit path, including early returns.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl OcrSession {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            region: RegionOcrClient::new(config)?,
            page: PageOcrClient::new(config)?,
            selection_token: AtomicU64::new(0),
            busy: AtomicBool::new(false),
        })
    }

    /// Record that the user started a new selection. Any outstanding
    /// submission now belongs to a stale selection and its eventual result
    /// will be dropped.
    pub fn invalidate(&self) -> u64 {
        self.selection_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Submit a cropped region. `Ok(None)` means the result arrived for a
    /// selection that has since been replaced and was discarded.
    pub async fn submit_region(
        &self,
        region: CroppedRegion,
        orientation: Orientation,
    ) -> Result<Option<Vec<String>>> {
        let _guard = self.acquire()?;
        let token = self.selection_token.load(Ordering::SeqCst);
        let outcome = self.region.submit(region, orientation).await;
        self.resolve(token, outcome)
    }

    /// Submit a whole-page image locator. Same staleness contract as
    /// `submit_region`.
    pub async fn submit_page(&self, image: &str) -> Result<Option<Vec<String>>> {
        let _guard = self.acquire()?;
        let token = self.selection_token.load(Ordering::SeqCst);
        let outcome = self.page.submit(image).await;
        self.resolve(token, outcome)
    }

    fn acquire(&self) -> Result<BusyGuard<'_>> {
        if self.busy.swap(true, Ordering::SeqCst) {
            warn!("Rejecting OCR submission: another request is in flight");
            return Err(YomitoriError::SubmissionInFlight);
        }
        Ok(BusyGuard(&self.busy))
    }

    fn resolve(&self, token: u64, outcome: Result<Vec<String>>) -> Result<Option<Vec<String>>> {
        if self.selection_token.load(Ordering::SeqCst) != token {
            info!("Discarding OCR result for a superseded selection");
            return Ok(None);
        }
        outcome.map(Some)
    }
}
