use std::time::Duration;

use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::{Result, YomitoriError};
use crate::geometry::Orientation;
use crate::raster::CroppedRegion;

const REGION_FILE_NAME: &str = "processed-region.png";

#[derive(Debug, Serialize)]
struct PageOcrRequest<'a> {
    image: &'a str,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    text: Vec<String>,
}

/// Client for the cropped-region endpoint. Sends the encoded region and its
/// orientation as a multipart form.
#[derive(Debug, Clone)]
pub struct RegionOcrClient {
    client: Client,
    url: String,
}

impl RegionOcrClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.region_url.clone(),
        })
    }

    /// Submit a cropped region for recognition. Consumes the region: the
    /// pixel buffer is released as soon as it has been encoded into the
    /// outgoing payload. One request, no retry.
    pub async fn submit(
        &self,
        region: CroppedRegion,
        orientation: Orientation,
    ) -> Result<Vec<String>> {
        let png = region.into_png_bytes()?;
        let image = multipart::Part::bytes(png)
            .file_name(REGION_FILE_NAME)
            .mime_str("image/png")?;
        let form = multipart::Form::new()
            .part("image", image)
            .text("orientation", orientation.as_str());

        debug!(url = %self.url, orientation = orientation.as_str(), "Submitting cropped region");
        let response = self.client.post(&self.url).multipart(form).send().await?;
        read_lines(response).await
    }
}

/// Client for the whole-page endpoint. Sends a JSON body whose `image`
/// field is a data URL or a plain URL the backend can fetch itself.
#[derive(Debug, Clone)]
pub struct PageOcrClient {
    client: Client,
    url: String,
}

impl PageOcrClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.page_url.clone(),
        })
    }

    pub async fn submit(&self, image: &str) -> Result<Vec<String>> {
        debug!(url = %self.url, "Submitting page image");
        let response = self
            .client
            .post(&self.url)
            .json(&PageOcrRequest { image })
            .send()
            .await?;
        read_lines(response).await
    }
}

/// Shared response contract for both endpoints: non-2xx is a backend
/// failure carrying status and body; a 2xx body must hold a non-empty
/// `text` array, anything else means no usable text was detected.
async fn read_lines(response: Response) -> Result<Vec<String>> {
    let status = response.status();
    debug!(status = %status, "OCR backend responded");

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        return Err(YomitoriError::Backend {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    let parsed: OcrResponse = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Unusable OCR response body: {e}");
            return Err(YomitoriError::EmptyResult);
        }
    };

    if parsed.text.is_empty() {
        return Err(YomitoriError::EmptyResult);
    }
    Ok(parsed.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SelectionRect;
    use crate::raster::crop_region;
    use image::{DynamicImage, RgbaImage};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    /// The built-in string matcher requires the whole body to be valid
    /// UTF-8, which a multipart body embedding raw PNG bytes is not.
    struct FormContains(&'static str);

    impl Match for FormContains {
        fn matches(&self, request: &Request) -> bool {
            String::from_utf8_lossy(&request.body).contains(self.0)
        }
    }

    fn test_backend(server: &MockServer) -> BackendConfig {
        BackendConfig {
            page_url: format!("{}/ocr", server.uri()),
            region_url: format!("{}/ocr_local", server.uri()),
            timeout_secs: 10,
        }
    }

    fn test_region() -> CroppedRegion {
        let source = DynamicImage::ImageRgba8(RgbaImage::new(64, 64));
        let rect = SelectionRect {
            x: 8.0,
            y: 8.0,
            width: 32.0,
            height: 16.0,
        };
        crop_region(&source, &rect).unwrap()
    }

    #[tokio::test]
    async fn test_region_submit_sends_multipart_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ocr_local"))
            .and(FormContains("name=\"image\""))
            .and(FormContains("filename=\"processed-region.png\""))
            .and(FormContains("name=\"orientation\""))
            .and(FormContains("vertical"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": ["縦書き"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RegionOcrClient::new(&test_backend(&server)).unwrap();
        let lines = client
            .submit(test_region(), Orientation::Vertical)
            .await
            .unwrap();
        assert_eq!(lines, vec!["縦書き".to_string()]);
    }

    #[tokio::test]
    async fn test_page_submit_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ocr"))
            .and(body_json(serde_json::json!({
                "image": "data:image/png;base64,AAAA"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": ["line one", "line two"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PageOcrClient::new(&test_backend(&server)).unwrap();
        let lines = client.submit("data:image/png;base64,AAAA").await.unwrap();
        assert_eq!(lines, vec!["line one".to_string(), "line two".to_string()]);
    }

    #[tokio::test]
    async fn test_lines_are_returned_in_backend_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ocr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": ["third", "first", "second"]
            })))
            .mount(&server)
            .await;

        let client = PageOcrClient::new(&test_backend(&server)).unwrap();
        let lines = client.submit("ref").await.unwrap();
        assert_eq!(lines, vec!["third", "first", "second"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_backend_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ocr_local"))
            .respond_with(ResponseTemplate::new(500).set_body_string("engine exploded"))
            .mount(&server)
            .await;

        let client = RegionOcrClient::new(&test_backend(&server)).unwrap();
        let result = client.submit(test_region(), Orientation::Horizontal).await;

        match result {
            Err(YomitoriError::Backend { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "engine exploded");
            }
            other => panic!("expected BackendError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_text_array_is_empty_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ocr"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": [] })),
            )
            .mount(&server)
            .await;

        let client = PageOcrClient::new(&test_backend(&server)).unwrap();
        let result = client.submit("ref").await;
        assert!(matches!(result, Err(YomitoriError::EmptyResult)));
    }

    #[tokio::test]
    async fn test_missing_text_field_is_empty_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ocr"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })),
            )
            .mount(&server)
            .await;

        let client = PageOcrClient::new(&test_backend(&server)).unwrap();
        let result = client.submit("ref").await;
        assert!(matches!(result, Err(YomitoriError::EmptyResult)));
    }

    #[tokio::test]
    async fn test_text_of_the_wrong_shape_is_empty_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ocr_local"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "a bare string, not an array"
            })))
            .mount(&server)
            .await;

        let client = RegionOcrClient::new(&test_backend(&server)).unwrap();
        let result = client.submit(test_region(), Orientation::Horizontal).await;
        assert!(matches!(result, Err(YomitoriError::EmptyResult)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_error() {
        let config = BackendConfig {
            page_url: "http://127.0.0.1:1/ocr".to_string(),
            region_url: "http://127.0.0.1:1/ocr_local".to_string(),
            timeout_secs: 1,
        };

        let client = PageOcrClient::new(&config).unwrap();
        let result = client.submit("ref").await;
        assert!(matches!(result, Err(YomitoriError::Network(_))));
    }
}
