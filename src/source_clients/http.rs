use crate::config::AppConfig;
use crate::error::AppError;
use crate::metadata::CaptureRecord;
use crate::source::CaptureSource;
use image::{DynamicImage, ImageFormat};
use std::io::Read;
use url::Url;

/// Blocking HTTP client for the NICT Himawari-8 endpoints.
pub struct HttpSource {
    agent: ureq::Agent,
    metadata_url: Url,
}

impl HttpSource {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        log::debug!("Creating HTTP source for metadata URL: {}", config.metadata_url);
        let metadata_url = Url::parse(&config.metadata_url)?;
        let agent = ureq::AgentBuilder::new().build();
        Ok(Self { agent, metadata_url })
    }
}

impl CaptureSource for HttpSource {
    fn latest_capture(&self) -> Result<CaptureRecord, AppError> {
        log::debug!("Requesting latest capture from {}", self.metadata_url);
        let record: CaptureRecord = self
            .agent
            .request_url("GET", &self.metadata_url)
            .call()?
            .into_json()?;
        log::trace!("Latest capture descriptor: {:?}", record);
        Ok(record)
    }

    fn fetch_tile(&self, url: &str) -> Result<DynamicImage, AppError> {
        log::trace!("GET {}", url);
        let response = self.agent.get(url).call()?;
        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        log::trace!("Received {} bytes from {}", bytes.len(), url);
        Ok(image::load_from_memory_with_format(&bytes, ImageFormat::Png)?)
    }
}
