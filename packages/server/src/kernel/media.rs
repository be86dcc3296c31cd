//! Cloudinary-backed media store.
//!
//! Uploads go to the account's `college-marketplace` folder. Requests are
//! signed with SHA-256 over the alphabetically ordered parameters plus the
//! API secret, per the Cloudinary signed-upload protocol.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::kernel::traits::{BaseMediaStore, MediaAsset};

const UPLOAD_FOLDER: &str = "college-marketplace";

pub struct CloudinaryMediaStore {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryMediaStore {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloud_name,
            api_key,
            api_secret,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/{}",
            self.cloud_name, action
        )
    }

    /// Sign `key=value` pairs. Pairs must already be in alphabetical order.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let to_sign = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl BaseMediaStore for CloudinaryMediaStore {
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<MediaAsset> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("folder", UPLOAD_FOLDER), ("timestamp", &timestamp)]);

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("folder", UPLOAD_FOLDER)
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string()),
            );

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .context("Media upload request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Media upload rejected ({}): {}", status, body));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .context("Invalid media upload response")?;

        Ok(MediaAsset {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .http
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await
            .context("Media delete request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Media delete rejected ({}): {}", status, body));
        }

        let destroyed: DestroyResponse = response
            .json()
            .await
            .context("Invalid media delete response")?;

        // "not found" means the asset is already gone, which is fine.
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(anyhow!("Media delete failed: {}", other)),
        }
    }
}
