//! Upload handling for pet pictures
//!
//! Pet writes accept either `multipart/form-data` or JSON. [`FormPayload`]
//! normalizes both into a map of fields, storing the `picture` file part (if
//! any) in the uploads directory on the way.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request},
    extract::multipart::MultipartError,
    http::header::CONTENT_TYPE,
};
use rand::Rng;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::{error::ApiError, state::AppState};

/// Name of the only file part accepted on pet routes
pub const PICTURE_FIELD: &str = "picture";

/// URL prefix uploaded files are served under
pub const PUBLIC_PREFIX: &str = "/uploads";

/// A file written to the uploads directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
}

impl StoredFile {
    /// Relative URL recorded on the pet, e.g. `/uploads/picture-1700000000000-42.png`
    pub fn public_path(&self) -> String {
        format!("{PUBLIC_PREFIX}/{}", self.filename)
    }
}

/// Local directory holding uploaded files
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the uploads directory if it does not exist yet
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `bytes` under a freshly generated name
    pub async fn save(
        &self,
        field_name: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> std::io::Result<StoredFile> {
        let filename = generate_filename(field_name, original_name);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;
        info!("Stored upload {} ({} bytes)", filename, bytes.len());
        Ok(StoredFile { filename })
    }

    /// Best-effort removal of a stored file
    pub async fn remove(&self, file: &StoredFile) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(&file.filename)).await {
            warn!("Failed to remove upload {}: {}", file.filename, e);
        }
    }
}

/// `<field>-<unix millis>-<random><ext>`; the extension comes from the client
/// filename, `.jpg` when it has none
pub fn generate_filename(field_name: &str, original_name: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!(
        "{}-{}-{}{}",
        sanitize(field_name),
        millis,
        suffix,
        extension_of(original_name)
    )
}

fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(sanitize)
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| ".jpg".to_string())
}

fn sanitize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(32)
        .collect()
}

/// Body of a pet write: loose fields plus an optional stored picture
#[derive(Debug, Default)]
pub struct FormPayload {
    pub fields: Map<String, Value>,
    pub file: Option<StoredFile>,
}

impl FormPayload {
    /// Public path of the stored picture, if one was uploaded
    pub fn picture_path(&self) -> Option<String> {
        self.file.as_ref().map(StoredFile::public_path)
    }

    /// Drop the stored picture again after the request failed
    pub async fn discard(self, store: &UploadStore) {
        if let Some(file) = self.file {
            store.remove(&file).await;
        }
    }
}

#[axum::async_trait]
impl FromRequest<AppState> for FormPayload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(fields) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    ApiError::rejected(rejection.status(), rejection.body_text())
                })?;
            return Ok(FormPayload { fields, file: None });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::rejected(rejection.status(), rejection.body_text())
            })?;

        let mut payload = FormPayload::default();
        if let Err(e) = read_multipart(multipart, &state.uploads, &mut payload).await {
            payload.discard(&state.uploads).await;
            return Err(e);
        }
        Ok(payload)
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::rejected(e.status(), e.body_text())
}

async fn read_multipart(
    mut multipart: Multipart,
    store: &UploadStore,
    payload: &mut FormPayload,
) -> Result<(), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = field
                .text()
                .await
                .map_err(multipart_error)?;
            payload.fields.insert(name, Value::String(text));
            continue;
        };

        if name != PICTURE_FIELD || payload.file.is_some() {
            return Err(ApiError::BadRequest(format!("Unexpected file field '{name}'")));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        // A file input left empty still sends a part with an empty filename
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }

        let stored = store.save(&name, Some(&file_name), &bytes).await.map_err(|e| {
            error!("Failed to store upload: {}", e);
            ApiError::InternalServerError
        })?;
        payload.file = Some(stored);
    }

    Ok(())
}
