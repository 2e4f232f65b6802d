//! Pet image uploads and gallery management.
//!
//! Files are checked locally (size, MIME type, batch size) before anything
//! is sent; a rejected upload never reaches the backend.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::ApiClient;
use super::error::ApiError;

const IMAGES_ENDPOINT: &str = "/images/pets";

/// Largest accepted file, in bytes (5 MiB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Most files accepted in one gallery upload
pub const MAX_GALLERY_FILES: usize = 5;

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

#[derive(Debug, Clone, PartialEq)]
pub enum UploadError {
    TooLarge { file_name: String, size: usize },
    UnsupportedType { file_name: String, mime_type: String },
    TooManyFiles(usize),
    NoFiles,
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::TooLarge { file_name, .. } => write!(
                f,
                "File '{}' is too large. The maximum size is 5MB.",
                file_name
            ),
            UploadError::UnsupportedType { file_name, mime_type } => write!(
                f,
                "File '{}' has unsupported type '{}'. Allowed: JPG, PNG, GIF, WEBP",
                file_name, mime_type
            ),
            UploadError::TooManyFiles(n) => write!(
                f,
                "Too many files ({}). At most {} photos per upload.",
                n, MAX_GALLERY_FILES
            ),
            UploadError::NoFiles => write!(f, "No files selected"),
        }
    }
}

impl std::error::Error for UploadError {}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        ApiError::Rejected(e.to_string())
    }
}

/// An image held in memory, ready to upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn validate(&self) -> Result<(), UploadError> {
        if self.size() > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge {
                file_name: self.file_name.clone(),
                size: self.size(),
            });
        }
        if !ALLOWED_MIME_TYPES.contains(&self.mime_type.as_str()) {
            return Err(UploadError::UnsupportedType {
                file_name: self.file_name.clone(),
                mime_type: self.mime_type.clone(),
            });
        }
        Ok(())
    }

    fn into_part(self) -> Result<Part, ApiError> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(ApiError::from)
    }
}

/// Checks a gallery batch: count first, then each file.
pub fn validate_gallery(files: &[ImageFile]) -> Result<(), UploadError> {
    if files.is_empty() {
        return Err(UploadError::NoFiles);
    }
    if files.len() > MAX_GALLERY_FILES {
        return Err(UploadError::TooManyFiles(files.len()));
    }
    files.iter().try_for_each(ImageFile::validate)
}

/// Backend answer to an image upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    #[serde(default)]
    pub url: String,
    pub key: Option<String>,
    pub size: Option<u64>,
    pub bucket: Option<String>,
    pub photo_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    Profile,
    Gallery,
}

impl std::fmt::Display for PhotoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoKind::Profile => write!(f, "profile"),
            PhotoKind::Gallery => write!(f, "gallery"),
        }
    }
}

/// One entry of a pet's photo listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoItem {
    pub photo_id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: PhotoKind,
}

impl std::fmt::Display for PhotoItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.photo_id, self.kind, self.url)
    }
}

#[derive(Deserialize)]
struct RawPhoto {
    photo_id: Option<String>,
    id: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(rename = "type")]
    kind: Option<PhotoKind>,
}

/// Normalizes a photo listing, which the backend returns either as a bare
/// array or wrapped under `photos`, `images` or `gallery`. Entries may carry
/// their id as `photo_id` or `id`.
pub fn parse_photo_list(data: Value) -> Result<Vec<PhotoItem>, ApiError> {
    let raw = match data {
        Value::Array(_) => data,
        Value::Object(mut map) => ["photos", "images", "gallery"]
            .iter()
            .find_map(|key| map.remove(*key).filter(Value::is_array))
            .unwrap_or(Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    };

    let photos: Vec<RawPhoto> = serde_json::from_value(raw)?;
    Ok(photos
        .into_iter()
        .map(|p| PhotoItem {
            photo_id: p.photo_id.or(p.id).unwrap_or_default(),
            url: p.url,
            kind: p.kind.unwrap_or(PhotoKind::Gallery),
        })
        .collect())
}

/// Image endpoints for one backend.
#[derive(Clone)]
pub struct PhotoService {
    client: ApiClient,
}

impl PhotoService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn upload_profile(
        &self,
        pet_id: &str,
        file: ImageFile,
    ) -> Result<ImageUploadResponse, ApiError> {
        file.validate()?;
        let form = Form::new().part("file", file.into_part()?);
        let path = format!("{}/{}/profile", IMAGES_ENDPOINT, urlencoding::encode(pet_id));
        self.client.post_multipart(&path, form).await
    }

    pub async fn upload_gallery(
        &self,
        pet_id: &str,
        files: Vec<ImageFile>,
    ) -> Result<Vec<PhotoItem>, ApiError> {
        validate_gallery(&files)?;
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file.into_part()?);
        }
        let path = format!("{}/{}/gallery", IMAGES_ENDPOINT, urlencoding::encode(pet_id));
        let data: Value = self.client.post_multipart(&path, form).await?;
        parse_photo_list(data)
    }

    pub async fn list_photos(&self, pet_id: &str) -> Result<Vec<PhotoItem>, ApiError> {
        let path = format!("{}/{}/photos", IMAGES_ENDPOINT, urlencoding::encode(pet_id));
        let data: Value = self.client.get(&path).await?;
        parse_photo_list(data)
    }

    pub async fn delete_photo(&self, pet_id: &str, photo_id: &str) -> Result<(), ApiError> {
        let path = format!(
            "{}/{}/photos/{}",
            IMAGES_ENDPOINT,
            urlencoding::encode(pet_id),
            urlencoding::encode(photo_id)
        );
        self.client.delete(&path).await
    }

    pub async fn delete_all(&self, pet_id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{}/photos", IMAGES_ENDPOINT, urlencoding::encode(pet_id));
        self.client.delete(&path).await
    }
}
