mod common;

use std::sync::Arc;

use axum::http::Method;

use common::{pet_json, MockServer};
use petcare::api::photos::MAX_FILE_SIZE;
use petcare::api::{ImageFile, PhotoService};
use petcare::models::Pet;
use petcare::store::SilentNotifier;
use petcare::{ApiClient, ApiError, EntityStore, ListFilter, SessionStore};

fn png(name: &str, size: usize) -> ImageFile {
    ImageFile::new(name, "image/png", vec![0u8; size])
}

fn setup(server: &MockServer) -> (PhotoService, EntityStore<Pet>) {
    let client = ApiClient::new(&server.base_url, Arc::new(SessionStore::in_memory()));
    let photos = PhotoService::new(client.clone());
    let pets = EntityStore::remote(client, Arc::new(SilentNotifier));
    (photos, pets)
}

#[tokio::test]
async fn test_oversized_file_is_rejected_before_sending() {
    let server = MockServer::start().await;
    let (photos, pets) = setup(&server);
    let big = png("big.png", 6 * 1024 * 1024);

    let err = photos.upload_profile("pet-1", big.clone()).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(_)));
    assert!(err.to_string().contains("too large"));

    assert!(!pets.upload_photo(&photos, "pet-1", big).await);
    assert_eq!(
        pets.error().as_deref(),
        Some("File 'big.png' is too large. The maximum size is 5MB.")
    );
    assert!(!pets.is_loading());
    assert_eq!(server.request_count(), 0);
}

#[tokio::test]
async fn test_file_at_the_limit_is_sent() {
    let server = MockServer::start().await;
    let (photos, _) = setup(&server);

    let upload = photos
        .upload_profile("pet-1", png("edge.png", MAX_FILE_SIZE))
        .await
        .unwrap();

    assert_eq!(upload.url, "https://cdn.example.com/pets/pet-1/profile.png");
    assert_eq!(
        server
            .requests_to(Method::POST, "/images/pets/pet-1/profile")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_upload_points_cached_pet_at_new_photo() {
    let server = MockServer::start().await;
    server.seed("pets", pet_json("pet-1", "Toby"));
    server.seed("pets", pet_json("pet-2", "Iggy"));
    let (photos, pets) = setup(&server);
    pets.fetch_all(&ListFilter::all()).await;
    pets.fetch_by_id("pet-1").await;

    assert!(pets.upload_photo(&photos, "pet-1", png("toby.png", 1024)).await);

    let url = Some("https://cdn.example.com/pets/pet-1/profile.png".to_string());
    assert_eq!(pets.get_by_id("pet-1").and_then(|p| p.photo_url), url);
    assert_eq!(pets.selected().and_then(|p| p.photo_url), url);
    assert!(pets.get_by_id("pet-2").and_then(|p| p.photo_url).is_none());
}

#[tokio::test]
async fn test_gallery_batch_limits() {
    let server = MockServer::start().await;
    let (photos, _) = setup(&server);

    let six: Vec<ImageFile> = (0..6).map(|i| png(&format!("{}.png", i), 10)).collect();
    let err = photos.upload_gallery("pet-1", six).await.unwrap_err();
    assert!(err.to_string().starts_with("Too many files (6)"));

    let mixed = vec![
        png("ok.png", 10),
        ImageFile::new("notes.pdf", "application/pdf", vec![0u8; 10]),
    ];
    let err = photos.upload_gallery("pet-1", mixed).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "File 'notes.pdf' has unsupported type 'application/pdf'. Allowed: JPG, PNG, GIF, WEBP"
    );

    let err = photos.upload_gallery("pet-1", Vec::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "No files selected");

    assert_eq!(server.request_count(), 0);
}
