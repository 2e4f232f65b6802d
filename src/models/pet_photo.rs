use serde::{Deserialize, Serialize};

/// Photo metadata as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetPhotoResponse {
    pub id: String,
    pub pet_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size_bytes: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPhoto {
    pub id: String,
    pub pet_id: String,
    pub file_name: Option<String>,
    pub file_size_bytes: Option<u64>,
    pub mime_type: Option<String>,
    pub url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PetPhotoResponse> for PetPhoto {
    fn from(wire: PetPhotoResponse) -> Self {
        Self {
            id: wire.id,
            pet_id: wire.pet_id,
            file_name: wire.file_name,
            file_size_bytes: wire.file_size_bytes,
            mime_type: wire.mime_type,
            url: wire.url,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

impl From<&PetPhoto> for PetPhotoResponse {
    fn from(photo: &PetPhoto) -> Self {
        Self {
            id: photo.id.clone(),
            pet_id: photo.pet_id.clone(),
            file_name: photo.file_name.clone(),
            file_size_bytes: photo.file_size_bytes,
            mime_type: photo.mime_type.clone(),
            url: photo.url.clone(),
            created_at: photo.created_at.clone(),
            updated_at: photo.updated_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_through_wire() {
        let wire: PetPhotoResponse = serde_json::from_value(json!({
            "id": "ph-1",
            "pet_id": "pet-1",
            "file_name": "luna.jpg",
            "file_size_bytes": 2048,
            "mime_type": "image/jpeg",
            "url": "https://cdn.example.com/luna.jpg",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        let photo = PetPhoto::from(wire.clone());
        assert_eq!(photo.file_size_bytes, Some(2048));
        assert_eq!(PetPhotoResponse::from(&photo), wire);
    }
}
