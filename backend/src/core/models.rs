use serde::{Deserialize, Serialize};

pub type PhotoId = i64;

/// A remote photo record.  Identity is `id`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: PhotoId,
    pub album_id: i64,
    pub title: String,
    pub thumbnail_url: String,
    #[serde(alias = "url")]
    pub image_url: String,
    #[serde(default)]
    pub album_title: Option<String>,
}

/// Persisted projection of a [`Photo`].  Legacy rows may lack the image URL.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SavedPhotoRecord {
    pub id: PhotoId,
    pub album_id: i64,
    pub title: String,
    pub thumbnail_url: String,
    pub image_url: Option<String>,
    pub album_title: Option<String>,
}

impl From<&Photo> for SavedPhotoRecord {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id,
            album_id: photo.album_id,
            title: photo.title.clone(),
            thumbnail_url: photo.thumbnail_url.clone(),
            image_url: Some(photo.image_url.clone()),
            album_title: photo.album_title.clone(),
        }
    }
}

impl From<SavedPhotoRecord> for Photo {
    fn from(record: SavedPhotoRecord) -> Self {
        Self {
            id: record.id,
            album_id: record.album_id,
            title: record.title,
            thumbnail_url: record.thumbnail_url,
            image_url: record.image_url.unwrap_or_default(),
            album_title: record.album_title,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
}

/// Tri-state wrapper that drives both photo lists.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ListState<T> {
    Loading,
    Loaded { items: Vec<T> },
    Failed { error: String },
}

impl<T> ListState<T> {
    pub fn loaded(items: Vec<T>) -> Self {
        Self::Loaded { items }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }

    /// Items when loaded, `None` for the other two variants.
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Self::Loaded { items } => Some(items),
            Self::Loading | Self::Failed { .. } => None,
        }
    }
}

impl ListState<Photo> {
    pub fn find(&self, id: PhotoId) -> Option<&Photo> {
        self.items()?.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
pub(crate) fn sample_photo(id: PhotoId) -> Photo {
    Photo {
        id,
        album_id: 1,
        title: format!("photo {id}"),
        thumbnail_url: format!("https://via.placeholder.com/150/{id}"),
        image_url: format!("https://via.placeholder.com/600/{id}"),
        album_title: None,
    }
}
