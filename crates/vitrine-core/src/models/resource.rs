use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::fields;

/// The two catalogs the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Products, each backed by an image
    Item,
    /// Videos shown on the home or about page
    MediaEntry,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Item, ResourceKind::MediaEntry];

    /// Path segment of the persistence endpoints (`/{segment}`, `/{segment}/{id}`)
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Item => "products",
            ResourceKind::MediaEntry => "videos",
        }
    }

    /// Kind of binary asset backing records of this kind
    pub fn media_kind(&self) -> MediaKind {
        match self {
            ResourceKind::Item => MediaKind::Image,
            ResourceKind::MediaEntry => MediaKind::Video,
        }
    }

    /// Name of the field holding the asset reference
    pub fn asset_field(&self) -> &'static str {
        match self {
            ResourceKind::Item => fields::IMG_URL,
            ResourceKind::MediaEntry => fields::VIDEO_URL,
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ResourceKind::Item => write!(f, "item"),
            ResourceKind::MediaEntry => write!(f, "media"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "item" | "items" | "product" | "products" => Ok(ResourceKind::Item),
            "media" | "media-entry" | "video" | "videos" => Ok(ResourceKind::MediaEntry),
            other => Err(format!(
                "Unknown resource kind '{}' (expected item or media)",
                other
            )),
        }
    }
}

/// Binary asset type; selects the upload endpoint and multipart field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn upload_path(&self) -> &'static str {
        match self {
            MediaKind::Image => "/upload/image",
            MediaKind::Video => "/upload/video",
        }
    }

    pub fn multipart_field(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.multipart_field())
    }
}

/// Page a media entry is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Home,
    About,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 2] = [MediaCategory::Home, MediaCategory::About];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Home => "home",
            MediaCategory::About => "about",
        }
    }
}

impl Display for MediaCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(MediaCategory::Home),
            "about" => Ok(MediaCategory::About),
            other => Err(format!("Unknown media category: {}", other)),
        }
    }
}

/// Store-assigned locator of an uploaded binary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetReference(String);

impl AssetReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for AssetReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(rename = "imgUrl")]
    pub img_url: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub category: MediaCategory,
    #[serde(rename = "videoUrl")]
    pub video_url: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A persisted record of either catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Item(Item),
    MediaEntry(MediaEntry),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Item(_) => ResourceKind::Item,
            Resource::MediaEntry(_) => ResourceKind::MediaEntry,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Resource::Item(item) => item.id.as_deref(),
            Resource::MediaEntry(entry) => entry.id.as_deref(),
        }
    }

    pub fn asset_reference(&self) -> &str {
        match self {
            Resource::Item(item) => &item.img_url,
            Resource::MediaEntry(entry) => &entry.video_url,
        }
    }

    /// Decode a store response body for the given kind.
    pub fn from_json(kind: ResourceKind, value: serde_json::Value) -> serde_json::Result<Self> {
        match kind {
            ResourceKind::Item => serde_json::from_value(value).map(Resource::Item),
            ResourceKind::MediaEntry => serde_json::from_value(value).map(Resource::MediaEntry),
        }
    }

    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        let id = self.id().unwrap_or("-");
        match self {
            Resource::Item(item) => format!("{}  {}  {}", id, item.title, item.img_url),
            Resource::MediaEntry(entry) => {
                format!("{}  {}  {}", id, entry.category, entry.video_url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_uses_store_field_names() {
        let body = serde_json::json!({
            "_id": "66f1",
            "title": "Walnut box",
            "description": "Roasted",
            "imgUrl": "https://store/a.png",
            "createdAt": "2024-09-23T10:00:00Z",
            "updatedAt": "2024-09-23T10:00:00Z",
            "__v": 0
        });
        let resource = Resource::from_json(ResourceKind::Item, body).unwrap();
        assert_eq!(resource.kind(), ResourceKind::Item);
        assert_eq!(resource.id(), Some("66f1"));
        assert_eq!(resource.asset_reference(), "https://store/a.png");
    }

    #[test]
    fn media_entry_category_is_lowercase_type() {
        let body = serde_json::json!({ "_id": "1", "type": "about", "videoUrl": "v.mp4" });
        let resource = Resource::from_json(ResourceKind::MediaEntry, body).unwrap();
        match resource {
            Resource::MediaEntry(entry) => assert_eq!(entry.category, MediaCategory::About),
            other => panic!("unexpected resource: {:?}", other),
        }
    }

    #[test]
    fn unknown_category_fails_to_decode() {
        let body = serde_json::json!({ "_id": "1", "type": "contact", "videoUrl": "v.mp4" });
        assert!(Resource::from_json(ResourceKind::MediaEntry, body).is_err());
    }

    #[test]
    fn kind_parsing_accepts_aliases() {
        assert_eq!("products".parse::<ResourceKind>(), Ok(ResourceKind::Item));
        assert_eq!("Videos".parse::<ResourceKind>(), Ok(ResourceKind::MediaEntry));
        assert!("folders".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn media_kind_selects_endpoint() {
        assert_eq!(ResourceKind::Item.media_kind().upload_path(), "/upload/image");
        assert_eq!(MediaKind::Video.multipart_field(), "video");
    }
}
