#![allow(dead_code)]

use vitrine_console::PendingUpload;
use vitrine_core::models::{Item, MediaCategory, MediaEntry, Resource};

pub fn item(id: &str, img_url: &str) -> Resource {
    Resource::Item(Item {
        id: Some(id.to_string()),
        title: "Walnut side table".to_string(),
        description: "Solid walnut, oiled finish".to_string(),
        img_url: img_url.to_string(),
        created_at: None,
        updated_at: None,
    })
}

pub fn media_entry(id: &str, category: MediaCategory, video_url: &str) -> Resource {
    Resource::MediaEntry(MediaEntry {
        id: Some(id.to_string()),
        category,
        video_url: video_url.to_string(),
        created_at: None,
        updated_at: None,
    })
}

/// 200 KiB of video, labelled `clip.mp4`
pub fn video_file() -> PendingUpload {
    PendingUpload::new(vec![7u8; 200 * 1024], "video/mp4").with_label("clip.mp4")
}

pub fn image_file() -> PendingUpload {
    PendingUpload::new(vec![1u8; 4096], "image/png").with_label("table.png")
}
