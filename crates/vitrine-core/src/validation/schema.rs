//! Per-kind form rules.

use crate::models::{fields, MediaCategory, ResourceKind};

use super::{FieldErrors, ItemFields, MediaEntryFields, NormalizedFields, RawInput};

/// Minimum number of characters in an item title
pub const MIN_TITLE_LENGTH: usize = 5;

const REQUIRED: &str = "This field is required";

/// Check `raw` against the rules for `kind`.
///
/// The asset field only has to be non-empty: before submission it may hold the
/// label of a selected file, which the submission workflow later replaces with
/// the uploaded asset reference.
pub fn validate(kind: ResourceKind, raw: &RawInput) -> Result<NormalizedFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let normalized = match kind {
        ResourceKind::Item => {
            let title = trimmed(raw, fields::TITLE);
            if title.is_empty() {
                errors.insert(fields::TITLE, REQUIRED);
            } else if title.chars().count() < MIN_TITLE_LENGTH {
                errors.insert(
                    fields::TITLE,
                    format!("Title must be at least {} characters", MIN_TITLE_LENGTH),
                );
            }

            let description = trimmed(raw, fields::DESCRIPTION);
            if description.is_empty() {
                errors.insert(fields::DESCRIPTION, REQUIRED);
            }

            let img_url = trimmed(raw, fields::IMG_URL);
            if img_url.is_empty() {
                errors.insert(fields::IMG_URL, REQUIRED);
            }

            NormalizedFields::Item(ItemFields {
                title: title.to_string(),
                description: description.to_string(),
                img_url: img_url.to_string(),
            })
        }
        ResourceKind::MediaEntry => {
            let category = trimmed(raw, fields::CATEGORY).parse::<MediaCategory>();
            if category.is_err() {
                errors.insert(fields::CATEGORY, "Video type is not selected");
            }

            let video_url = trimmed(raw, fields::VIDEO_URL);
            if video_url.is_empty() {
                errors.insert(fields::VIDEO_URL, REQUIRED);
            }

            match category {
                Ok(category) if errors.is_empty() => {
                    NormalizedFields::MediaEntry(MediaEntryFields {
                        category,
                        video_url: video_url.to_string(),
                    })
                }
                _ => return Err(errors),
            }
        }
    };

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

fn trimmed<'a>(raw: &'a RawInput, field: &str) -> &'a str {
    raw.get(field).map(str::trim).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> RawInput {
        RawInput::new()
            .with(fields::TITLE, title)
            .with(fields::DESCRIPTION, "Roasted walnuts")
            .with(fields::IMG_URL, "walnut.png")
    }

    #[test]
    fn title_at_minimum_length_passes() {
        let fields = validate(ResourceKind::Item, &item("Sampl")).unwrap();
        assert_eq!(fields.kind(), ResourceKind::Item);
        assert!(validate(ResourceKind::Item, &item("Sample")).is_ok());
    }

    #[test]
    fn short_title_gets_length_error() {
        let errors = validate(ResourceKind::Item, &item("Test")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(fields::TITLE),
            Some("Title must be at least 5 characters")
        );
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        // 4 characters, 8 bytes
        let errors = validate(ResourceKind::Item, &item("ёжик")).unwrap_err();
        assert!(errors.get(fields::TITLE).is_some());
    }

    #[test]
    fn empty_item_reports_every_field() {
        let errors = validate(ResourceKind::Item, &RawInput::new()).unwrap_err();
        assert_eq!(errors.get(fields::TITLE), Some(REQUIRED));
        assert_eq!(errors.get(fields::DESCRIPTION), Some(REQUIRED));
        assert_eq!(errors.get(fields::IMG_URL), Some(REQUIRED));
    }

    #[test]
    fn whitespace_description_is_empty() {
        let raw = item("Walnut box").with(fields::DESCRIPTION, "   ");
        let errors = validate(ResourceKind::Item, &raw).unwrap_err();
        assert_eq!(errors.get(fields::DESCRIPTION), Some(REQUIRED));
    }

    #[test]
    fn media_entry_requires_known_category() {
        let raw = RawInput::new()
            .with(fields::CATEGORY, "contact")
            .with(fields::VIDEO_URL, "clip.mp4");
        let errors = validate(ResourceKind::MediaEntry, &raw).unwrap_err();
        assert_eq!(
            errors.get(fields::CATEGORY),
            Some("Video type is not selected")
        );
        assert!(errors.get(fields::VIDEO_URL).is_none());
    }

    #[test]
    fn media_entry_with_placeholder_label_passes() {
        let raw = RawInput::new()
            .with(fields::CATEGORY, "home")
            .with(fields::VIDEO_URL, "clip.mp4");
        let fields = validate(ResourceKind::MediaEntry, &raw).unwrap();
        assert_eq!(fields.asset_reference(), "clip.mp4");
    }

    #[test]
    fn media_entry_missing_everything() {
        let errors = validate(ResourceKind::MediaEntry, &RawInput::new()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
