//! Form layout for each resource kind.

use super::fields;
use super::resource::{MediaCategory, MediaKind, ResourceKind};

/// How a form field is entered and displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text input
    PlainText,
    /// Multi-line text area
    MultiLineText { rows: u16 },
    /// One value out of a fixed set
    EnumeratedChoice { options: Vec<&'static str> },
    /// Field with its own input widget (file selection for assets)
    Custom(CustomField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomField {
    AssetPicker(MediaKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
}

/// Fields shown when creating or editing a record of `kind`, in display order.
pub fn form_layout(kind: ResourceKind) -> Vec<FieldDescriptor> {
    match kind {
        ResourceKind::Item => vec![
            FieldDescriptor {
                name: fields::TITLE,
                label: "Title",
                placeholder: "Product name",
                kind: FieldKind::PlainText,
            },
            FieldDescriptor {
                name: fields::DESCRIPTION,
                label: "Description",
                placeholder: "Short description of the product",
                kind: FieldKind::MultiLineText { rows: 5 },
            },
            FieldDescriptor {
                name: fields::IMG_URL,
                label: "Image",
                placeholder: "JPG, PNG, or GIF",
                kind: FieldKind::Custom(CustomField::AssetPicker(MediaKind::Image)),
            },
        ],
        ResourceKind::MediaEntry => vec![
            FieldDescriptor {
                name: fields::CATEGORY,
                label: "Type",
                placeholder: "Choose the video type",
                kind: FieldKind::EnumeratedChoice {
                    options: MediaCategory::ALL.iter().map(|c| c.as_str()).collect(),
                },
            },
            FieldDescriptor {
                name: fields::VIDEO_URL,
                label: "Video",
                placeholder: "MP4, AVI, or MKV",
                kind: FieldKind::Custom(CustomField::AssetPicker(MediaKind::Video)),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layout_ends_with_its_asset_picker() {
        for kind in ResourceKind::ALL {
            let layout = form_layout(kind);
            let last = layout.last().unwrap();
            assert_eq!(last.name, kind.asset_field());
            assert_eq!(
                last.kind,
                FieldKind::Custom(CustomField::AssetPicker(kind.media_kind()))
            );
        }
    }

    #[test]
    fn media_layout_offers_both_categories() {
        let layout = form_layout(ResourceKind::MediaEntry);
        assert_eq!(
            layout[0].kind,
            FieldKind::EnumeratedChoice {
                options: vec!["home", "about"]
            }
        );
    }
}
