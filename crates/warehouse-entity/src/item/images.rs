//! Item image slots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::InventoryItem;

/// Where an image is shown on the item card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    /// Main picture.
    Front,
    /// Back view.
    Back,
    /// Side view.
    Side,
    /// Close-ups; any number of them.
    Details,
}

impl ImageSlot {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Side => "side",
            Self::Details => "details",
        }
    }

    /// Slot of a multipart upload field, e.g. `image_back`.
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "image" | "front" => Some(Self::Front),
            "image_back" | "back" => Some(Self::Back),
            "image_side" | "side" => Some(Self::Side),
            "image_details" | "details" => Some(Self::Details),
            _ => None,
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_field(s).ok_or_else(|| format!("Unknown image slot: {s}"))
    }
}

/// The image URLs of one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemImages {
    /// Front image URL.
    pub image: Option<String>,
    /// Back image URL.
    pub image_back: Option<String>,
    /// Side image URL.
    pub image_side: Option<String>,
    /// Detail image URLs in display order.
    pub image_details: Vec<String>,
}

impl ItemImages {
    /// Images currently stored on `item`. Non-string detail entries are dropped.
    pub fn from_item(item: &InventoryItem) -> Self {
        let image_details = item
            .image_details
            .as_array()
            .map(|urls| {
                urls.iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            image: item.image.clone(),
            image_back: item.image_back.clone(),
            image_side: item.image_side.clone(),
            image_details,
        }
    }

    /// Places `url` in `slot`. Returns the URL it replaced; details are
    /// appended and never replace anything.
    pub fn set(&mut self, slot: ImageSlot, url: String) -> Option<String> {
        match slot {
            ImageSlot::Front => self.image.replace(url),
            ImageSlot::Back => self.image_back.replace(url),
            ImageSlot::Side => self.image_side.replace(url),
            ImageSlot::Details => {
                self.image_details.push(url);
                None
            }
        }
    }

    /// Removes the image in `slot`, or the detail image at `index`.
    /// Returns the removed URL, `None` when there was nothing to remove.
    pub fn remove(&mut self, slot: ImageSlot, index: Option<usize>) -> Option<String> {
        match slot {
            ImageSlot::Front => self.image.take(),
            ImageSlot::Back => self.image_back.take(),
            ImageSlot::Side => self.image_side.take(),
            ImageSlot::Details => {
                let index = index?;
                (index < self.image_details.len()).then(|| self.image_details.remove(index))
            }
        }
    }

    /// Detail URLs as the JSON array stored in the item row.
    pub fn details_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.image_details.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_single_slots_and_appends_details() {
        let mut images = ItemImages::default();
        assert_eq!(images.set(ImageSlot::Front, "/a.jpg".into()), None);
        assert_eq!(
            images.set(ImageSlot::Front, "/b.jpg".into()),
            Some("/a.jpg".to_string())
        );
        assert_eq!(images.set(ImageSlot::Details, "/d1.jpg".into()), None);
        assert_eq!(images.set(ImageSlot::Details, "/d2.jpg".into()), None);

        assert_eq!(images.image.as_deref(), Some("/b.jpg"));
        assert_eq!(images.image_details, vec!["/d1.jpg", "/d2.jpg"]);
        assert_eq!(
            images.details_json(),
            serde_json::json!(["/d1.jpg", "/d2.jpg"])
        );
    }

    #[test]
    fn test_remove_detail_by_index() {
        let mut images = ItemImages {
            image_side: Some("/side.png".into()),
            image_details: vec!["/d1.jpg".into(), "/d2.jpg".into()],
            ..ItemImages::default()
        };

        assert_eq!(images.remove(ImageSlot::Details, None), None);
        assert_eq!(images.remove(ImageSlot::Details, Some(5)), None);
        assert_eq!(
            images.remove(ImageSlot::Details, Some(0)),
            Some("/d1.jpg".to_string())
        );
        assert_eq!(images.image_details, vec!["/d2.jpg"]);

        assert_eq!(
            images.remove(ImageSlot::Side, None),
            Some("/side.png".to_string())
        );
        assert_eq!(images.remove(ImageSlot::Side, None), None);
    }

    #[test]
    fn test_slot_from_field() {
        assert_eq!(ImageSlot::from_field("image"), Some(ImageSlot::Front));
        assert_eq!(ImageSlot::from_field("image_details"), Some(ImageSlot::Details));
        assert_eq!("back".parse::<ImageSlot>(), Ok(ImageSlot::Back));
        assert!("thumbnail".parse::<ImageSlot>().is_err());
    }
}
