//! Peripheral categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a peripheral is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Mouse,
    Keyboard,
    Headset,
    Monitor,
    Mousepad,
    Controller,
    Microphone,
    Webcam,
    Chair,
    #[default]
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 10] = [
        Category::Mouse,
        Category::Keyboard,
        Category::Headset,
        Category::Monitor,
        Category::Mousepad,
        Category::Controller,
        Category::Microphone,
        Category::Webcam,
        Category::Chair,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mouse => "mouse",
            Category::Keyboard => "keyboard",
            Category::Headset => "headset",
            Category::Monitor => "monitor",
            Category::Mousepad => "mousepad",
            Category::Controller => "controller",
            Category::Microphone => "microphone",
            Category::Webcam => "webcam",
            Category::Chair => "chair",
            Category::Other => "other",
        }
    }

    /// Parse a category, accepting the plural forms used in URLs.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let singular = s.strip_suffix('s').unwrap_or(&s);
        match singular {
            "mouse" | "mice" => Some(Category::Mouse),
            "keyboard" => Some(Category::Keyboard),
            "headset" | "headphone" => Some(Category::Headset),
            "monitor" => Some(Category::Monitor),
            "mousepad" | "mouse-pad" | "mouse_pad" => Some(Category::Mousepad),
            "controller" | "gamepad" => Some(Category::Controller),
            "microphone" | "mic" => Some(Category::Microphone),
            "webcam" => Some(Category::Webcam),
            "chair" => Some(Category::Chair),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Mouse => "Gaming Mice",
            Category::Keyboard => "Keyboards",
            Category::Headset => "Headsets",
            Category::Monitor => "Monitors",
            Category::Mousepad => "Mousepads",
            Category::Controller => "Controllers",
            Category::Microphone => "Microphones",
            Category::Webcam => "Webcams",
            Category::Chair => "Gaming Chairs",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::from_str("Keyboards"), Some(Category::Keyboard));
        assert_eq!(Category::from_str("mice"), Some(Category::Mouse));
        assert_eq!(Category::from_str("mouse"), Some(Category::Mouse));
        assert_eq!(Category::from_str("mousepads"), Some(Category::Mousepad));
        assert_eq!(Category::from_str("toaster"), None);
    }

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&Category::Mousepad).unwrap();
        assert_eq!(json, "\"mousepad\"");
    }
}
