use serde::{Deserialize, Serialize};
use std::fmt;

const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];
const FONT_EXTENSIONS: [&str; 4] = [".woff", ".woff2", ".ttf", ".otf"];

/// Closed set of resource categories a row can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "JS")]
    Js,
    #[serde(rename = "CSS")]
    Css,
    Image,
    #[serde(rename = "HTML")]
    Html,
    Font,
    #[serde(rename = "API")]
    Api,
    Video,
    Audio,
    Other,
}

impl ResourceType {
    pub const ALL: [ResourceType; 9] = [
        ResourceType::Js,
        ResourceType::Css,
        ResourceType::Image,
        ResourceType::Html,
        ResourceType::Font,
        ResourceType::Api,
        ResourceType::Video,
        ResourceType::Audio,
        ResourceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Js => "JS",
            ResourceType::Css => "CSS",
            ResourceType::Image => "Image",
            ResourceType::Html => "HTML",
            ResourceType::Font => "Font",
            ResourceType::Api => "API",
            ResourceType::Video => "Video",
            ResourceType::Audio => "Audio",
            ResourceType::Other => "Other",
        }
    }

    /// Categorize a resource from its MIME type and URL.
    ///
    /// Rules are checked in a fixed order and the first match wins, so a
    /// MIME type match always beats a later URL extension match.
    pub fn categorize(mime_type: &str, url: &str) -> Self {
        let mime = mime_type.to_lowercase();
        let url = url.to_lowercase();
        let ends_with_any = |exts: &[&str]| exts.iter().any(|ext| url.ends_with(ext));

        if mime.contains("javascript") || url.ends_with(".js") {
            ResourceType::Js
        } else if mime.contains("css") || url.ends_with(".css") {
            ResourceType::Css
        } else if mime.contains("image") || ends_with_any(&IMAGE_EXTENSIONS) {
            ResourceType::Image
        } else if mime.contains("html") || url.ends_with(".html") {
            ResourceType::Html
        } else if mime.contains("font") || ends_with_any(&FONT_EXTENSIONS) {
            ResourceType::Font
        } else if mime.contains("json") || url.contains("api") {
            ResourceType::Api
        } else if mime.contains("video") {
            ResourceType::Video
        } else if mime.contains("audio") {
            ResourceType::Audio
        } else {
            ResourceType::Other
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
