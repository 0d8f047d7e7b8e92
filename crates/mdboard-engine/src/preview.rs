//! Link-preview metadata consumed by the renderer.
//!
//! The engine never fetches this itself: a collaborator (the
//! `mdboard-preview` crate) gathers it per document and hands it in through
//! [`RenderOptions`](crate::render::RenderOptions). A URL absent from the
//! map renders as a normal link.

use serde::{Deserialize, Serialize};

/// Open Graph style metadata for one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
    pub url: Option<String>,
}

impl PreviewInfo {
    /// A preview is only worth a card when it carries a title or
    /// description; anything less renders as a plain link.
    pub fn has_content(&self) -> bool {
        self.title.is_some() || self.description.is_some()
    }
}
