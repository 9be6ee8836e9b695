//! Notion API response types
//!
//! Property values are modelled only for the property types the sync engine
//! reads back; anything else deserializes to [`PropertyValue::Other`].

use serde::Deserialize;
use std::collections::HashMap;

/// `POST /v1/databases/{id}/query` response
///
/// See: https://developers.notion.com/reference/post-database-query
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<PageObject>,

    /// Cursor for the next page; only meaningful when `has_more` is set
    pub next_cursor: Option<String>,

    #[serde(default)]
    pub has_more: bool,
}

/// A database row
#[derive(Debug, Deserialize)]
pub struct PageObject {
    pub id: String,

    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl PageObject {
    /// Concatenated plain text of a title or rich text property.
    ///
    /// Returns `None` when the property is missing, of another type, or empty.
    pub fn text(&self, name: &str) -> Option<String> {
        let fragments = match self.properties.get(name)? {
            PropertyValue::RichText { rich_text } => rich_text,
            PropertyValue::Title { title } => title,
            _ => return None,
        };

        let text: String = fragments.iter().map(|t| t.plain_text.as_str()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Value of a URL property, falling back to its text if the column is a
    /// rich text column.
    pub fn url(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            PropertyValue::Url { url } => url.clone().filter(|u| !u.is_empty()),
            _ => self.text(name),
        }
    }

    /// Selected option of a select property.
    pub fn select(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            PropertyValue::Select { select } => select
                .as_ref()
                .map(|s| s.name.clone())
                .filter(|n| !n.is_empty()),
            _ => None,
        }
    }
}

/// Property value, tagged by its `type` field
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichTextFragment>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextFragment>,
    },
    Url {
        url: Option<String>,
    },
    Select {
        select: Option<SelectOption>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct RichTextFragment {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
