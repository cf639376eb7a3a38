//! Content block shapes for page layouts.
//!
//! A layout is a list of blocks discriminated by `blockType`. The only
//! block kind today is `content`: a row of columns, each with a size,
//! localized rich text, and an optional link. Localized rich text is a
//! map from locale code to node list.

use std::collections::BTreeSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use plaza_core::PlazaError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "blockType", rename_all = "camelCase")]
pub enum Block {
    Content(ContentBlock),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnSize {
    #[default]
    OneThird,
    Half,
    TwoThirds,
    Full,
}

/// Locale code -> rich text nodes for that locale.
pub type LocalizedRichText = std::collections::BTreeMap<String, Vec<RichTextNode>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default)]
    pub size: ColumnSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<LocalizedRichText>,
    #[serde(default)]
    pub enable_link: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextNode {
    /// Node kind, e.g. "h2". None is a plain paragraph.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub children: Vec<TextNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkKind {
    #[default]
    Reference,
    Custom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkAppearance {
    #[default]
    Default,
    Outline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(rename = "type", default)]
    pub kind: LinkKind,
    #[serde(default)]
    pub new_tab: bool,
    /// Page id, required for internal links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Required for custom links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub label: String,
    #[serde(default)]
    pub appearance: LinkAppearance,
}

impl Link {
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            LinkKind::Reference if self.reference.is_none() => Err(PlazaError::unprocessable(
                "Internal links require a 'reference'",
            )
            .into_anyhow()),
            LinkKind::Custom if self.url.is_none() => {
                Err(PlazaError::unprocessable("Custom links require a 'url'").into_anyhow())
            }
            _ => Ok(()),
        }
    }
}

/// Deserialize a raw layout value into typed blocks. Shape errors
/// surface as Unprocessable.
pub fn parse_layout(layout: &Value) -> Result<Vec<Block>> {
    serde_json::from_value(layout.clone()).map_err(|e| {
        PlazaError::unprocessable(format!("Page layout is invalid: {e}")).into_anyhow()
    })
}

/// Validate everything a layout can check locally (link shapes).
pub fn validate_layout(blocks: &[Block]) -> Result<()> {
    for block in blocks {
        let Block::Content(content) = block;
        for column in &content.columns {
            if let Some(link) = &column.link {
                link.validate()?;
            }
        }
    }
    Ok(())
}

/// Every locale code used by localized rich text in a layout.
pub fn locale_keys(blocks: &[Block]) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for block in blocks {
        let Block::Content(content) = block;
        for column in &content.columns {
            if let Some(rich_text) = &column.rich_text {
                out.extend(rich_text.keys().cloned());
            }
        }
    }
    out
}

/// The single-block layout the seed gives every tenant's home page:
/// one full-width column with a heading and a paragraph.
pub fn welcome_layout(locale: &str, heading: &str, body: &str) -> Value {
    json!([
        {
            "blockType": "content",
            "columns": [
                {
                    "size": "full",
                    "richText": {
                        locale: [
                            {
                                "type": "h2",
                                "children": [{"text": heading}],
                            },
                            {
                                "children": [{"text": body}],
                            },
                        ],
                    },
                },
            ],
        },
    ])
}
