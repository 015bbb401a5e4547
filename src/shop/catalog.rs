//! Artwork Catalog
//!
//! Static, read-only metadata for every sellable piece. The catalog is
//! input to the inventory ledger; it never changes while the process
//! runs, and summary/roll ordering follows catalog order.

use serde::{Deserialize, Serialize};

/// Display size of a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkSize {
    /// Small piece.
    Small,
    /// Medium piece.
    Medium,
    /// Large piece.
    Large,
}

/// One sellable artwork.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artwork {
    /// Catalog identifier.
    pub id: String,
    /// Display asset path (relative to the asset store root).
    pub path: String,
    /// High-resolution delivery asset; falls back to `path` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_path: Option<String>,
    /// Vibe tags for front-end filtering.
    #[serde(default)]
    pub vibe: Vec<String>,
    /// Display size.
    pub size: ArtworkSize,
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Artwork {
    /// The path actually handed out on download.
    pub fn delivery_path(&self) -> &str {
        self.download_path.as_deref().unwrap_or(&self.path)
    }
}

/// Ordered, read-only collection of artworks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    artworks: Vec<Artwork>,
}

impl Catalog {
    /// Build a catalog from a list of artworks.
    ///
    /// Ids must be unique; the ledger keys stock by them.
    pub fn new(artworks: Vec<Artwork>) -> Self {
        debug_assert!(
            {
                let mut ids: Vec<&str> = artworks.iter().map(|a| a.id.as_str()).collect();
                ids.sort_unstable();
                ids.windows(2).all(|w| w[0] != w[1])
            },
            "catalog ids must be unique"
        );
        Self { artworks }
    }

    /// Parse a catalog from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let artworks: Vec<Artwork> = serde_json::from_str(json)?;
        Ok(Self::new(artworks))
    }

    /// Look up a piece by id.
    pub fn get(&self, id: &str) -> Option<&Artwork> {
        self.artworks.iter().find(|a| a.id == id)
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Artwork> {
        self.artworks.iter()
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    /// The built-in demo catalog: one mascot plus ten line-art fortunes.
    pub fn demo() -> Self {
        let mut artworks = vec![Artwork {
            id: "cat_fortune".into(),
            path: "/fortunes/cat_.svg".into(),
            download_path: Some("/fortunes/cat_.svg".into()),
            vibe: vec!["lucky".into(), "mascot".into()],
            size: ArtworkSize::Medium,
            title: Some("Lucky Cat".into()),
        }];
        for i in 1..=10 {
            artworks.push(Artwork {
                id: format!("processed-tattoo-{i}"),
                path: format!("/fortunes/processed-tattoo-{i}.svg"),
                download_path: Some(format!("/fortunes/processed-tattoo-{i}.svg")),
                vibe: vec!["linework".into(), "clean".into()],
                size: ArtworkSize::Small,
                title: Some(format!("Fortune No. {i}")),
            });
        }
        Self::new(artworks)
    }
}

// =============================================================================
// TESTS
// =============================================================================
