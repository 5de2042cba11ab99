use crate::domain::{AddOutcome, CLEAR_CONFIRM_PROMPT, ClearOutcome, HexColor, Palette};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PALETTE_FILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum LoadPaletteError {
    #[error("failed to read palette {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to parse palette {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SavePaletteError {
    #[error("failed to encode palette: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write palette: {0}")]
    Write(#[from] io::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PaletteFile {
    version: u32,
    colors: Vec<String>,
}

/// The browser build stored a bare JSON array; both shapes load.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPalette {
    File(PaletteFile),
    Bare(Vec<String>),
}

pub fn palette_path(state_dir: &Path) -> PathBuf {
    state_dir.join("palette.json")
}

pub fn load_palette(state_dir: &Path) -> Result<Palette, LoadPaletteError> {
    let path = palette_path(state_dir);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no stored palette");
            return Ok(Palette::new());
        }
        Err(error) => {
            return Err(LoadPaletteError::Read {
                path: path.display().to_string(),
                source: error,
            });
        }
    };

    let stored: StoredPalette =
        serde_json::from_str(&raw).map_err(|error| LoadPaletteError::Parse {
            path: path.display().to_string(),
            source: error,
        })?;
    let entries = match stored {
        StoredPalette::File(file) => file.colors,
        StoredPalette::Bare(colors) => colors,
    };

    let total = entries.len();
    let mut palette = Palette::new();
    for entry in entries {
        match HexColor::parse(&entry) {
            Some(color) => {
                if let AddOutcome::AlreadyPresent(color) = palette.add(color) {
                    tracing::warn!(%color, "skipping repeated palette entry");
                }
            }
            None => tracing::warn!(entry = %entry, "skipping invalid palette entry"),
        }
    }
    tracing::debug!(path = %path.display(), total, loaded = palette.len(), "palette loaded");
    Ok(palette)
}

pub fn save_palette(state_dir: &Path, palette: &Palette) -> Result<(), SavePaletteError> {
    fs::create_dir_all(state_dir)?;

    let path = palette_path(state_dir);
    let tmp = path.with_extension("json.tmp");
    let file = PaletteFile {
        version: PALETTE_FILE_VERSION,
        colors: palette
            .colors()
            .iter()
            .map(|color| color.as_str().to_string())
            .collect(),
    };
    let text = serde_json::to_string_pretty(&file)?;
    fs::write(&tmp, text)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// A palette bound to its durable copy.
///
/// Every mutation is staged on a copy, written, and only then committed, so
/// the in-memory palette always matches the last successful write.
#[derive(Clone, Debug)]
pub struct PaletteStore {
    state_dir: PathBuf,
    palette: Palette,
}

impl PaletteStore {
    pub fn open(state_dir: &Path) -> Result<Self, LoadPaletteError> {
        let palette = load_palette(state_dir)?;
        Ok(Self {
            state_dir: state_dir.to_path_buf(),
            palette,
        })
    }

    /// Starts from an empty palette without reading storage; the next
    /// mutation overwrites whatever is stored.
    pub fn empty(state_dir: &Path) -> Self {
        Self {
            state_dir: state_dir.to_path_buf(),
            palette: Palette::new(),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn colors(&self) -> &[HexColor] {
        self.palette.colors()
    }

    pub fn add(&mut self, color: HexColor) -> Result<AddOutcome, SavePaletteError> {
        let mut next = self.palette.clone();
        let outcome = next.add(color);
        if let AddOutcome::Added(color) = &outcome {
            self.commit(next)?;
            tracing::info!(%color, size = self.palette.len(), "color added");
        }
        Ok(outcome)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Option<HexColor>, SavePaletteError> {
        let mut next = self.palette.clone();
        let Some(removed) = next.remove_at(index) else {
            tracing::warn!(index, size = self.palette.len(), "remove index out of range");
            return Ok(None);
        };
        self.commit(next)?;
        tracing::info!(color = %removed, index, "color removed");
        Ok(Some(removed))
    }

    /// `confirm` is asked with [`CLEAR_CONFIRM_PROMPT`] only when there is
    /// something to clear.
    pub fn clear(
        &mut self,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<ClearOutcome, SavePaletteError> {
        if self.palette.is_empty() {
            return Ok(ClearOutcome::AlreadyEmpty);
        }
        if !confirm(CLEAR_CONFIRM_PROMPT) {
            return Ok(ClearOutcome::Declined);
        }

        let mut next = self.palette.clone();
        let removed = next.clear();
        self.commit(next)?;
        tracing::info!(removed, "palette cleared");
        Ok(ClearOutcome::Cleared { removed })
    }

    pub fn export_css(&self) -> Option<String> {
        let css = self.palette.to_css_variables()?;
        tracing::info!(size = self.palette.len(), "palette exported");
        Some(css)
    }

    fn commit(&mut self, next: Palette) -> Result<(), SavePaletteError> {
        save_palette(&self.state_dir, &next)?;
        self.palette = next;
        Ok(())
    }
}
