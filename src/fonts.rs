//! Static font tables and font file loading.
//!
//! Every family ships a single TTF per style under
//! `<font_dir>/<family-id>/<file>.ttf`. Only the `normal` style exists today.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Font families that can be selected with the `font` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    CrimsonText,
    IbmPlexSans,
    #[default]
    Inter,
    Lora,
    Merriweather,
    NunitoSans,
    OpenSans,
    PtSerif,
    Roboto,
    SourceSansPro,
    SourceSerifPro,
    WorkSans,
}

impl FontFamily {
    pub const ALL: [FontFamily; 12] = [
        FontFamily::CrimsonText,
        FontFamily::IbmPlexSans,
        FontFamily::Inter,
        FontFamily::Lora,
        FontFamily::Merriweather,
        FontFamily::NunitoSans,
        FontFamily::OpenSans,
        FontFamily::PtSerif,
        FontFamily::Roboto,
        FontFamily::SourceSansPro,
        FontFamily::SourceSerifPro,
        FontFamily::WorkSans,
    ];

    /// Identifier used in query strings and font directory names.
    pub fn id(self) -> &'static str {
        match self {
            FontFamily::CrimsonText => "crimson-text",
            FontFamily::IbmPlexSans => "ibm-plex-sans",
            FontFamily::Inter => "inter",
            FontFamily::Lora => "lora",
            FontFamily::Merriweather => "merriweather",
            FontFamily::NunitoSans => "nunito-sans",
            FontFamily::OpenSans => "open-sans",
            FontFamily::PtSerif => "pt-serif",
            FontFamily::Roboto => "roboto",
            FontFamily::SourceSansPro => "source-sans-pro",
            FontFamily::SourceSerifPro => "source-serif-pro",
            FontFamily::WorkSans => "work-sans",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|family| family.id() == id)
    }

    /// Styles this family ships, with the file name for each.
    fn files(self) -> &'static [(FontStyle, &'static str)] {
        match self {
            FontFamily::CrimsonText => &[(FontStyle::Normal, "crimson-text-latin-400-normal.ttf")],
            FontFamily::IbmPlexSans => {
                &[(FontStyle::Normal, "ibm-plex-sans-latin-ext-400-normal.ttf")]
            }
            FontFamily::Inter => &[(FontStyle::Normal, "inter-latin-400-normal.ttf")],
            FontFamily::Lora => &[(FontStyle::Normal, "lora-latin-400-normal.ttf")],
            FontFamily::Merriweather => &[(FontStyle::Normal, "merriweather-latin-400-normal.ttf")],
            FontFamily::NunitoSans => &[(FontStyle::Normal, "nunito-sans-latin-400-normal.ttf")],
            FontFamily::OpenSans => &[(FontStyle::Normal, "open-sans-latin-400-normal.ttf")],
            FontFamily::PtSerif => &[(FontStyle::Normal, "pt-serif-latin-400-normal.ttf")],
            FontFamily::Roboto => &[(FontStyle::Normal, "roboto-latin-ext-400-normal.ttf")],
            FontFamily::SourceSansPro => {
                &[(FontStyle::Normal, "source-sans-pro-latin-400-normal.ttf")]
            }
            FontFamily::SourceSerifPro => {
                &[(FontStyle::Normal, "source-serif-pro-latin-400-normal.ttf")]
            }
            FontFamily::WorkSans => &[(FontStyle::Normal, "work-sans-latin-400-normal.ttf")],
        }
    }

    pub fn styles(self) -> impl Iterator<Item = FontStyle> {
        self.files().iter().map(|(style, _)| *style)
    }

    pub fn supports(self, style: FontStyle) -> bool {
        self.styles().any(|s| s == style)
    }

    /// Font file path relative to the font directory.
    pub fn file(self, style: FontStyle) -> Option<PathBuf> {
        self.files()
            .iter()
            .find(|(s, _)| *s == style)
            .map(|(_, file)| Path::new(self.id()).join(file))
    }
}

/// Font styles. Selected with the `weight` query parameter, which despite its
/// name picks a style and not a numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
}

impl FontStyle {
    pub fn id(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
        }
    }

    /// Look a style up among the styles any family ships.
    pub fn from_id(id: &str) -> Option<Self> {
        available_styles().into_iter().find(|style| style.id() == id)
    }

    /// Numeric weight of the files shipped for this style.
    pub fn weight(self) -> u16 {
        match self {
            FontStyle::Normal => 400,
        }
    }
}

/// Union of the styles shipped across all families, in first-seen order.
pub fn available_styles() -> Vec<FontStyle> {
    let mut styles = Vec::new();
    for style in FontFamily::ALL.into_iter().flat_map(FontFamily::styles) {
        if !styles.contains(&style) {
            styles.push(style);
        }
    }
    styles
}

/// Reads font files from a directory laid out as `<family-id>/<file>.ttf`.
#[derive(Debug, Clone)]
pub struct FontLibrary {
    root: PathBuf,
}

impl FontLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path of the file for `family`/`style`, falling back to the
    /// family's normal style when it does not ship the requested one.
    pub fn path_for(&self, family: FontFamily, style: FontStyle) -> PathBuf {
        let relative = family
            .file(style)
            .or_else(|| family.file(FontStyle::Normal))
            .unwrap_or_else(|| PathBuf::from(family.id()));
        self.root.join(relative)
    }

    pub async fn load(&self, family: FontFamily, style: FontStyle) -> Result<Vec<u8>> {
        let path = self.path_for(family, style);
        log::debug!("loading font {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|source| Error::FontLoad { path, source })
    }
}
