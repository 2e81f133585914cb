//! Layer classification by file extension.
//!
//! CAD packages name their Gerber outputs with well known extensions
//! (`.gtl`, `.gbs`, ...). The extension picks a default layer name and a
//! display color; anything unrecognised becomes a generic cyan layer.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    TopCopper,
    BottomCopper,
    /// Inner copper layer, numbered from 1.
    InnerCopper(u8),
    TopSolderMask,
    BottomSolderMask,
    TopSilkscreen,
    BottomSilkscreen,
    TopPaste,
    BottomPaste,
    BoardOutline,
    Milling,
    DrillHoles,
    Generic,
}

impl LayerKind {
    /// Classify a file extension, with or without the leading dot.
    pub fn from_extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "gtl" => Self::TopCopper,
            "gbl" => Self::BottomCopper,
            "g1" => Self::InnerCopper(1),
            "g2" => Self::InnerCopper(2),
            "g3" => Self::InnerCopper(3),
            "g4" => Self::InnerCopper(4),
            "gts" => Self::TopSolderMask,
            "gbs" => Self::BottomSolderMask,
            "gto" => Self::TopSilkscreen,
            "gbo" => Self::BottomSilkscreen,
            "gtp" => Self::TopPaste,
            "gbp" => Self::BottomPaste,
            // .gm8 is the Altium outline
            "gko" | "gm8" => Self::BoardOutline,
            "gm9" => Self::Milling,
            "xln" | "txt" => Self::DrillHoles,
            _ => Self::Generic,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Generic, Self::from_extension)
    }

    /// Default display color as RGB.
    pub fn default_color(&self) -> [u8; 3] {
        match self {
            Self::TopCopper => [0xff, 0x00, 0x00],
            Self::BottomCopper => [0x00, 0x00, 0xff],
            Self::InnerCopper(1) => [0xbc, 0x8e, 0x00],
            Self::InnerCopper(2) => [0x70, 0xdb, 0xfa],
            Self::InnerCopper(_) => [0x00, 0xff, 0xff],
            Self::TopSolderMask => [0x80, 0x00, 0x80],
            Self::BottomSolderMask => [0xff, 0x00, 0xff],
            Self::TopSilkscreen => [0xff, 0xff, 0x00],
            Self::BottomSilkscreen => [0x80, 0x80, 0x00],
            Self::TopPaste => [0x80, 0x80, 0x80],
            Self::BottomPaste => [0x80, 0x00, 0x00],
            Self::BoardOutline => [0xff, 0x99, 0x00],
            Self::Milling => [0x00, 0x80, 0x00],
            Self::DrillHoles => [0xc0, 0xc0, 0xc0],
            Self::Generic => [0x00, 0xff, 0xff],
        }
    }

    pub fn is_copper(&self) -> bool {
        matches!(
            self,
            Self::TopCopper | Self::BottomCopper | Self::InnerCopper(_)
        )
    }

    /// Bottom-side layers are seen through the board and usually exposed mirrored.
    pub fn is_bottom(&self) -> bool {
        matches!(
            self,
            Self::BottomCopper | Self::BottomSolderMask | Self::BottomSilkscreen | Self::BottomPaste
        )
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::TopCopper => write!(f, "Copper top"),
            LayerKind::BottomCopper => write!(f, "Copper bottom"),
            LayerKind::InnerCopper(n) => write!(f, "Copper inner {}", n),
            LayerKind::TopSolderMask => write!(f, "Soldermask top"),
            LayerKind::BottomSolderMask => write!(f, "Soldermask bottom"),
            LayerKind::TopSilkscreen => write!(f, "Silkscreen top"),
            LayerKind::BottomSilkscreen => write!(f, "Silkscreen bottom"),
            LayerKind::TopPaste => write!(f, "Paste top"),
            LayerKind::BottomPaste => write!(f, "Paste bottom"),
            LayerKind::BoardOutline => write!(f, "Outline"),
            LayerKind::Milling => write!(f, "Milling"),
            LayerKind::DrillHoles => write!(f, "Drills"),
            LayerKind::Generic => write!(f, "layer"),
        }
    }
}

/// Photoresist type on the board being exposed.
///
/// Negative resist hardens where light hits, so copper to keep is drawn
/// white. Positive resist is the other way round and needs an inverted mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Negative,
    Positive,
}

impl Material {
    pub fn inverts(&self) -> bool {
        *self == Material::Positive
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Material::Negative => write!(f, "negative"),
            Material::Positive => write!(f, "positive"),
        }
    }
}

impl std::str::FromStr for Material {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "negative" | "neg" => Ok(Material::Negative),
            "positive" | "pos" => Ok(Material::Positive),
            other => Err(crate::CoreError::UnknownMaterial(other.to_string())),
        }
    }
}
