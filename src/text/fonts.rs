use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::foundation::error::{CountdownError, CountdownResult};

/// Which of the two display faces to draw with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceKind {
    /// Counter digits and the "passed" message.
    Regular,
    /// Unit labels.
    Semibold,
}

/// Families tried, in order, when no font file is configured.
const SYSTEM_FAMILY_FALLBACKS: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
];

/// Where to find the two display faces. `None` means "discover a system sans-serif face".
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontOptions {
    pub regular: Option<PathBuf>,
    pub semibold: Option<PathBuf>,
}

/// One loaded face: raw bytes for shaping plus the same bytes wrapped for rasterization.
#[derive(Clone)]
pub struct FontFace {
    kind: FaceKind,
    source: String,
    family: String,
    blob: parley::fontique::Blob<u8>,
    glyphs: vello_cpu::peniko::FontData,
}

impl FontFace {
    fn from_bytes(
        kind: FaceKind,
        source: impl Into<String>,
        bytes: Vec<u8>,
        index: u32,
    ) -> CountdownResult<Self> {
        let source = source.into();
        let blob = parley::fontique::Blob::from(bytes.clone());
        let family = detect_family(&blob).map_err(|e| {
            CountdownError::font(format!("font '{source}' has no usable family: {e}"))
        })?;
        let glyphs =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index);
        Ok(Self {
            kind,
            source,
            family,
            blob,
            glyphs,
        })
    }

    pub fn kind(&self) -> FaceKind {
        self.kind
    }

    /// Human-readable origin (file path or system family), for diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub(crate) fn blob(&self) -> &parley::fontique::Blob<u8> {
        &self.blob
    }

    pub(crate) fn glyphs(&self) -> &vello_cpu::peniko::FontData {
        &self.glyphs
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

/// The fixed display faces, loaded once and shared read-only by every render.
#[derive(Clone, Debug)]
pub struct FontLibrary {
    regular: FontFace,
    semibold: FontFace,
}

impl FontLibrary {
    /// Load configured font files, discovering system faces for anything left unset.
    ///
    /// A missing semibold face falls back to the regular one.
    #[tracing::instrument(level = "debug")]
    pub fn load(opts: &FontOptions) -> CountdownResult<Self> {
        let mut system = None;

        let regular = match opts.regular.as_deref() {
            Some(path) => load_file(FaceKind::Regular, path)?,
            None => system_face(
                system.get_or_insert_with(system_database),
                FaceKind::Regular,
            )?,
        };
        let semibold = match opts.semibold.as_deref() {
            Some(path) => load_file(FaceKind::Semibold, path)?,
            None => system_face(
                system.get_or_insert_with(system_database),
                FaceKind::Semibold,
            )
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "no semibold face found, reusing regular");
                FontFace {
                    kind: FaceKind::Semibold,
                    ..regular.clone()
                }
            }),
        };

        tracing::info!(
            regular = regular.source(),
            semibold = semibold.source(),
            "fonts loaded"
        );
        Ok(Self { regular, semibold })
    }

    /// Build a library from in-memory font files (face index 0).
    pub fn from_bytes(regular: Vec<u8>, semibold: Vec<u8>) -> CountdownResult<Self> {
        Ok(Self {
            regular: FontFace::from_bytes(FaceKind::Regular, "<memory>", regular, 0)?,
            semibold: FontFace::from_bytes(FaceKind::Semibold, "<memory>", semibold, 0)?,
        })
    }

    /// Process-wide library of system faces, discovered on first use and reused afterwards.
    pub fn system_shared() -> CountdownResult<Arc<Self>> {
        static SYSTEM: OnceLock<Result<Arc<FontLibrary>, String>> = OnceLock::new();
        SYSTEM
            .get_or_init(|| {
                Self::load(&FontOptions::default())
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(CountdownError::font)
    }

    pub fn face(&self, kind: FaceKind) -> &FontFace {
        match kind {
            FaceKind::Regular => &self.regular,
            FaceKind::Semibold => &self.semibold,
        }
    }
}

fn load_file(kind: FaceKind, path: &Path) -> CountdownResult<FontFace> {
    let bytes = std::fs::read(path).map_err(|e| CountdownError::filesystem(path, e))?;
    FontFace::from_bytes(kind, path.display().to_string(), bytes, 0)
}

fn system_database() -> usvg::fontdb::Database {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "scanned system fonts");
    db
}

fn system_face(db: &usvg::fontdb::Database, kind: FaceKind) -> CountdownResult<FontFace> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    let weight = match kind {
        FaceKind::Regular => Weight::NORMAL,
        FaceKind::Semibold => Weight::SEMIBOLD,
    };

    let mut candidates = vec![Family::SansSerif];
    candidates.extend(SYSTEM_FAMILY_FALLBACKS.iter().map(|&name| Family::Name(name)));

    for family in &candidates {
        let query = Query {
            families: std::slice::from_ref(family),
            weight,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let Some(id) = db.query(&query) else {
            continue;
        };
        // Synthesized weights do not exist in fontdb, so a semibold query can land on a
        // regular face. Only accept it for the regular slot.
        if kind == FaceKind::Semibold && db.face(id).is_some_and(|f| f.weight.0 < 600) {
            continue;
        }
        if let Some((bytes, index)) = db.with_face_data(id, |data, index| (data.to_vec(), index)) {
            let source = db
                .face(id)
                .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
                .unwrap_or_else(|| "system".to_owned());
            return FontFace::from_bytes(kind, source, bytes, index);
        }
    }

    Err(CountdownError::font(format!(
        "no system sans-serif face found for {kind:?} (configure a font file instead)"
    )))
}

/// Register `blob` in a throwaway collection and return its first family name.
fn detect_family(blob: &parley::fontique::Blob<u8>) -> CountdownResult<String> {
    let mut font_ctx = parley::FontContext::default();
    register_family(&mut font_ctx, blob)
}

/// Register `blob` in `font_ctx` and return the family name to select it by.
pub(crate) fn register_family(
    font_ctx: &mut parley::FontContext,
    blob: &parley::fontique::Blob<u8>,
) -> CountdownResult<String> {
    let families = font_ctx.collection.register_fonts(blob.clone(), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| CountdownError::font("no font families registered from font bytes"))?;

    font_ctx
        .collection
        .family_name(family_id)
        .map(str::to_owned)
        .ok_or_else(|| CountdownError::font("registered font family has no name"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = FontLibrary::from_bytes(vec![0u8; 64], vec![1u8; 64]).unwrap_err();
        assert!(err.to_string().contains("font error:"));
    }

    #[test]
    fn missing_font_file_is_a_filesystem_error() {
        let opts = FontOptions {
            regular: Some(PathBuf::from("definitely/not/here.ttf")),
            semibold: None,
        };
        let err = FontLibrary::load(&opts).unwrap_err();
        assert!(matches!(err, CountdownError::Filesystem { .. }));
    }

    #[test]
    fn system_library_exposes_both_faces_when_available() {
        let Ok(fonts) = FontLibrary::system_shared() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        assert_eq!(fonts.face(FaceKind::Regular).kind(), FaceKind::Regular);
        assert_eq!(fonts.face(FaceKind::Semibold).kind(), FaceKind::Semibold);
        assert!(!fonts.face(FaceKind::Regular).family().is_empty());
    }
}
