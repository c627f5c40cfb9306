use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::error::{RenderError, TesseraError, TesseraResult};

/// One font face: raw bytes plus the face index inside a collection file.
#[derive(Clone)]
pub struct FontFace {
    /// Logical family name the face was registered under.
    pub family: String,
    /// Raw TTF/OTF/TTC bytes.
    pub data: Arc<Vec<u8>>,
    /// Face index within `data`.
    pub index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Immutable family-to-face table built once at startup and shared read-only by every render.
pub struct FontRegistry {
    faces: Vec<FontFace>,
    default_family: Option<String>,
    system: Option<usvg::fontdb::Database>,
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("families", &self.families())
            .field("default_family", &self.default_family)
            .field("system_faces", &self.system.as_ref().map(|db| db.len()))
            .finish()
    }
}

impl FontRegistry {
    /// Start a registry builder.
    pub fn builder() -> FontRegistryBuilder {
        FontRegistryBuilder::default()
    }

    /// Registry with no registered files, backed only by the platform fonts.
    pub fn system() -> Self {
        Self {
            faces: Vec::new(),
            default_family: None,
            system: Some(load_system_db()),
        }
    }

    /// Registered family names, in registration order.
    pub fn families(&self) -> Vec<&str> {
        self.faces.iter().map(|f| f.family.as_str()).collect()
    }

    /// Pick the face for `family`.
    ///
    /// Lookup order: registered family (case-insensitive), platform font with that family
    /// name, configured default family, platform sans-serif. Only fails when all of these
    /// come up empty.
    pub fn resolve(&self, family: &str) -> Result<FontFace, RenderError> {
        if let Some(face) = self.registered(family) {
            return Ok(face.clone());
        }
        if let Some(face) = self.system_face(usvg::fontdb::Family::Name(family)) {
            return Ok(face);
        }

        if let Some(default) = self.default_family.as_deref()
            && let Some(face) = self.registered(default)
        {
            tracing::debug!(requested = family, fallback = default, "font family fallback");
            return Ok(face.clone());
        }
        if let Some(face) = self.platform_default() {
            tracing::debug!(
                requested = family,
                fallback = %face.family,
                "font family fallback to platform default"
            );
            return Ok(face);
        }

        Err(RenderError::text(format!(
            "no font available for family \"{family}\""
        )))
    }

    fn registered(&self, family: &str) -> Option<&FontFace> {
        let family = family.trim();
        self.faces
            .iter()
            .find(|f| f.family.eq_ignore_ascii_case(family))
    }

    fn system_face(&self, family: usvg::fontdb::Family<'_>) -> Option<FontFace> {
        let db = self.system.as_ref()?;
        let id = db.query(&usvg::fontdb::Query {
            families: &[family],
            ..Default::default()
        })?;
        face_from_db(db, id)
    }

    /// Generic sans-serif, then a few common sans families, then whatever face loaded first.
    fn platform_default(&self) -> Option<FontFace> {
        let db = self.system.as_ref()?;
        let families = [
            usvg::fontdb::Family::SansSerif,
            usvg::fontdb::Family::Name("DejaVu Sans"),
            usvg::fontdb::Family::Name("Liberation Sans"),
            usvg::fontdb::Family::Name("Noto Sans"),
            usvg::fontdb::Family::Name("Helvetica"),
        ];
        let id = db
            .query(&usvg::fontdb::Query {
                families: &families,
                ..Default::default()
            })
            .or_else(|| db.faces().next().map(|f| f.id))?;
        face_from_db(db, id)
    }
}

fn face_from_db(db: &usvg::fontdb::Database, id: usvg::fontdb::ID) -> Option<FontFace> {
    let name = db
        .face(id)?
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_default();
    db.with_face_data(id, |data, index| FontFace {
        family: name,
        data: Arc::new(data.to_vec()),
        index,
    })
}

/// Collects font registrations before freezing them into a [`FontRegistry`].
#[derive(Debug)]
pub struct FontRegistryBuilder {
    faces: Vec<FontFace>,
    default_family: Option<String>,
    system_fallback: bool,
}

impl Default for FontRegistryBuilder {
    fn default() -> Self {
        Self {
            faces: Vec::new(),
            default_family: None,
            system_fallback: true,
        }
    }
}

impl FontRegistryBuilder {
    /// Register the font file at `path` under the logical name `family`.
    pub fn register_file(self, path: impl AsRef<Path>, family: &str) -> TesseraResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        self.register_bytes(family, bytes)
    }

    /// Register in-memory font bytes under the logical name `family`.
    pub fn register_bytes(mut self, family: &str, bytes: Vec<u8>) -> TesseraResult<Self> {
        let family = family.trim();
        if family.is_empty() {
            return Err(TesseraError::validation("font family name must be non-empty"));
        }
        if bytes.is_empty() {
            return Err(TesseraError::validation(format!(
                "font data for family \"{family}\" is empty"
            )));
        }

        let face = FontFace {
            family: family.to_string(),
            data: Arc::new(bytes),
            index: 0,
        };
        match self
            .faces
            .iter_mut()
            .find(|f| f.family.eq_ignore_ascii_case(family))
        {
            Some(existing) => *existing = face,
            None => self.faces.push(face),
        }
        Ok(self)
    }

    /// Family used when a requested family is not registered.
    pub fn default_family(mut self, family: impl Into<String>) -> Self {
        self.default_family = Some(family.into());
        self
    }

    /// Whether to consult the platform fonts (default `true`).
    pub fn system_fallback(mut self, enabled: bool) -> Self {
        self.system_fallback = enabled;
        self
    }

    /// Freeze the registrations.
    pub fn build(self) -> TesseraResult<FontRegistry> {
        if let Some(default) = self.default_family.as_deref()
            && !self
                .faces
                .iter()
                .any(|f| f.family.eq_ignore_ascii_case(default.trim()))
        {
            return Err(TesseraError::validation(format!(
                "default font family \"{default}\" is not registered"
            )));
        }

        let system = self.system_fallback.then(load_system_db);
        if let Some(db) = &system
            && db.is_empty()
        {
            tracing::warn!("no platform fonts found; only registered families are available");
        }
        tracing::info!(
            families = self.faces.len(),
            system_faces = system.as_ref().map_or(0, |db| db.len()),
            "font registry ready"
        );

        Ok(FontRegistry {
            faces: self.faces,
            default_family: self.default_family,
            system,
        })
    }
}

fn load_system_db() -> usvg::fontdb::Database {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    db
}

/// Font file registration as it appears in configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontSource {
    /// Path to a TTF/OTF/TTC file.
    pub path: PathBuf,
    /// Logical family name clients refer to.
    pub family: String,
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
