//! Editor session holding the single flavor being edited.
//!
//! The session owns the flavor's lifecycle (create, adopt, load, save, reset)
//! and the export step. Edits go through [`FlavorSession::current_mut`] and the
//! [`Flavor`] edit operations.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;

use crate::dif::flavor::encode::export_flavor;
use crate::dif::flavor::validate::{validate, ValidationError};
use crate::dif::flavor::Flavor;
use crate::dif::types::error::Result;

#[derive(Debug, Default)]
pub struct FlavorSession {
    flavor: Flavor,
}

impl FlavorSession {
    /// Starts a session with an empty, unnamed flavor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session editing `flavor`, e.g. one picked from a scanned database.
    pub fn adopt(flavor: Flavor) -> Self {
        info!("Loaded flavor '{}'", flavor.name);
        Self { flavor }
    }

    pub fn current(&self) -> &Flavor {
        &self.flavor
    }

    pub fn current_mut(&mut self) -> &mut Flavor {
        &mut self.flavor
    }

    /// Replaces the current flavor, returning the previous one.
    pub fn replace(&mut self, flavor: Flavor) -> Flavor {
        info!("Loaded flavor '{}'", flavor.name);
        std::mem::replace(&mut self.flavor, flavor)
    }

    /// Discards the current flavor.
    pub fn reset(&mut self) {
        self.flavor = Flavor::default();
        debug!("Cleared flavor");
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.flavor.name = name.into();
    }

    /// Turning the activation directive off also drops its modifiers.
    pub fn set_init(&mut self, init: bool) {
        self.flavor.init = init;
        if !init {
            self.flavor.modifiers = None;
        }
    }

    /// Empty text clears the modifiers.
    pub fn set_modifiers(&mut self, modifiers: &str) {
        self.flavor.modifiers = (!modifiers.is_empty()).then(|| modifiers.to_string());
    }

    /// Replaces the current flavor with the snapshot at `path`.
    ///
    /// On error the current flavor is left untouched.
    pub fn load_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let flavor: Flavor = serde_json::from_str(&text)?;
        debug!("Loaded JSON successfully from '{}'", path.display());
        self.replace(flavor);
        Ok(())
    }

    /// Writes the current flavor as a snapshot. Returns the rules the flavor
    /// still breaks; a flavor saved with problems cannot be exported yet.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<Vec<ValidationError>> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        self.flavor.serialize(&mut serializer)?;
        writer.flush()?;
        info!("Flavor '{}' has been saved to '{}'", self.flavor.name, path.display());

        let problems = validate(&self.flavor);
        if !problems.is_empty() {
            warn!(
                "Saved flavor '{}' with {} configuration error(s); it cannot be exported until they are resolved",
                self.flavor.name,
                problems.len()
            );
        }
        Ok(problems)
    }

    /// Validates the current flavor and writes its import text to `path`.
    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = export_flavor(&self.flavor)?;
        fs::write(path, text)?;
        info!("Wrote DIF to '{}'", path.display());
        info!(
            "Import it on the appliance with: /twc/bin/db_imp -d -r -s dif /twc/dif/wxl_dif {}",
            path.display()
        );
        Ok(())
    }
}
