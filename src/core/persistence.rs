use crate::core::document::JsonDocument;
use crate::core::markup::XmlExport;
use crate::domain::ports::{ConfigProvider, Decoder, Encoder, Storage};
use crate::domain::registry::Registry;
use crate::domain::services::{Organization, PetShop, VetClinic};
use crate::utils::error::{RegistryError, Result};
use std::io::ErrorKind;

pub const DEFAULT_DOCUMENT_FILE: &str = "data.json";
pub const DEFAULT_MARKUP_FILE: &str = "data.xml";

/// Saves the model to the JSON document and the XML export; loads it back
/// from the JSON document only.
pub struct PersistenceEngine<S: Storage> {
    storage: S,
    document_file: String,
    markup_file: String,
    petshop: Organization,
    vetclinic: Organization,
}

impl<S: Storage> PersistenceEngine<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            document_file: DEFAULT_DOCUMENT_FILE.to_string(),
            markup_file: DEFAULT_MARKUP_FILE.to_string(),
            petshop: PetShop::default().organization,
            vetclinic: VetClinic::default().organization,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(storage: S, config: &C) -> Self {
        Self {
            storage,
            document_file: config.document_file().to_string(),
            markup_file: config.markup_file().to_string(),
            petshop: config.petshop(),
            vetclinic: config.vetclinic(),
        }
    }

    pub fn document_file(&self) -> &str {
        &self.document_file
    }

    pub fn markup_file(&self) -> &str {
        &self.markup_file
    }

    /// An empty model carrying the configured organization identities.
    pub fn empty(&self) -> Registry {
        Registry::new(
            PetShop::new(self.petshop.clone()),
            VetClinic::new(self.vetclinic.clone()),
        )
    }

    /// Writes both files. The document is written first so the export never
    /// describes data the document lacks.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let document = JsonDocument.encode(registry)?;
        let markup = XmlExport.encode(registry)?;

        self.storage.write_file(&self.document_file, &document)?;
        tracing::debug!("Wrote {} ({} bytes)", self.document_file, document.len());
        self.storage.write_file(&self.markup_file, &markup)?;
        tracing::debug!("Wrote {} ({} bytes)", self.markup_file, markup.len());

        tracing::info!(
            "💾 Saved {} owners, {} pets in shop, {} sales, {} visits",
            registry.owners.len(),
            registry.petshop.available().len(),
            registry.petshop.sales().len(),
            registry.vetclinic.records().len()
        );
        Ok(())
    }

    /// Reads the document, reporting a missing file as `IoError(NotFound)`
    /// and unreadable content as a serialization or corrupt-document error.
    pub fn read(&self) -> Result<Registry> {
        let data = self.storage.read_file(&self.document_file)?;
        JsonDocument.decode(&data, self.empty())
    }

    /// Loads the model, falling back to an empty one when the document is
    /// missing or unreadable.
    pub fn load(&self) -> Registry {
        match self.read() {
            Ok(registry) => {
                tracing::info!(
                    "📂 Loaded {} owners and {} shop pets from {}",
                    registry.owners.len(),
                    registry.petshop.available().len(),
                    self.document_file
                );
                registry
            }
            Err(RegistryError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No {} yet, starting with an empty registry", self.document_file);
                self.empty()
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Could not read {}, starting with an empty registry: {}",
                    self.document_file,
                    e
                );
                self.empty()
            }
        }
    }
}
