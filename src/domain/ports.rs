use crate::domain::registry::Registry;
use crate::domain::services::Organization;
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn document_file(&self) -> &str;
    fn markup_file(&self) -> &str;
    /// Identity of the shop used when no data has been saved yet.
    fn petshop(&self) -> Organization;
    fn vetclinic(&self) -> Organization;
}

/// Turns the whole model into one file's bytes.
pub trait Encoder {
    fn encode(&self, registry: &Registry) -> Result<Vec<u8>>;
}

/// Rebuilds the model from bytes produced by the matching [`Encoder`].
pub trait Decoder {
    fn decode(&self, data: &[u8], fallback: Registry) -> Result<Registry>;
}
