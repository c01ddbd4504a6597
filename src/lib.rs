pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::commands::{execute, Command};
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::persistence::PersistenceEngine;
pub use domain::model::{
    Breed, CatBreed, Color, DogBreed, Gender, MedicalCard, NewPet, Owner, Passport, Pet, PetKind,
    RecordType, SaleRecord, VisitRecord,
};
pub use domain::registry::Registry;
pub use domain::services::{Organization, PetShop, VetClinic};
pub use utils::error::{RegistryError, Result};
