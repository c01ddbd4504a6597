use crate::core::persistence::PersistenceEngine;
use crate::core::Storage;
use crate::domain::model::{Breed, Color, Gender, NewPet, Owner, Pet, RecordType};
use crate::domain::registry::Registry;
use crate::utils::error::Result;
use crate::utils::validation::{validate_name, validate_range, MAX_OWNER_AGE, MAX_PET_AGE};
use std::io::Write;

/// One non-interactive action. Positions are 1-based, as printed by `show`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(clap::Subcommand))]
pub enum Command {
    /// Print owners, shop stock, sales and clinic visits
    Show,
    /// Register a new owner
    AddOwner {
        name: String,
        age: u32,
        gender: Gender,
    },
    /// Remove an owner together with their pets
    RemoveOwner { position: usize },
    /// Put a new pet on sale; the breed decides dog or cat
    CreatePet {
        name: String,
        age: u32,
        gender: Gender,
        color: Color,
        breed: Breed,
        /// Issue a passport with the pet
        #[cfg_attr(feature = "cli", arg(long))]
        passport: bool,
    },
    /// Sell the shop's pet at a position to an owner
    Sell { owner: usize, pet: usize },
    /// Remove a pet from an owner
    RemovePet { owner: usize, pet: usize },
    /// Log a clinic visit for an owner's pet
    Visit {
        owner: usize,
        pet: usize,
        kind: RecordType,
        detail: String,
    },
    /// Rewrite the JSON document and the XML export
    Export,
}

/// Loads the registry, applies `command` and saves when something changed.
pub fn execute<S: Storage, W: Write>(
    engine: &PersistenceEngine<S>,
    command: &Command,
    out: &mut W,
) -> Result<()> {
    let mut registry = engine.load();

    match command {
        Command::Show => return render(&registry, out),
        Command::AddOwner { name, age, gender } => {
            validate_name("Owner name", name)?;
            validate_range("Owner age", *age, 1, MAX_OWNER_AGE)?;
            let owner = registry.add_owner(Owner::new(name.trim(), *age, *gender));
            writeln!(out, "Added owner {}", owner)?;
        }
        Command::RemoveOwner { position } => {
            let owner = registry.remove_owner(*position)?;
            writeln!(out, "Removed owner {} and {} pet(s)", owner.name, owner.pets().len())?;
        }
        Command::CreatePet {
            name,
            age,
            gender,
            color,
            breed,
            passport,
        } => {
            validate_name("Pet name", name)?;
            validate_range("Pet age", *age, 0, MAX_PET_AGE)?;
            let pet = registry.petshop.create_pet(NewPet {
                name: name.trim().to_string(),
                age: *age,
                gender: *gender,
                color: *color,
                breed: *breed,
                passport: *passport,
            });
            writeln!(out, "Added to shop: {}", pet)?;
        }
        Command::Sell { owner, pet } => {
            registry.sell(*owner, *pet)?;
            if let Some(sale) = registry.petshop.sales().last() {
                writeln!(out, "Sold: {}", sale)?;
            }
        }
        Command::RemovePet { owner, pet } => {
            let removed = registry.owner_mut(*owner)?.remove_pet(*pet)?;
            writeln!(out, "Removed {}", removed)?;
        }
        Command::Visit {
            owner,
            pet,
            kind,
            detail,
        } => {
            validate_range("Detail length", detail.trim().chars().count(), 1, 200)?;
            let record = registry.record_visit(*owner, *pet, *kind, detail.trim())?;
            writeln!(out, "Visit logged: {}", record)?;
        }
        Command::Export => {
            writeln!(
                out,
                "Exported to {} and {}",
                engine.document_file(),
                engine.markup_file()
            )?;
        }
    }

    engine.save(&registry)
}

pub fn render<W: Write>(registry: &Registry, out: &mut W) -> Result<()> {
    writeln!(out, "Owners:")?;
    if registry.owners.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (i, owner) in registry.owners.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, owner)?;
        for (j, pet) in owner.pets().iter().enumerate() {
            render_pet(out, j + 1, pet, "     ")?;
        }
    }

    let shop = &registry.petshop;
    writeln!(
        out,
        "Pet shop \"{}\" {}:",
        shop.organization.name, shop.organization.address
    )?;
    if shop.available().is_empty() {
        writeln!(out, "  (no pets on sale)")?;
    }
    for (i, pet) in shop.available().iter().enumerate() {
        render_pet(out, i + 1, pet, "  ")?;
    }
    for sale in shop.sales() {
        writeln!(out, "  - {}", sale)?;
    }

    let clinic = &registry.vetclinic;
    writeln!(
        out,
        "Vet clinic \"{}\" {}:",
        clinic.organization.name, clinic.organization.address
    )?;
    for record in clinic.records() {
        writeln!(out, "  - {}", record)?;
    }
    Ok(())
}

fn render_pet<W: Write>(out: &mut W, position: usize, pet: &Pet, indent: &str) -> Result<()> {
    writeln!(out, "{}{}. {}", indent, position, pet)?;
    if let Some(passport) = pet.passport() {
        writeln!(out, "{}   {}", indent, passport)?;
    }
    writeln!(out, "{}   {}", indent, pet.medical_card())?;
    Ok(())
}
