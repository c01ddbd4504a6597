use crate::domain::model::{index_for, NewPet, Owner, Pet, RecordType, SaleRecord, VisitRecord};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PETSHOP_NAME: &str = "Зоомагазин";
pub const DEFAULT_VETCLINIC_NAME: &str = "Ветклиника";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub address: String,
}

impl Organization {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PetShop {
    pub organization: Organization,
    available: Vec<Pet>,
    sales: Vec<SaleRecord>,
}

impl Default for PetShop {
    fn default() -> Self {
        Self::new(Organization::new(DEFAULT_PETSHOP_NAME, ""))
    }
}

impl PetShop {
    pub fn new(organization: Organization) -> Self {
        Self {
            organization,
            available: Vec::new(),
            sales: Vec::new(),
        }
    }

    pub(crate) fn restore(
        organization: Organization,
        available: Vec<Pet>,
        sales: Vec<SaleRecord>,
    ) -> Self {
        Self {
            organization,
            available,
            sales,
        }
    }

    pub fn available(&self) -> &[Pet] {
        &self.available
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Creates a pet with its documents and puts it on sale.
    pub fn create_pet(&mut self, spec: NewPet) -> &Pet {
        tracing::debug!(
            "Shop '{}' received {} {}",
            self.organization.name,
            spec.breed.kind(),
            spec.name
        );
        self.available.push(Pet::new(spec));
        &self.available[self.available.len() - 1]
    }

    /// Sells the pet at a 1-based position to `owner`.
    pub fn sell(&mut self, owner: &mut Owner, position: usize) -> Result<&SaleRecord> {
        self.sell_at(owner, position, Utc::now())
    }

    pub fn sell_at(
        &mut self,
        owner: &mut Owner,
        position: usize,
        date: DateTime<Utc>,
    ) -> Result<&SaleRecord> {
        let index = index_for("available pet", position, self.available.len())?;
        let pet = self.available.remove(index);
        tracing::info!("🐾 {} bought {} from '{}'", owner.name, pet.name, self.organization.name);

        self.sales.push(SaleRecord {
            owner_name: owner.name.clone(),
            pet_name: pet.name.clone(),
            date,
        });
        owner.add_pet(pet);
        Ok(&self.sales[self.sales.len() - 1])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VetClinic {
    pub organization: Organization,
    records: Vec<VisitRecord>,
}

impl Default for VetClinic {
    fn default() -> Self {
        Self::new(Organization::new(DEFAULT_VETCLINIC_NAME, ""))
    }
}

impl VetClinic {
    pub fn new(organization: Organization) -> Self {
        Self {
            organization,
            records: Vec::new(),
        }
    }

    pub(crate) fn restore(organization: Organization, records: Vec<VisitRecord>) -> Self {
        Self {
            organization,
            records,
        }
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    /// Notes a disease or vaccination on the pet's card and logs the visit.
    pub fn record_visit(&mut self, pet: &mut Pet, kind: RecordType, detail: &str) -> &VisitRecord {
        self.record_visit_at(pet, kind, detail, Utc::now())
    }

    pub fn record_visit_at(
        &mut self,
        pet: &mut Pet,
        kind: RecordType,
        detail: &str,
        date: DateTime<Utc>,
    ) -> &VisitRecord {
        let card = pet.medical_card_mut();
        let added = match kind {
            RecordType::Disease => card.add_disease(detail),
            RecordType::Vaccine => card.add_vaccination(detail),
        };
        if !added {
            tracing::debug!("{} already has '{}' on the medical card", pet.name, detail);
        }

        self.records.push(VisitRecord {
            pet_name: pet.name.clone(),
            record_type: kind,
            detail: detail.to_string(),
            date,
        });
        &self.records[self.records.len() - 1]
    }
}
