use crate::domain::model::{index_for, Owner, RecordType, VisitRecord};
use crate::domain::services::{PetShop, VetClinic};
use crate::utils::error::Result;

/// The whole in-memory model for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub owners: Vec<Owner>,
    pub petshop: PetShop,
    pub vetclinic: VetClinic,
}

impl Registry {
    pub fn new(petshop: PetShop, vetclinic: VetClinic) -> Self {
        Self {
            owners: Vec::new(),
            petshop,
            vetclinic,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
            && self.petshop.available().is_empty()
            && self.petshop.sales().is_empty()
            && self.vetclinic.records().is_empty()
    }

    pub fn add_owner(&mut self, owner: Owner) -> &Owner {
        self.owners.push(owner);
        &self.owners[self.owners.len() - 1]
    }

    pub fn owner(&self, position: usize) -> Result<&Owner> {
        let index = index_for("owner", position, self.owners.len())?;
        Ok(&self.owners[index])
    }

    pub fn owner_mut(&mut self, position: usize) -> Result<&mut Owner> {
        let index = index_for("owner", position, self.owners.len())?;
        Ok(&mut self.owners[index])
    }

    pub fn find_owner(&self, name: &str) -> Option<&Owner> {
        self.owners.iter().find(|o| o.name == name)
    }

    /// Removes an owner together with all of their pets.
    pub fn remove_owner(&mut self, position: usize) -> Result<Owner> {
        let index = index_for("owner", position, self.owners.len())?;
        Ok(self.owners.remove(index))
    }

    /// Sells shop stock to the owner at `owner_position`.
    pub fn sell(&mut self, owner_position: usize, pet_position: usize) -> Result<()> {
        let index = index_for("owner", owner_position, self.owners.len())?;
        self.petshop.sell(&mut self.owners[index], pet_position)?;
        Ok(())
    }

    /// Logs a clinic visit for one of an owner's pets.
    pub fn record_visit(
        &mut self,
        owner_position: usize,
        pet_position: usize,
        kind: RecordType,
        detail: &str,
    ) -> Result<&VisitRecord> {
        let index = index_for("owner", owner_position, self.owners.len())?;
        let pet = self.owners[index].pet_mut(pet_position)?;
        Ok(self.vetclinic.record_visit(pet, kind, detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Breed, Color, DogBreed, Gender, NewPet};

    #[test]
    fn test_default_registry_is_empty() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.owner(1).unwrap_err().is_lookup());
    }

    #[test]
    fn test_sell_through_registry() {
        let mut registry = Registry::default();
        registry.add_owner(Owner::new("Anna", 25, Gender::Female));
        registry.petshop.create_pet(NewPet {
            name: "Rex".to_string(),
            age: 2,
            gender: Gender::Male,
            color: Color::Black,
            breed: Breed::Dog(DogBreed::Labrador),
            passport: true,
        });

        assert!(registry.sell(2, 1).unwrap_err().is_lookup());
        assert_eq!(registry.petshop.available().len(), 1);

        registry.sell(1, 1).unwrap();
        assert_eq!(registry.find_owner("Anna").unwrap().pets()[0].name, "Rex");
        assert!(registry.petshop.available().is_empty());

        assert!(registry
            .record_visit(1, 2, RecordType::Vaccine, "Rabies")
            .unwrap_err()
            .is_lookup());
        let visit = registry
            .record_visit(1, 1, RecordType::Vaccine, "Rabies")
            .unwrap();
        assert_eq!(visit.pet_name, "Rex");
        assert_eq!(registry.owners[0].pets()[0].medical_card().vaccinations(), ["Rabies"]);

        let anna = registry.remove_owner(1).unwrap();
        assert_eq!(anna.pets().len(), 1);
        assert!(registry.owners.is_empty());
    }
}
