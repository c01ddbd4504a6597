//! JSON document codec: the read/write source of truth.
//!
//! Pets are written with an explicit `type` tag. Records without one (older
//! files) fall back to [`infer_kind`], which relies on the dog and cat breed
//! vocabularies being disjoint.

use crate::domain::model::{
    Breed, Color, DogBreed, Gender, MedicalCard, NewPet, Owner, Passport, Pet, PetKind,
    SaleRecord, VisitRecord,
};
use crate::domain::ports::{Decoder, Encoder};
use crate::domain::registry::Registry;
use crate::domain::services::{Organization, PetShop, VetClinic};
use crate::utils::error::{RegistryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocument;

/// Guesses the variant of an untagged pet record from its breed.
pub fn infer_kind(breed: &str) -> PetKind {
    if DogBreed::from_display(breed).is_some() {
        PetKind::Dog
    } else {
        PetKind::Cat
    }
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    owners: Vec<OwnerOut<'a>>,
    petshop: PetShopOut<'a>,
    vetclinic: VetClinicOut<'a>,
}

#[derive(Serialize)]
struct OwnerOut<'a> {
    name: &'a str,
    age: u32,
    gender: Gender,
    pets: Vec<PetOut<'a>>,
}

#[derive(Serialize)]
struct PetOut<'a> {
    #[serde(rename = "type")]
    kind: PetKind,
    name: &'a str,
    age: u32,
    gender: Gender,
    color: Color,
    breed: &'static str,
    passport: Option<PassportOut<'a>>,
    medical_card: MedicalCardOut<'a>,
}

#[derive(Serialize)]
struct PassportOut<'a> {
    pet_name: &'a str,
    age: u32,
    color: Color,
    gender: Gender,
    breed: &'static str,
    issue_date: DateTime<Utc>,
}

#[derive(Serialize)]
struct MedicalCardOut<'a> {
    pet_name: &'a str,
    vaccinations: &'a [String],
    diseases: &'a [String],
}

#[derive(Serialize)]
struct PetShopOut<'a> {
    name: &'a str,
    address: &'a str,
    available_pets: Vec<PetOut<'a>>,
    sales: &'a [SaleRecord],
}

#[derive(Serialize)]
struct VetClinicOut<'a> {
    name: &'a str,
    address: &'a str,
    records: &'a [VisitRecord],
}

impl<'a> From<&'a Pet> for PetOut<'a> {
    fn from(pet: &'a Pet) -> Self {
        let card = pet.medical_card();
        PetOut {
            kind: pet.kind(),
            name: &pet.name,
            age: pet.age,
            gender: pet.gender,
            color: pet.color,
            breed: pet.breed().as_str(),
            passport: pet.passport().map(|p| PassportOut {
                pet_name: &p.pet_name,
                age: p.age,
                color: p.color,
                gender: p.gender,
                breed: p.breed.as_str(),
                issue_date: p.issue_date,
            }),
            medical_card: MedicalCardOut {
                pet_name: &card.pet_name,
                vaccinations: card.vaccinations(),
                diseases: card.diseases(),
            },
        }
    }
}

impl<'a> From<&'a Registry> for DocumentOut<'a> {
    fn from(registry: &'a Registry) -> Self {
        DocumentOut {
            owners: registry
                .owners
                .iter()
                .map(|owner| OwnerOut {
                    name: &owner.name,
                    age: owner.age,
                    gender: owner.gender,
                    pets: owner.pets().iter().map(PetOut::from).collect(),
                })
                .collect(),
            petshop: PetShopOut {
                name: &registry.petshop.organization.name,
                address: &registry.petshop.organization.address,
                available_pets: registry
                    .petshop
                    .available()
                    .iter()
                    .map(PetOut::from)
                    .collect(),
                sales: registry.petshop.sales(),
            },
            vetclinic: VetClinicOut {
                name: &registry.vetclinic.organization.name,
                address: &registry.vetclinic.organization.address,
                records: registry.vetclinic.records(),
            },
        }
    }
}

#[derive(Deserialize)]
struct OwnerIn {
    name: String,
    age: u32,
    gender: Gender,
    pets: Option<Value>,
}

#[derive(Deserialize)]
struct PetIn {
    #[serde(rename = "type")]
    kind: Option<PetKind>,
    name: String,
    age: u32,
    gender: Gender,
    color: Color,
    breed: String,
    passport: Option<PassportIn>,
    medical_card: Option<MedicalCardIn>,
}

#[derive(Deserialize)]
struct PassportIn {
    pet_name: String,
    age: u32,
    color: Color,
    gender: Gender,
    breed: String,
    issue_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct MedicalCardIn {
    pet_name: Option<String>,
    vaccinations: Option<Value>,
    diseases: Option<Value>,
}

impl Encoder for JsonDocument {
    fn encode(&self, registry: &Registry) -> Result<Vec<u8>> {
        let mut data = serde_json::to_vec_pretty(&DocumentOut::from(registry))?;
        data.push(b'\n');
        Ok(data)
    }
}

impl Decoder for JsonDocument {
    fn decode(&self, data: &[u8], fallback: Registry) -> Result<Registry> {
        let root = match serde_json::from_slice::<Value>(data)? {
            Value::Object(map) => map,
            other => {
                return Err(RegistryError::CorruptDocument {
                    message: format!(
                        "expected a mapping at the top level, found {}",
                        type_name(&other)
                    ),
                })
            }
        };

        let owners = records(root.get("owners"), "owners")
            .iter()
            .enumerate()
            .filter_map(|(i, value)| decode_record::<OwnerIn>(value, "owner", i))
            .map(|record| {
                let mut owner = Owner::new(record.name, record.age, record.gender);
                for pet in decode_pets(records(record.pets.as_ref(), "owner.pets")) {
                    owner.add_pet(pet);
                }
                owner
            })
            .collect();

        let shop = root.get("petshop");
        let available = decode_pets(records(
            section_field(shop, "available_pets"),
            "petshop.available_pets",
        ));
        let sales = records(section_field(shop, "sales"), "petshop.sales")
            .iter()
            .enumerate()
            .filter_map(|(i, value)| decode_record::<SaleRecord>(value, "sale", i))
            .collect();
        let petshop = PetShop::restore(
            decode_organization(shop, fallback.petshop.organization),
            available,
            sales,
        );

        let clinic = root.get("vetclinic");
        let visits = records(section_field(clinic, "records"), "vetclinic.records")
            .iter()
            .enumerate()
            .filter_map(|(i, value)| decode_record::<VisitRecord>(value, "visit", i))
            .collect();
        let vetclinic = VetClinic::restore(
            decode_organization(clinic, fallback.vetclinic.organization),
            visits,
        );

        Ok(Registry {
            owners,
            petshop,
            vetclinic,
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

fn section_field<'a>(section: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    section.and_then(|s| s.get(key))
}

/// A missing or non-sequence collection reads as empty.
fn records<'a>(value: Option<&'a Value>, key: &str) -> &'a [Value] {
    match value.and_then(Value::as_array) {
        Some(items) => items,
        None => {
            tracing::debug!("No '{}' sequence in document, using an empty one", key);
            &[]
        }
    }
}

/// Like `records`, keeping only the string entries.
fn strings(value: Option<&Value>, key: &str) -> Vec<String> {
    records(value, key)
        .iter()
        .filter_map(|item| match item.as_str() {
            Some(text) => Some(text.to_string()),
            None => {
                tracing::warn!("⚠️ Skipping non-text entry in '{}': {}", key, item);
                None
            }
        })
        .collect()
}

fn decode_record<'a, T: Deserialize<'a>>(value: &'a Value, what: &str, index: usize) -> Option<T> {
    match T::deserialize(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("⚠️ Skipping {} #{}: {}", what, index + 1, e);
            None
        }
    }
}

fn decode_organization(section: Option<&Value>, fallback: Organization) -> Organization {
    let text = |key: &str| section_field(section, key).and_then(Value::as_str).map(str::to_string);
    Organization {
        name: text("name").unwrap_or(fallback.name),
        address: text("address").unwrap_or(fallback.address),
    }
}

fn decode_pets(values: &[Value]) -> Vec<Pet> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let record = decode_record::<PetIn>(value, "pet", i)?;
            match build_pet(record) {
                Ok(pet) => Some(pet),
                Err(reason) => {
                    tracing::warn!("⚠️ Skipping pet #{}: {}", i + 1, reason);
                    None
                }
            }
        })
        .collect()
}

fn build_pet(record: PetIn) -> std::result::Result<Pet, String> {
    let kind = record.kind.unwrap_or_else(|| infer_kind(&record.breed));
    let breed_for = |value: &str| {
        Breed::from_display(kind, value)
            .ok_or_else(|| format!("breed '{}' is not a {} breed", value, kind))
    };

    let breed = breed_for(&record.breed)?;
    let passport = match record.passport {
        Some(p) => Some(Passport {
            breed: breed_for(&p.breed)?,
            pet_name: p.pet_name,
            age: p.age,
            color: p.color,
            gender: p.gender,
            issue_date: p.issue_date.unwrap_or_else(Utc::now),
        }),
        None => None,
    };
    let medical_card = match record.medical_card {
        Some(card) => MedicalCard::restore(
            card.pet_name.unwrap_or_else(|| record.name.clone()),
            strings(card.vaccinations.as_ref(), "medical_card.vaccinations"),
            strings(card.diseases.as_ref(), "medical_card.diseases"),
        ),
        None => MedicalCard::new(record.name.clone()),
    };

    let spec = NewPet {
        name: record.name,
        age: record.age,
        gender: record.gender,
        color: record.color,
        breed,
        passport: passport.is_some(),
    };
    Ok(Pet::restore(spec, passport, medical_card))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CatBreed;
    use serde_json::json;

    fn decode(value: Value) -> Registry {
        let data = serde_json::to_vec(&value).unwrap();
        JsonDocument.decode(&data, Registry::default()).unwrap()
    }

    fn untagged_pet(breed: &str) -> Value {
        json!({
            "name": "Bim",
            "age": 3,
            "gender": "Мужской",
            "color": "Белый",
            "breed": breed,
            "passport": null,
            "medical_card": null
        })
    }

    #[test]
    fn test_infer_kind_covers_every_breed() {
        for breed in DogBreed::ALL {
            assert_eq!(infer_kind(breed.as_str()), PetKind::Dog, "{}", breed);
        }
        for breed in CatBreed::ALL {
            assert_eq!(infer_kind(breed.as_str()), PetKind::Cat, "{}", breed);
        }
    }

    #[test]
    fn test_untagged_records_are_inferred() {
        let registry = decode(json!({
            "petshop": {
                "available_pets": [untagged_pet("Хаски"), untagged_pet("Сфинкс")]
            }
        }));

        let pets = registry.petshop.available();
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].breed(), Breed::Dog(DogBreed::Husky));
        assert_eq!(pets[1].breed(), Breed::Cat(CatBreed::Sphynx));
        assert_eq!(pets[1].medical_card().pet_name, "Bim");
        assert!(pets[1].passport().is_none());
    }

    #[test]
    fn test_explicit_tag_must_match_breed() {
        let mut pet = untagged_pet("Хаски");
        pet["type"] = json!("Cat");
        let registry = decode(json!({
            "petshop": { "available_pets": [pet, untagged_pet("Пудель")] }
        }));

        let pets = registry.petshop.available();
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].breed(), Breed::Dog(DogBreed::Poodle));
    }

    #[test]
    fn test_unknown_breed_without_tag_is_skipped() {
        let registry = decode(json!({
            "petshop": { "available_pets": [untagged_pet("Дворняга")] }
        }));
        assert!(registry.petshop.available().is_empty());
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let registry = decode(json!({ "owners": null, "petshop": {} }));

        assert!(registry.is_empty());
        assert_eq!(registry.petshop.organization, PetShop::default().organization);
        assert_eq!(registry.vetclinic.organization, VetClinic::default().organization);
    }

    #[test]
    fn test_bad_records_are_skipped_not_fatal() {
        let registry = decode(json!({
            "owners": [
                {
                    "name": "Anna",
                    "age": 25,
                    "gender": "Женский",
                    "pets": [untagged_pet("Лабрадор"), { "name": "Rex", "age": "two" }]
                },
                { "name": "Oleg", "age": -4, "gender": "Мужской" },
                { "name": "Ivan", "age": 40, "gender": "Мужской" }
            ],
            "vetclinic": {
                "records": [
                    {
                        "pet_name": "Bim",
                        "record_type": "Прививка",
                        "detail": "Rabies",
                        "date": "2024-05-01T10:00:00Z"
                    },
                    {
                        "pet_name": "Bim",
                        "record_type": "Checkup",
                        "detail": "?",
                        "date": "2024-05-02T10:00:00Z"
                    }
                ]
            }
        }));

        assert_eq!(registry.owners.len(), 2);
        assert_eq!(registry.owners[0].pets().len(), 1);
        assert!(registry.owners[1].pets().is_empty());
        assert_eq!(registry.vetclinic.records().len(), 1);
    }

    #[test]
    fn test_malformed_nested_collections_keep_the_record() {
        let registry = decode(json!({
            "owners": [
                { "name": "Anna", "age": 25, "gender": "Женский", "pets": "oops" }
            ],
            "petshop": {
                "available_pets": [
                    {
                        "name": "Murka",
                        "age": 1,
                        "gender": "Женский",
                        "color": "Белый",
                        "breed": "Персидская",
                        "passport": null,
                        "medical_card": {
                            "pet_name": "Murka",
                            "vaccinations": "Rabies",
                            "diseases": ["Flu", 7, "Otitis"]
                        }
                    }
                ]
            }
        }));

        assert_eq!(registry.owners.len(), 1);
        assert_eq!(registry.owners[0].name, "Anna");
        assert!(registry.owners[0].pets().is_empty());

        let pets = registry.petshop.available();
        assert_eq!(pets.len(), 1);
        assert!(pets[0].medical_card().vaccinations().is_empty());
        assert_eq!(pets[0].medical_card().diseases(), ["Flu", "Otitis"]);
    }

    #[test]
    fn test_top_level_must_be_a_mapping() {
        let err = JsonDocument.decode(b"[1, 2, 3]", Registry::default()).unwrap_err();
        assert!(matches!(err, RegistryError::CorruptDocument { .. }));

        let err = JsonDocument.decode(b"{ not json", Registry::default()).unwrap_err();
        assert!(matches!(err, RegistryError::SerializationError(_)));
    }

    #[test]
    fn test_encode_writes_tag_and_null_passport() {
        let mut registry = Registry::default();
        registry.petshop.create_pet(NewPet {
            name: "Tom".to_string(),
            age: 1,
            gender: Gender::Male,
            color: Color::Gray,
            breed: Breed::Cat(CatBreed::British),
            passport: false,
        });

        let data = JsonDocument.encode(&registry).unwrap();
        let value: Value = serde_json::from_slice(&data).unwrap();
        let pet = &value["petshop"]["available_pets"][0];

        assert_eq!(pet["type"], "Cat");
        assert_eq!(pet["breed"], "Британская");
        assert_eq!(pet["gender"], "Мужской");
        assert!(pet["passport"].is_null());
        assert_eq!(pet["medical_card"]["vaccinations"], json!([]));
        assert_eq!(value["owners"], json!([]));
        assert_eq!(value["vetclinic"]["records"], json!([]));
    }
}
