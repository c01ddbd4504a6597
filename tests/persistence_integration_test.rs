use pet_registry::core::document::infer_kind;
use pet_registry::{
    Breed, CatBreed, Color, DogBreed, Gender, LocalStorage, NewPet, Owner, PersistenceEngine,
    PetKind, RecordType, Registry,
};
use std::fs;
use tempfile::TempDir;

fn engine_in(temp_dir: &TempDir) -> PersistenceEngine<LocalStorage> {
    PersistenceEngine::new(LocalStorage::new(temp_dir.path()))
}

fn sample_registry() -> Registry {
    let mut registry = Registry::default();
    registry.add_owner(Owner::new("Anna", 25, Gender::Female));
    registry.add_owner(Owner::new("Борис", 47, Gender::Male));

    let stock = [
        ("Rex", Breed::Dog(DogBreed::Labrador), Color::Black, true),
        ("Барсик", Breed::Cat(CatBreed::MaineCoon), Color::Ginger, true),
        ("Luna", Breed::Cat(CatBreed::Sphynx), Color::White, false),
        ("Шарик", Breed::Dog(DogBreed::Husky), Color::Gray, false),
    ];
    for (name, breed, color, passport) in stock {
        registry.petshop.create_pet(NewPet {
            name: name.to_string(),
            age: 3,
            gender: Gender::Male,
            color,
            breed,
            passport,
        });
    }

    registry.sell(1, 1).unwrap();
    registry.sell(2, 1).unwrap();
    registry.sell(2, 2).unwrap();
    registry
        .record_visit(2, 1, RecordType::Vaccine, "Бешенство")
        .unwrap();
    registry
        .record_visit(2, 1, RecordType::Disease, "Отит")
        .unwrap();
    registry
        .record_visit(1, 1, RecordType::Vaccine, "Parvovirus")
        .unwrap();
    registry
}

#[test]
fn test_round_trip_through_filesystem() {
    let temp_dir = TempDir::new().unwrap();
    let engine = engine_in(&temp_dir);
    let registry = sample_registry();

    engine.save(&registry).unwrap();
    let loaded = engine_in(&temp_dir).load();

    assert_eq!(loaded, registry);

    let boris = &loaded.owners[1];
    assert_eq!(boris.pets().len(), 2);
    assert_eq!(boris.pets()[0].kind(), PetKind::Cat);
    assert_eq!(boris.pets()[0].breed(), Breed::Cat(CatBreed::MaineCoon));
    assert_eq!(boris.pets()[0].medical_card().vaccinations(), ["Бешенство"]);
    assert_eq!(boris.pets()[0].medical_card().diseases(), ["Отит"]);
    assert!(boris.pets()[1].passport().is_none());

    assert_eq!(loaded.petshop.available().len(), 1);
    assert_eq!(loaded.petshop.available()[0].kind(), PetKind::Cat);
    assert_eq!(loaded.petshop.sales().len(), 3);
    assert_eq!(loaded.vetclinic.records().len(), 3);
}

#[test]
fn test_save_load_save_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let engine = engine_in(&temp_dir);

    engine.save(&sample_registry()).unwrap();
    let first = fs::read(temp_dir.path().join("data.json")).unwrap();

    engine.save(&engine.load()).unwrap();
    let second = fs::read(temp_dir.path().join("data.json")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_file_gives_empty_model() {
    let temp_dir = TempDir::new().unwrap();
    let registry = engine_in(&temp_dir).load();

    assert_eq!(registry.owners.len(), 0);
    assert!(registry.petshop.available().is_empty());
    assert!(registry.petshop.sales().is_empty());
    assert!(registry.vetclinic.records().is_empty());
}

#[test]
fn test_corrupt_file_gives_empty_model() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("data.json"), "{\"owners\": [").unwrap();

    let engine = engine_in(&temp_dir);
    assert!(engine.load().is_empty());
    assert!(engine.read().is_err());
}

#[test]
fn test_legacy_document_without_type_tags() {
    let temp_dir = TempDir::new().unwrap();
    let legacy = r#"{
        "owners": [
            {
                "name": "Anna",
                "age": 25,
                "gender": "Женский",
                "pets": [
                    {
                        "name": "Rex",
                        "age": 2,
                        "gender": "Мужской",
                        "color": "Черный",
                        "breed": "Лабрадор",
                        "passport": {
                            "pet_name": "Rex",
                            "age": 2,
                            "color": "Черный",
                            "gender": "Мужской",
                            "breed": "Лабрадор",
                            "issue_date": "2024-03-01T12:00:00Z"
                        },
                        "medical_card": {
                            "pet_name": "Rex",
                            "vaccinations": ["Rabies"],
                            "diseases": []
                        }
                    }
                ]
            }
        ],
        "petshop": {
            "available_pets": [
                {
                    "name": "Murka",
                    "age": 1,
                    "gender": "Женский",
                    "color": "Белый",
                    "breed": "Персидская",
                    "passport": null
                }
            ],
            "sales": [
                { "owner_name": "Anna", "pet_name": "Rex", "date": "2024-03-01T12:05:00Z" }
            ]
        }
    }"#;
    fs::write(temp_dir.path().join("data.json"), legacy).unwrap();

    let registry = engine_in(&temp_dir).load();

    let rex = &registry.owners[0].pets()[0];
    assert_eq!(rex.kind(), PetKind::Dog);
    assert_eq!(rex.passport().unwrap().breed, Breed::Dog(DogBreed::Labrador));
    assert_eq!(rex.medical_card().vaccinations(), ["Rabies"]);

    let murka = &registry.petshop.available()[0];
    assert_eq!(murka.kind(), PetKind::Cat);
    assert_eq!(murka.medical_card().pet_name, "Murka");
    assert!(murka.medical_card().diseases().is_empty());

    assert_eq!(registry.petshop.sales()[0].owner_name, "Anna");
    assert!(registry.vetclinic.records().is_empty());
}

#[test]
fn test_variant_inference_for_every_breed() {
    for breed in DogBreed::ALL {
        assert_eq!(infer_kind(breed.as_str()), PetKind::Dog);
    }
    for breed in CatBreed::ALL {
        assert_eq!(infer_kind(breed.as_str()), PetKind::Cat);
    }
}

#[test]
fn test_markup_export_mirrors_document() {
    let temp_dir = TempDir::new().unwrap();
    engine_in(&temp_dir).save(&sample_registry()).unwrap();

    let xml = fs::read_to_string(temp_dir.path().join("data.xml")).unwrap();
    assert_eq!(xml.matches("<pet type=\"Dog\">").count(), 2);
    assert_eq!(xml.matches("<pet type=\"Cat\">").count(), 2);
    assert_eq!(xml.matches("<passport>").count(), 2);
    assert_eq!(xml.matches("<sale>").count(), 3);
    assert!(xml.contains("<disease>Отит</disease>"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("data.json")).unwrap())
            .unwrap();
    assert_eq!(json["owners"].as_array().unwrap().len(), 2);
    assert_eq!(json["petshop"]["sales"].as_array().unwrap().len(), 3);
}
