use crate::utils::error::{RegistryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed vocabulary whose serialized form is its display string.
macro_rules! display_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $display:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $display)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $display,)+
                }
            }

            pub fn from_display(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == value)
            }

            fn symbolic(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            /// Accepts the display string or the symbolic name in any case.
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                let folded: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
                Self::from_display(s)
                    .or_else(|| {
                        Self::ALL
                            .iter()
                            .copied()
                            .find(|v| v.symbolic().eq_ignore_ascii_case(&folded))
                    })
                    .ok_or_else(|| {
                        let known: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        format!(
                            "unknown {} '{}', expected one of: {}",
                            stringify!($name),
                            s,
                            known.join(", ")
                        )
                    })
            }
        }
    };
}

display_enum!(Gender {
    Male => "Мужской",
    Female => "Женский",
});

display_enum!(Color {
    Black => "Черный",
    White => "Белый",
    Brown => "Коричневый",
    Gray => "Серый",
    Ginger => "Рыжий",
    Spotted => "Пятнистый",
});

display_enum!(
    /// Dog breeds. Display strings never collide with [`CatBreed`].
    DogBreed {
        Labrador => "Лабрадор",
        Husky => "Хаски",
        Shepherd => "Овчарка",
        Poodle => "Пудель",
        Bulldog => "Бульдог",
        Dachshund => "Такса",
    }
);

display_enum!(
    /// Cat breeds. Display strings never collide with [`DogBreed`].
    CatBreed {
        Siamese => "Сиамская",
        Persian => "Персидская",
        MaineCoon => "Мейн-кун",
        Sphynx => "Сфинкс",
        British => "Британская",
        Bengal => "Бенгальская",
    }
);

display_enum!(
    /// Concrete pet variant; stored as the `type` tag.
    PetKind {
        Dog => "Dog",
        Cat => "Cat",
    }
);

display_enum!(RecordType {
    Disease => "Болезнь",
    Vaccine => "Прививка",
});

/// A breed tied to its variant, so a dog can never carry a cat breed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breed {
    Dog(DogBreed),
    Cat(CatBreed),
}

impl Breed {
    pub fn kind(self) -> PetKind {
        match self {
            Breed::Dog(_) => PetKind::Dog,
            Breed::Cat(_) => PetKind::Cat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Breed::Dog(breed) => breed.as_str(),
            Breed::Cat(breed) => breed.as_str(),
        }
    }

    /// Parses a stored display string within the given variant's vocabulary.
    pub fn from_display(kind: PetKind, value: &str) -> Option<Self> {
        match kind {
            PetKind::Dog => DogBreed::from_display(value).map(Breed::Dog),
            PetKind::Cat => CatBreed::from_display(value).map(Breed::Cat),
        }
    }
}

impl fmt::Display for Breed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DogBreed> for Breed {
    fn from(breed: DogBreed) -> Self {
        Breed::Dog(breed)
    }
}

impl From<CatBreed> for Breed {
    fn from(breed: CatBreed) -> Self {
        Breed::Cat(breed)
    }
}

impl FromStr for Breed {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<DogBreed>()
            .map(Breed::Dog)
            .or_else(|_| s.parse::<CatBreed>().map(Breed::Cat))
            .map_err(|_| format!("unknown breed '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Passport {
    pub pet_name: String,
    pub age: u32,
    pub color: Color,
    pub gender: Gender,
    pub breed: Breed,
    pub issue_date: DateTime<Utc>,
}

impl fmt::Display for Passport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Passport of {} ({}, {}, {}, {} y.o.), issued {}",
            self.pet_name,
            self.breed,
            self.color,
            self.gender,
            self.age,
            self.issue_date.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalCard {
    pub pet_name: String,
    vaccinations: Vec<String>,
    diseases: Vec<String>,
}

impl MedicalCard {
    pub fn new(pet_name: impl Into<String>) -> Self {
        Self {
            pet_name: pet_name.into(),
            vaccinations: Vec::new(),
            diseases: Vec::new(),
        }
    }

    /// Rebuilds a card from stored lists as-is.
    pub(crate) fn restore(
        pet_name: String,
        vaccinations: Vec<String>,
        diseases: Vec<String>,
    ) -> Self {
        Self {
            pet_name,
            vaccinations,
            diseases,
        }
    }

    pub fn vaccinations(&self) -> &[String] {
        &self.vaccinations
    }

    pub fn diseases(&self) -> &[String] {
        &self.diseases
    }

    /// Returns false when the label was already present.
    pub(crate) fn add_vaccination(&mut self, label: &str) -> bool {
        insert_unique(&mut self.vaccinations, label)
    }

    pub(crate) fn add_disease(&mut self, label: &str) -> bool {
        insert_unique(&mut self.diseases, label)
    }
}

fn insert_unique(labels: &mut Vec<String>, label: &str) -> bool {
    if labels.iter().any(|l| l == label) {
        return false;
    }
    labels.push(label.to_string());
    true
}

impl fmt::Display for MedicalCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |labels: &[String]| {
            if labels.is_empty() {
                "-".to_string()
            } else {
                labels.join(", ")
            }
        };
        write!(
            f,
            "Medical card of {}: vaccinations [{}], diseases [{}]",
            self.pet_name,
            list(&self.vaccinations),
            list(&self.diseases)
        )
    }
}

/// Input for creating a pet.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub color: Color,
    pub breed: Breed,
    pub passport: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub color: Color,
    breed: Breed,
    passport: Option<Passport>,
    medical_card: MedicalCard,
}

impl Pet {
    pub fn new(spec: NewPet) -> Self {
        Self::new_at(spec, Utc::now())
    }

    /// Creates the pet with its documents; the passport is issued at `issued`.
    pub fn new_at(spec: NewPet, issued: DateTime<Utc>) -> Self {
        let passport = spec.passport.then(|| Passport {
            pet_name: spec.name.clone(),
            age: spec.age,
            color: spec.color,
            gender: spec.gender,
            breed: spec.breed,
            issue_date: issued,
        });
        let medical_card = MedicalCard::new(spec.name.clone());
        Self {
            name: spec.name,
            age: spec.age,
            gender: spec.gender,
            color: spec.color,
            breed: spec.breed,
            passport,
            medical_card,
        }
    }

    pub(crate) fn restore(
        spec: NewPet,
        passport: Option<Passport>,
        medical_card: MedicalCard,
    ) -> Self {
        Self {
            name: spec.name,
            age: spec.age,
            gender: spec.gender,
            color: spec.color,
            breed: spec.breed,
            passport,
            medical_card,
        }
    }

    pub fn kind(&self) -> PetKind {
        self.breed.kind()
    }

    pub fn breed(&self) -> Breed {
        self.breed
    }

    pub fn passport(&self) -> Option<&Passport> {
        self.passport.as_ref()
    }

    pub fn medical_card(&self) -> &MedicalCard {
        &self.medical_card
    }

    pub(crate) fn medical_card_mut(&mut self) -> &mut MedicalCard {
        &mut self.medical_card
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {}, {}, {} y.o.)",
            self.kind(),
            self.name,
            self.breed,
            self.color,
            self.gender,
            self.age
        )?;
        if self.passport.is_none() {
            f.write_str(" [no passport]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pets: Vec<Pet>,
}

impl Owner {
    pub fn new(name: impl Into<String>, age: u32, gender: Gender) -> Self {
        Self {
            name: name.into(),
            age,
            gender,
            pets: Vec::new(),
        }
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn add_pet(&mut self, pet: Pet) {
        self.pets.push(pet);
    }

    pub fn pet_mut(&mut self, position: usize) -> Result<&mut Pet> {
        let index = index_for("pet", position, self.pets.len())?;
        Ok(&mut self.pets[index])
    }

    /// Removes the pet at a 1-based position; the pet leaves the model.
    pub fn remove_pet(&mut self, position: usize) -> Result<Pet> {
        let index = index_for("pet", position, self.pets.len())?;
        Ok(self.pets.remove(index))
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} y.o.), pets: {}",
            self.name,
            self.gender,
            self.age,
            self.pets.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub owner_name: String,
    pub pet_name: String,
    pub date: DateTime<Utc>,
}

impl fmt::Display for SaleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} bought {}",
            self.date.format("%Y-%m-%d %H:%M:%S"),
            self.owner_name,
            self.pet_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub pet_name: String,
    pub record_type: RecordType,
    pub detail: String,
    pub date: DateTime<Utc>,
}

impl fmt::Display for VisitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - {}: {}",
            self.date.format("%Y-%m-%d %H:%M:%S"),
            self.pet_name,
            self.record_type,
            self.detail
        )
    }
}

/// Maps a 1-based position onto a vector index.
pub(crate) fn index_for(collection: &'static str, position: usize, len: usize) -> Result<usize> {
    if position == 0 || position > len {
        return Err(RegistryError::out_of_range(collection, position, len));
    }
    Ok(position - 1)
}
