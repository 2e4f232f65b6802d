use super::validate::{FormErrors, Validator};
use super::FormModel;
use crate::dates::{date_only, parse_date};
use crate::models::{Pet, PetInput};
use crate::patch::Patch;

const MAX_WEIGHT_KG: f64 = 999.99;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetForm {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: String,
    pub age_years: String,
    pub weight_kg: String,
    pub sex: String,
    pub photo_url: String,
    pub notes: String,
}

fn parse_age(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|age| *age >= 0)
}

fn parse_weight(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|w| (0.0..=MAX_WEIGHT_KG).contains(w))
}

impl FormModel for PetForm {
    type Entity = Pet;
    /// Every field is set; blank strings become explicit clears
    type Output = PetInput;

    fn from_entity(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone().unwrap_or_default(),
            birth_date: pet
                .birth_date
                .as_deref()
                .map(|d| date_only(d).to_string())
                .unwrap_or_default(),
            age_years: pet.age_years.map(|a| a.to_string()).unwrap_or_default(),
            weight_kg: pet.weight_kg.clone().unwrap_or_default(),
            sex: pet.sex.clone().unwrap_or_default(),
            photo_url: pet.photo_url.clone().unwrap_or_default(),
            notes: pet.notes.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        v.field("name", &self.name)
            .required("Name is required")
            .max_length(100, "Name cannot exceed 100 characters");
        v.field("species", &self.species)
            .required("Species is required")
            .max_length(50, "Species cannot exceed 50 characters");
        v.field("breed", &self.breed)
            .max_length(100, "Breed cannot exceed 100 characters");
        v.field("birth_date", &self.birth_date)
            .satisfies(|d| parse_date(d).is_some(), "Invalid date");
        v.field("age_years", &self.age_years)
            .satisfies(|a| parse_age(a).is_some(), "Age must be a whole number of years, 0 or more");
        v.field("weight_kg", &self.weight_kg).satisfies(
            |w| parse_weight(w).is_some(),
            "Weight must be a number between 0 and 999.99",
        );
        v.field("sex", &self.sex)
            .max_length(20, "Sex cannot exceed 20 characters");
        v.finish()
    }

    fn to_output(&self) -> PetInput {
        PetInput {
            name: Patch::Value(self.name.clone()),
            species: Patch::Value(self.species.clone()),
            breed: Patch::Value(self.breed.clone()),
            birth_date: Patch::Value(self.birth_date.clone()),
            age_years: parse_age(&self.age_years).into(),
            weight_kg: Patch::Value(self.weight_kg.clone()),
            sex: Patch::Value(self.sex.clone()),
            photo_url: Patch::Value(self.photo_url.clone()),
            notes: Patch::Value(self.notes.clone()),
        }
    }
}
