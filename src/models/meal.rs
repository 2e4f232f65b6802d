use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::patch::Patch;
use crate::resource::Resource;

/// Meal as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealResponse {
    pub id: String,
    pub pet_id: String,
    pub meal_time: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub calories: Option<i32>,
    #[serde(default)]
    pub plan_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub pet_id: String,
    pub meal_time: String,
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub plan_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A logged meal as entered in the form. `date` is `YYYY-MM-DD` and `time`
/// is `HH:MM`; the rest is free text folded into the description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealInput {
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub meal_type: String,
    pub food: String,
    pub quantity: String,
    pub notes: String,
}

impl MealInput {
    pub fn meal_time(&self) -> String {
        format!("{}T{}:00", self.date, self.time)
    }

    pub fn description(&self) -> Option<String> {
        let description = format_meal_description(self);
        if description.is_empty() {
            None
        } else {
            Some(description)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealUpdate {
    pub meal_time: Patch<String>,
    pub description: Patch<String>,
    pub calories: Patch<i32>,
    pub plan_id: Patch<String>,
}

/// Editing from the form rewrites the time and the description only.
impl From<MealInput> for MealUpdate {
    fn from(input: MealInput) -> Self {
        Self {
            meal_time: Patch::Value(input.meal_time()),
            description: input.description().into(),
            ..Default::default()
        }
    }
}

/// Body of `POST /meals`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealCreateRequest {
    pub pet_id: String,
    pub meal_time: String,
    pub description: Option<String>,
    pub calories: Option<i32>,
    pub plan_id: Option<String>,
}

/// Body of `PUT /meals/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealUpdateRequest {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub meal_time: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub calories: Patch<i32>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub plan_id: Patch<String>,
}

/// Builds `"{type} - {food} ({quantity}) | {notes}"`, leaving out blank parts.
pub fn format_meal_description(input: &MealInput) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !input.meal_type.is_empty() {
        parts.push(input.meal_type.clone());
    }
    if !input.food.is_empty() {
        if parts.is_empty() {
            parts.push(input.food.clone());
        } else {
            parts.push(format!("- {}", input.food));
        }
    }
    if !input.quantity.is_empty() {
        parts.push(format!("({})", input.quantity));
    }

    let mut description = parts.join(" ");
    if !input.notes.is_empty() {
        description.push_str(" | ");
        description.push_str(&input.notes);
    }
    description
}

/// Fields recovered from a stored meal description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealDescription {
    pub meal_type: String,
    pub food: String,
    pub quantity: String,
    pub notes: String,
}

fn description_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(.+?)\s*-\s*(.+?)\s*\((.+?)\)$").ok())
        .as_ref()
}

/// Splits a description written by [`format_meal_description`].
///
/// Text that does not follow `type - food (quantity)` lands in `food`.
pub fn parse_meal_description(description: &str) -> MealDescription {
    let mut sections = description.splitn(2, " | ");
    let main = sections.next().unwrap_or_default();
    let notes = sections.next().unwrap_or_default().to_string();

    match description_pattern().and_then(|re| re.captures(main)) {
        Some(caps) => MealDescription {
            meal_type: caps[1].trim().to_string(),
            food: caps[2].trim().to_string(),
            quantity: caps[3].trim().to_string(),
            notes,
        },
        None => MealDescription {
            food: main.to_string(),
            notes,
            ..Default::default()
        },
    }
}

impl Resource for Meal {
    type Wire = MealResponse;
    type Input = MealInput;
    type CreateRequest = MealCreateRequest;
    type Update = MealUpdate;
    type UpdateRequest = MealUpdateRequest;

    const PATH: &'static str = "/meals";
    const LABEL: &'static str = "Meal";

    fn from_wire(wire: MealResponse) -> Self {
        Self {
            id: wire.id,
            pet_id: wire.pet_id,
            meal_time: wire.meal_time,
            description: wire.description,
            calories: wire.calories,
            plan_id: wire.plan_id,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }

    fn to_wire(&self) -> MealResponse {
        MealResponse {
            id: self.id.clone(),
            pet_id: self.pet_id.clone(),
            meal_time: self.meal_time.clone(),
            description: self.description.clone(),
            calories: self.calories,
            plan_id: self.plan_id.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn create_request(input: &MealInput, parent_id: Option<&str>) -> MealCreateRequest {
        MealCreateRequest {
            pet_id: parent_id.unwrap_or_default().to_string(),
            meal_time: input.meal_time(),
            description: input.description(),
            calories: None,
            plan_id: None,
        }
    }

    fn update_request(update: &MealUpdate) -> MealUpdateRequest {
        MealUpdateRequest {
            meal_time: update.meal_time.clone(),
            description: update.description.clone(),
            calories: update.calories.clone(),
            plan_id: update.plan_id.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn pet_id(&self) -> Option<&str> {
        Some(&self.pet_id)
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}",
            crate::dates::format_date_time(&self.meal_time),
            self.description.as_deref().unwrap_or("-")
        )?;
        if let Some(calories) = self.calories {
            write!(f, "  {} kcal", calories)?;
        }
        write!(f, "  {}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> MealInput {
        MealInput {
            date: "2025-01-15".to_string(),
            time: "08:30".to_string(),
            meal_type: "Desayuno".to_string(),
            food: "Croquetas".to_string(),
            quantity: "150g".to_string(),
            notes: "Comió todo".to_string(),
        }
    }

    #[test]
    fn test_format_full_description() {
        assert_eq!(
            format_meal_description(&input()),
            "Desayuno - Croquetas (150g) | Comió todo"
        );
    }

    #[test]
    fn test_format_skips_blank_parts() {
        let meal = MealInput {
            meal_type: String::new(),
            notes: String::new(),
            ..input()
        };
        assert_eq!(format_meal_description(&meal), "Croquetas (150g)");
        assert_eq!(format_meal_description(&MealInput::default()), "");
    }

    #[test]
    fn test_parse_reverses_format() {
        let parsed = parse_meal_description("Desayuno - Croquetas (150g) | Comió todo");
        assert_eq!(parsed.meal_type, "Desayuno");
        assert_eq!(parsed.food, "Croquetas");
        assert_eq!(parsed.quantity, "150g");
        assert_eq!(parsed.notes, "Comió todo");
    }

    #[test]
    fn test_parse_free_text_goes_to_food() {
        let parsed = parse_meal_description("Comida Mock - Croquetas 150g");
        assert_eq!(parsed.food, "Comida Mock - Croquetas 150g");
        assert!(parsed.meal_type.is_empty());
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_round_trip_through_wire() {
        let meal = Meal {
            id: "meal-1".to_string(),
            pet_id: "pet-1".to_string(),
            meal_time: "2025-01-15T08:30:00".to_string(),
            description: Some("Desayuno - Croquetas (150g)".to_string()),
            calories: Some(420),
            plan_id: Some("plan-3".to_string()),
            created_at: "2025-01-15T08:31:00Z".to_string(),
            updated_at: "2025-01-15T08:31:00Z".to_string(),
        };

        let json = serde_json::to_value(meal.to_wire()).unwrap();
        assert_eq!(json["calories"], 420);
        assert_eq!(json["plan_id"], "plan-3");

        let wire: MealResponse = serde_json::from_value(json).unwrap();
        assert_eq!(Meal::from_wire(wire), meal);
    }

    #[test]
    fn test_create_request_shape() {
        let request = Meal::create_request(&input(), Some("pet-1"));
        assert_eq!(request.meal_time, "2025-01-15T08:30:00");
        assert_eq!(
            request.description.as_deref(),
            Some("Desayuno - Croquetas (150g) | Comió todo")
        );
        assert_eq!(request.pet_id, "pet-1");
        assert!(request.calories.is_none());
    }

    #[test]
    fn test_update_from_form_leaves_calories_alone() {
        let update: MealUpdate = input().into();
        let body = serde_json::to_value(Meal::update_request(&update)).unwrap();
        let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["description", "meal_time"]);
    }
}
