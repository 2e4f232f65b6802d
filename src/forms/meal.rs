use super::validate::{FormErrors, Validator};
use super::FormModel;
use crate::dates::{parse_date, parse_time, split_local, today};
use crate::models::{parse_meal_description, Meal, MealInput};

/// Meal log form. Type, food, quantity and notes are folded into the
/// stored description.
#[derive(Debug, Clone, PartialEq)]
pub struct MealForm {
    pub date: String,
    pub time: String,
    pub meal_type: String,
    pub food: String,
    pub quantity: String,
    pub notes: String,
}

/// New meals default to today.
impl Default for MealForm {
    fn default() -> Self {
        Self {
            date: today(),
            time: String::new(),
            meal_type: String::new(),
            food: String::new(),
            quantity: String::new(),
            notes: String::new(),
        }
    }
}

impl FormModel for MealForm {
    type Entity = Meal;
    type Output = MealInput;

    fn from_entity(meal: &Meal) -> Self {
        let (date, time) = split_local(&meal.meal_time).unwrap_or_default();
        let parsed = meal
            .description
            .as_deref()
            .map(parse_meal_description)
            .unwrap_or_default();
        Self {
            date,
            time,
            meal_type: parsed.meal_type,
            food: parsed.food,
            quantity: parsed.quantity,
            notes: parsed.notes,
        }
    }

    fn validate(&self) -> Result<(), FormErrors> {
        let mut v = Validator::new();
        v.field("date", &self.date)
            .required("Date is required")
            .satisfies(|d| parse_date(d).is_some(), "Invalid date");
        v.field("time", &self.time)
            .required("Time is required")
            .satisfies(|t| parse_time(t).is_some(), "Invalid time");
        v.field("food", &self.food)
            .max_length(200, "Food cannot exceed 200 characters");
        v.field("quantity", &self.quantity)
            .max_length(100, "Quantity cannot exceed 100 characters");
        v.finish()
    }

    fn to_output(&self) -> MealInput {
        MealInput {
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            meal_type: self.meal_type.trim().to_string(),
            food: self.food.trim().to_string(),
            quantity: self.quantity.trim().to_string(),
            notes: self.notes.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(description: Option<&str>) -> Meal {
        Meal {
            id: "m1".to_string(),
            pet_id: "p1".to_string(),
            meal_time: "2025-01-15T08:30:00".to_string(),
            description: description.map(str::to_string),
            calories: None,
            plan_id: None,
            created_at: "2025-01-15T08:31:00Z".to_string(),
            updated_at: "2025-01-15T08:31:00Z".to_string(),
        }
    }

    #[test]
    fn test_defaults_to_today() {
        assert_eq!(MealForm::default().date, today());
    }

    #[test]
    fn test_edit_parses_description() {
        let form = MealForm::from_entity(&meal(Some("Breakfast - Kibble (200g) | Ate slowly")));
        assert_eq!(form.date, "2025-01-15");
        assert_eq!(form.time, "08:30");
        assert_eq!(form.meal_type, "Breakfast");
        assert_eq!(form.food, "Kibble");
        assert_eq!(form.quantity, "200g");
        assert_eq!(form.notes, "Ate slowly");
    }

    #[test]
    fn test_edit_free_text_description() {
        let form = MealForm::from_entity(&meal(Some("Some chicken")));
        assert_eq!(form.food, "Some chicken");
        assert!(form.meal_type.is_empty());
    }

    #[test]
    fn test_time_required() {
        let errors = MealForm::default().validate().unwrap_err();
        assert_eq!(errors.get("time"), Some("Time is required"));
        assert!(!errors.contains("date"));
    }

    #[test]
    fn test_output_builds_meal_time() {
        let form = MealForm {
            date: "2025-01-15".to_string(),
            time: "19:00".to_string(),
            food: "Tuna".to_string(),
            ..Default::default()
        };
        let input = form.to_output();
        assert_eq!(input.meal_time(), "2025-01-15T19:00:00");
        assert_eq!(input.description().as_deref(), Some("Tuna"));
    }
}
