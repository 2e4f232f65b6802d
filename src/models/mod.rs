mod auth;
mod contact;
mod deworming;
mod frequency;
mod meal;
mod pet;
mod pet_photo;
mod reminder;
mod user;
mod vaccine;
mod vet_visit;

pub use auth::{
    Credentials, LoginResponse, MessageResponse, PasswordResetRequest, RefreshRequest,
    ResetPasswordRequest, TokenRequest, TokenResponse,
};
pub use contact::{ContactInput, ContactResponse, ContactStatus, ContactSubmission, ContactUpdate};
pub use deworming::{Deworming, DewormingInput, DewormingResponse, DewormingUpdate};
pub use frequency::Frequency;
pub use meal::{
    format_meal_description, parse_meal_description, Meal, MealDescription, MealInput,
    MealResponse, MealUpdate,
};
pub use pet::{Pet, PetInput, PetRequest, PetResponse};
pub use pet_photo::{PetPhoto, PetPhotoResponse};
pub use reminder::{Reminder, ReminderInput, ReminderResponse, ReminderUpdate};
pub use user::{User, UserProfile};
pub use vaccine::{Vaccine, VaccineInput, VaccineUpdate, VaccinationResponse};
pub use vet_visit::{VetVisit, VetVisitInput, VetVisitResponse, VetVisitUpdate};
