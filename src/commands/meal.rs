use clap::{Args, Subcommand};

use petcare::forms::MealForm;
use petcare::hooks::CrudHook;
use petcare::models::Meal;
use petcare::ListFilter;

use super::{apply, create_record, delete_record, list_records, update_record, App, OutputFormat};

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Args)]
pub struct MealFields {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    date: Option<String>,

    /// Time (HH:MM)
    #[arg(long)]
    time: Option<String>,

    /// Meal type (e.g. Breakfast, Dinner)
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    meal_type: Option<String>,

    #[arg(long)]
    food: Option<String>,

    /// Amount served (e.g. 200g)
    #[arg(long)]
    quantity: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

impl MealFields {
    fn apply_to(&self, form: &mut MealForm) {
        apply(&mut form.date, &self.date);
        apply(&mut form.time, &self.time);
        apply(&mut form.meal_type, &self.meal_type);
        apply(&mut form.food, &self.food);
        apply(&mut form.quantity, &self.quantity);
        apply(&mut form.notes, &self.notes);
    }
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// List a pet's meals
    List {
        pet_id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Log a meal
    Log {
        pet_id: String,

        #[command(flatten)]
        fields: MealFields,
    },

    /// Change a logged meal
    Update {
        id: String,

        #[command(flatten)]
        fields: MealFields,
    },

    /// Delete a logged meal
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl MealCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let store = app.store::<Meal>();

        match &self.command {
            MealSubcommand::List { pet_id, format } => {
                let hook = CrudHook::for_pet(store, pet_id.as_str());
                list_records(&hook, *format, "meal(s)").await
            }

            MealSubcommand::Log { pet_id, fields } => {
                let meal = create_record::<Meal, MealForm>(&store, Some(pet_id.as_str()), |form| {
                    fields.apply_to(form)
                })
                .await?;

                println!("Logged meal:");
                println!();
                println!("  {}", meal);
                Ok(())
            }

            MealSubcommand::Update { id, fields } => {
                let hook = CrudHook::new(store, ListFilter::all()).without_auto_fetch();
                let meal =
                    update_record::<Meal, MealForm>(&hook, id, |form| fields.apply_to(form)).await?;
                println!("{}", meal);
                Ok(())
            }

            MealSubcommand::Delete { id, force } => {
                let hook = CrudHook::new(store, ListFilter::all()).without_auto_fetch();
                delete_record(&hook, id, *force).await
            }
        }
    }
}
