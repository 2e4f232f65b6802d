use clap::{Args, Subcommand};

use petcare::forms::ReminderForm;
use petcare::hooks::CrudHook;
use petcare::models::{Frequency, Reminder};

use super::{
    apply, create_record, delete_record, list_records, store_failure, update_record, App,
    OutputFormat,
};

#[derive(Args)]
pub struct ReminderCommand {
    #[command(subcommand)]
    pub command: ReminderSubcommand,
}

#[derive(Args)]
pub struct ReminderFields {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Event date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Event time (HH:MM)
    #[arg(long)]
    time: Option<String>,

    /// IANA timezone; defaults to the configured one
    #[arg(long)]
    timezone: Option<String>,

    /// once, daily, weekly, monthly or yearly
    #[arg(long)]
    frequency: Option<Frequency>,

    #[arg(long)]
    active: Option<bool>,

    /// Send an email when the reminder fires
    #[arg(long)]
    email: Option<bool>,

    /// Show the reminder in the app
    #[arg(long)]
    in_app: Option<bool>,
}

impl ReminderFields {
    fn apply_to(&self, form: &mut ReminderForm) {
        apply(&mut form.title, &self.title);
        apply(&mut form.description, &self.description);
        apply(&mut form.event_date, &self.date);
        apply(&mut form.event_hour, &self.time);
        apply(&mut form.timezone, &self.timezone);
        if let Some(frequency) = self.frequency {
            form.frequency = frequency;
        }
        if let Some(active) = self.active {
            form.is_active = active;
        }
        if let Some(email) = self.email {
            form.notify_by_email = email;
        }
        if let Some(in_app) = self.in_app {
            form.notify_in_app = in_app;
        }
    }
}

#[derive(Subcommand)]
pub enum ReminderSubcommand {
    /// List reminders
    List {
        /// Only reminders for this pet
        #[arg(long)]
        pet: Option<String>,

        /// Only active (true) or paused (false) reminders
        #[arg(long)]
        active: Option<bool>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Schedule a reminder
    Create {
        /// Pet the reminder is about
        #[arg(long)]
        pet: Option<String>,

        #[command(flatten)]
        fields: ReminderFields,
    },
    /// Change a reminder
    Update {
        id: String,

        #[command(flatten)]
        fields: ReminderFields,
    },
    /// Pause an active reminder or resume a paused one
    Toggle { id: String },
    /// Delete a reminder
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ReminderCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let store = app.store::<Reminder>();

        match &self.command {
            ReminderSubcommand::List {
                pet,
                active,
                format,
            } => {
                let hook = CrudHook::reminders(store, pet.clone(), *active);
                list_records(&hook, *format, "reminder(s)").await
            }

            ReminderSubcommand::Create { pet, fields } => {
                let timezone = app.timezone().to_string();
                let reminder =
                    create_record::<Reminder, ReminderForm>(&store, pet.as_deref(), |form| {
                        *form = ReminderForm::with_timezone(timezone);
                        fields.apply_to(form)
                    })
                    .await?;
                println!("{}", reminder);
                Ok(())
            }

            ReminderSubcommand::Update { id, fields } => {
                let hook = CrudHook::reminders(store, None, None).without_auto_fetch();
                let reminder =
                    update_record::<Reminder, ReminderForm>(&hook, id, |form| fields.apply_to(form))
                        .await?;
                println!("{}", reminder);
                Ok(())
            }

            ReminderSubcommand::Toggle { id } => {
                let hook = CrudHook::reminders(store.clone(), None, None).without_auto_fetch();
                let current = hook
                    .select(id)
                    .await
                    .ok_or_else(|| store_failure(&store.state()))?;
                let toggled = hook
                    .toggle(id, current.is_active)
                    .await
                    .ok_or_else(|| store_failure(&store.state()))?;
                let status = if toggled.is_active { "active" } else { "paused" };
                println!("Reminder '{}' is now {}", toggled.title, status);
                Ok(())
            }

            ReminderSubcommand::Delete { id, force } => {
                let hook = CrudHook::reminders(store, None, None).without_auto_fetch();
                delete_record(&hook, id, *force).await
            }
        }
    }
}
