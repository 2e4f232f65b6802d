//! Health record commands: vaccines, dewormings and vet visits.
//!
//! Every record belongs to a pet. Lists take the pet ID; updates and
//! deletes take the record ID.

use clap::{Args, Subcommand};

use petcare::dates::{now_iso, split_local};
use petcare::forms::{DewormingForm, VaccineForm, VetVisitForm};
use petcare::hooks::CrudHook;
use petcare::models::{Deworming, Vaccine, VetVisit};
use petcare::ListFilter;

use super::{apply, create_record, delete_record, list_records, update_record, App, OutputFormat};

#[derive(Args)]
pub struct VaccineCommand {
    #[command(subcommand)]
    pub command: VaccineSubcommand,
}

#[derive(Args)]
pub struct VaccineFields {
    /// Vaccine name
    #[arg(long)]
    name: Option<String>,

    /// Date administered (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Next due date (YYYY-MM-DD)
    #[arg(long)]
    next_due: Option<String>,

    #[arg(long)]
    vet: Option<String>,

    #[arg(long)]
    manufacturer: Option<String>,

    #[arg(long)]
    lot: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

impl VaccineFields {
    fn apply_to(&self, form: &mut VaccineForm) {
        apply(&mut form.vaccine_name, &self.name);
        apply(&mut form.date_administered, &self.date);
        apply(&mut form.next_due, &self.next_due);
        apply(&mut form.veterinarian, &self.vet);
        apply(&mut form.manufacturer, &self.manufacturer);
        apply(&mut form.lot_number, &self.lot);
        apply(&mut form.notes, &self.notes);
    }
}

#[derive(Subcommand)]
pub enum VaccineSubcommand {
    /// List a pet's vaccines
    List {
        pet_id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Record a vaccine
    Create {
        pet_id: String,

        #[command(flatten)]
        fields: VaccineFields,
    },
    /// Change a vaccine record. An empty value clears an optional field.
    Update {
        id: String,

        #[command(flatten)]
        fields: VaccineFields,
    },
    /// Delete a vaccine record
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl VaccineCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let store = app.store::<Vaccine>();

        match &self.command {
            VaccineSubcommand::List { pet_id, format } => {
                let hook = CrudHook::for_pet(store, pet_id.as_str());
                list_records(&hook, *format, "vaccine(s)").await
            }
            VaccineSubcommand::Create { pet_id, fields } => {
                let vaccine =
                    create_record::<Vaccine, VaccineForm>(&store, Some(pet_id.as_str()), |form| {
                        fields.apply_to(form)
                    })
                    .await?;
                println!("{}", vaccine);
                Ok(())
            }
            VaccineSubcommand::Update { id, fields } => {
                let hook = CrudHook::new(store, ListFilter::all()).without_auto_fetch();
                let vaccine =
                    update_record::<Vaccine, VaccineForm>(&hook, id, |form| fields.apply_to(form))
                        .await?;
                println!("{}", vaccine);
                Ok(())
            }
            VaccineSubcommand::Delete { id, force } => {
                let hook = CrudHook::new(store, ListFilter::all()).without_auto_fetch();
                delete_record(&hook, id, *force).await
            }
        }
    }
}

#[derive(Args)]
pub struct DewormingCommand {
    #[command(subcommand)]
    pub command: DewormingSubcommand,
}

#[derive(Args)]
pub struct DewormingFields {
    #[arg(long)]
    medication: Option<String>,

    /// Date administered (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Next due date (YYYY-MM-DD)
    #[arg(long)]
    next_due: Option<String>,

    #[arg(long)]
    vet: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

impl DewormingFields {
    fn apply_to(&self, form: &mut DewormingForm) {
        apply(&mut form.medication, &self.medication);
        apply(&mut form.date_administered, &self.date);
        apply(&mut form.next_due, &self.next_due);
        apply(&mut form.veterinarian, &self.vet);
        apply(&mut form.notes, &self.notes);
    }
}

#[derive(Subcommand)]
pub enum DewormingSubcommand {
    /// List a pet's dewormings
    List {
        pet_id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Record a deworming
    Create {
        pet_id: String,

        #[command(flatten)]
        fields: DewormingFields,
    },
    /// Change a deworming record
    Update {
        id: String,

        #[command(flatten)]
        fields: DewormingFields,
    },
    /// Delete a deworming record
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl DewormingCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let store = app.store::<Deworming>();

        match &self.command {
            DewormingSubcommand::List { pet_id, format } => {
                let hook = CrudHook::for_pet(store, pet_id.as_str());
                list_records(&hook, *format, "deworming(s)").await
            }
            DewormingSubcommand::Create { pet_id, fields } => {
                let deworming = create_record::<Deworming, DewormingForm>(
                    &store,
                    Some(pet_id.as_str()),
                    |form| fields.apply_to(form),
                )
                .await?;
                println!("{}", deworming);
                Ok(())
            }
            DewormingSubcommand::Update { id, fields } => {
                let hook = CrudHook::new(store, ListFilter::all()).without_auto_fetch();
                let deworming = update_record::<Deworming, DewormingForm>(&hook, id, |form| {
                    fields.apply_to(form)
                })
                .await?;
                println!("{}", deworming);
                Ok(())
            }
            DewormingSubcommand::Delete { id, force } => {
                let hook = CrudHook::new(store, ListFilter::all()).without_auto_fetch();
                delete_record(&hook, id, *force).await
            }
        }
    }
}

#[derive(Args)]
pub struct VisitCommand {
    #[command(subcommand)]
    pub command: VisitSubcommand,
}

#[derive(Args)]
pub struct VisitFields {
    /// Visit date (YYYY-MM-DD), today when creating without one
    #[arg(long)]
    date: Option<String>,

    /// Visit time (HH:MM), the current time when creating without one
    #[arg(long)]
    time: Option<String>,

    #[arg(long)]
    reason: Option<String>,

    #[arg(long)]
    diagnosis: Option<String>,

    #[arg(long)]
    treatment: Option<String>,

    /// Follow-up date (YYYY-MM-DD)
    #[arg(long)]
    follow_up: Option<String>,

    /// Follow-up time (HH:MM), noon when omitted
    #[arg(long)]
    follow_up_time: Option<String>,

    #[arg(long)]
    vet: Option<String>,
}

impl VisitFields {
    fn apply_to(&self, form: &mut VetVisitForm) {
        apply(&mut form.visit_date, &self.date);
        apply(&mut form.visit_hour, &self.time);
        apply(&mut form.reason, &self.reason);
        apply(&mut form.diagnosis, &self.diagnosis);
        apply(&mut form.treatment, &self.treatment);
        apply(&mut form.follow_up_date, &self.follow_up);
        apply(&mut form.follow_up_hour, &self.follow_up_time);
        apply(&mut form.veterinarian, &self.vet);
    }
}

#[derive(Subcommand)]
pub enum VisitSubcommand {
    /// List a pet's vet visits
    List {
        pet_id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Record a vet visit
    Create {
        pet_id: String,

        #[command(flatten)]
        fields: VisitFields,
    },
    /// Change a vet visit
    Update {
        id: String,

        #[command(flatten)]
        fields: VisitFields,
    },
    /// Delete a vet visit
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl VisitCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let store = app.store::<VetVisit>();

        match &self.command {
            VisitSubcommand::List { pet_id, format } => {
                let hook = CrudHook::for_pet(store, pet_id.as_str());
                list_records(&hook, *format, "visit(s)").await
            }
            VisitSubcommand::Create { pet_id, fields } => {
                let visit = create_record::<VetVisit, VetVisitForm>(
                    &store,
                    Some(pet_id.as_str()),
                    |form| {
                        if let Some((date, hour)) = split_local(&now_iso()) {
                            form.visit_date = date;
                            form.visit_hour = hour;
                        }
                        fields.apply_to(form)
                    },
                )
                .await?;
                println!("{}", visit);
                Ok(())
            }
            VisitSubcommand::Update { id, fields } => {
                let hook = CrudHook::new(store, ListFilter::all()).without_auto_fetch();
                let visit =
                    update_record::<VetVisit, VetVisitForm>(&hook, id, |form| fields.apply_to(form))
                        .await?;
                println!("{}", visit);
                Ok(())
            }
            VisitSubcommand::Delete { id, force } => {
                let hook = CrudHook::new(store, ListFilter::all()).without_auto_fetch();
                delete_record(&hook, id, *force).await
            }
        }
    }
}
