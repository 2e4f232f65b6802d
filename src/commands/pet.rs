use std::path::PathBuf;

use clap::{Args, Subcommand};

use petcare::api::ImageFile;
use petcare::forms::PetForm;
use petcare::hooks::CrudHook;
use petcare::models::Pet;
use petcare::ListFilter;

use super::{
    apply, confirm, create_record, print_json, print_list, store_failure, update_record, App,
    OutputFormat,
};

#[derive(Args)]
pub struct PetCommand {
    #[command(subcommand)]
    pub command: PetSubcommand,
}

/// Profile fields shared by `create` and `update`.
#[derive(Args, Default)]
pub struct PetFields {
    #[arg(long)]
    name: Option<String>,

    /// Species (e.g. Dog, Cat)
    #[arg(long)]
    species: Option<String>,

    #[arg(long)]
    breed: Option<String>,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    birth_date: Option<String>,

    /// Age in whole years
    #[arg(long)]
    age: Option<String>,

    /// Weight in kilograms
    #[arg(long)]
    weight: Option<String>,

    #[arg(long)]
    sex: Option<String>,

    #[arg(long)]
    photo_url: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

impl PetFields {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.species.is_none()
            && self.breed.is_none()
            && self.birth_date.is_none()
            && self.age.is_none()
            && self.weight.is_none()
            && self.sex.is_none()
            && self.photo_url.is_none()
            && self.notes.is_none()
    }

    fn apply_to(&self, form: &mut PetForm) {
        apply(&mut form.name, &self.name);
        apply(&mut form.species, &self.species);
        apply(&mut form.breed, &self.breed);
        apply(&mut form.birth_date, &self.birth_date);
        apply(&mut form.age_years, &self.age);
        apply(&mut form.weight_kg, &self.weight);
        apply(&mut form.sex, &self.sex);
        apply(&mut form.photo_url, &self.photo_url);
        apply(&mut form.notes, &self.notes);
    }
}

#[derive(Subcommand)]
pub enum PetSubcommand {
    /// List your pets
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one pet
    Show {
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a pet
    Create {
        #[command(flatten)]
        fields: PetFields,
    },

    /// Change a pet's profile. Pass an empty value to clear a field.
    Update {
        id: String,

        #[command(flatten)]
        fields: PetFields,
    },

    /// Delete a pet
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Upload a profile photo
    Photo { id: String, file: PathBuf },

    /// Add photos to a pet's gallery
    Gallery {
        id: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List a pet's photos
    Photos {
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete one photo, or all of them with --all
    DeletePhoto {
        id: String,

        photo_id: Option<String>,

        #[arg(long, conflicts_with = "photo_id")]
        all: bool,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl PetCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let store = app.pet_store();
        let hook = CrudHook::new(store.clone(), ListFilter::all());

        match &self.command {
            PetSubcommand::List { format } => {
                hook.mount().await;
                let state = hook.state();
                if let Some(error) = &state.error {
                    return Err(error.clone().into());
                }
                let pets = state.items;

                match format {
                    OutputFormat::Json => print_json(&pets)?,
                    OutputFormat::Text => {
                        if pets.is_empty() {
                            println!("No pets found.");
                            return Ok(());
                        }
                        println!("{:<36}  {:<20}  {:<12}  BREED", "ID", "NAME", "SPECIES");
                        println!("{}", "-".repeat(84));
                        for pet in &pets {
                            println!(
                                "{:<36}  {:<20}  {:<12}  {}",
                                pet.id,
                                truncate(&pet.name, 20),
                                truncate(&pet.species, 12),
                                pet.breed.as_deref().unwrap_or("-")
                            );
                        }
                        println!("\nTotal: {} pet(s)", pets.len());
                    }
                }
                Ok(())
            }

            PetSubcommand::Show { id, format } => {
                let pet = hook
                    .select(id)
                    .await
                    .ok_or_else(|| store_failure(&store.state()))?;
                match format {
                    OutputFormat::Json => print_json(&pet)?,
                    OutputFormat::Text => print!("{}", pet),
                }
                Ok(())
            }

            PetSubcommand::Create { fields } => {
                let pet = create_record::<Pet, PetForm>(&store, None, |form| fields.apply_to(form))
                    .await?;
                println!("Pet ID: {}", pet.id);
                Ok(())
            }

            PetSubcommand::Update { id, fields } => {
                if fields.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }
                let updated = update_record::<Pet, PetForm>(&hook, id, |form| fields.apply_to(form))
                    .await?;
                print!("{}", updated);
                Ok(())
            }

            PetSubcommand::Delete { id, force } => {
                let pet = hook
                    .select(id)
                    .await
                    .ok_or_else(|| store_failure(&store.state()))?;
                if !force && !confirm(&format!("Delete pet '{}' and all its records?", pet.name))? {
                    println!("Cancelled.");
                    return Ok(());
                }
                if !hook.handle_delete(id).await {
                    return Err(store_failure(&store.state()));
                }
                Ok(())
            }

            PetSubcommand::Photo { id, file } => {
                let photos = app.photos()?;
                let image = ImageFile::from_path(file)?;
                if !store.upload_photo(&photos, id, image).await {
                    return Err(store_failure(&store.state()));
                }
                Ok(())
            }

            PetSubcommand::Gallery { id, files } => {
                let photos = app.photos()?;
                let images = files
                    .iter()
                    .map(|path| ImageFile::from_path(path))
                    .collect::<Result<Vec<_>, _>>()?;
                let uploaded = photos.upload_gallery(id, images).await?;
                println!("Uploaded {} photo(s)", uploaded.len());
                Ok(())
            }

            PetSubcommand::Photos { id, format } => {
                let photos = app.photos()?;
                let items = photos.list_photos(id).await?;
                print_list(&items, *format, "photo(s)")
            }

            PetSubcommand::DeletePhoto {
                id,
                photo_id,
                all,
                force,
            } => {
                let photos = app.photos()?;
                if *all {
                    if !force && !confirm("Delete every photo of this pet?")? {
                        println!("Cancelled.");
                        return Ok(());
                    }
                    photos.delete_all(id).await?;
                    println!("Deleted all photos");
                    return Ok(());
                }

                let photo_id = photo_id
                    .as_deref()
                    .ok_or("Provide a photo ID or --all")?;
                photos.delete_photo(id, photo_id).await?;
                println!("Deleted photo: {}", photo_id);
                Ok(())
            }
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
