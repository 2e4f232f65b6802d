mod auth;
mod config_cmd;
mod contact;
mod health;
mod meal;
mod pet;
mod reminder;

pub use auth::AuthCommand;
pub use config_cmd::ConfigCommand;
pub use contact::ContactCommand;
pub use health::{DewormingCommand, VaccineCommand, VisitCommand};
pub use meal::MealCommand;
pub use pet::PetCommand;
pub use reminder::ReminderCommand;

use std::error::Error;
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;

use petcare::api::error::FALLBACK_MESSAGE;
use petcare::api::{ApiClient, Navigator, PhotoService, SessionStorage, SessionStore};
use petcare::config::Config;
use petcare::forms::{Form, FormModel};
use petcare::hooks::CrudHook;
use petcare::models::Pet;
use petcare::store::{AuthStore, EntityStore, Notifier, OfflineBackend};
use petcare::{Resource, StoreState};

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints successes for the user; errors come back through `run()` and are
/// printed once by `main`.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::debug!(message, "store error");
    }
}

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect_to_root(&self) {
        eprintln!("Your session has expired. Run `petcare auth login` to sign in again.");
    }
}

/// Everything a command needs: configuration, the shared client and the
/// stores built on it.
pub struct App {
    config: Config,
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    offline: bool,
}

impl App {
    pub fn new(config: Config, offline: bool) -> Result<Self, Box<dyn Error>> {
        let data_dir = config.data_dir.value.clone();
        std::fs::create_dir_all(&data_dir)?;
        let session = SessionStore::persistent(SessionStorage::in_dir(&data_dir))?;
        let client = ApiClient::with_navigator(
            &config.api_url.value,
            Arc::new(session),
            Arc::new(ConsoleNavigator),
        );
        if offline {
            tracing::info!("offline mode, using the in-memory backend");
        }

        Ok(Self {
            config,
            client,
            notifier: Arc::new(ConsoleNotifier),
            offline,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timezone(&self) -> &str {
        &self.config.timezone.value
    }

    pub fn store<R: Resource>(&self) -> Arc<EntityStore<R>> {
        let store = if self.offline {
            EntityStore::new(
                Arc::new(OfflineBackend::<R>::new()),
                Arc::clone(&self.notifier),
            )
        } else {
            EntityStore::remote(self.client.clone(), Arc::clone(&self.notifier))
        };
        Arc::new(store)
    }

    /// Offline runs start from the demo pets.
    pub fn pet_store(&self) -> Arc<EntityStore<Pet>> {
        if self.offline {
            Arc::new(EntityStore::new(
                Arc::new(OfflineBackend::<Pet>::demo()),
                Arc::clone(&self.notifier),
            ))
        } else {
            self.store::<Pet>()
        }
    }

    pub fn auth(&self) -> Result<AuthStore, Box<dyn Error>> {
        self.require_online("Authentication")?;
        Ok(AuthStore::new(self.client.clone(), Arc::clone(&self.notifier)))
    }

    pub fn photos(&self) -> Result<PhotoService, Box<dyn Error>> {
        self.require_online("Photos")?;
        Ok(PhotoService::new(self.client.clone()))
    }

    fn require_online(&self, what: &str) -> Result<(), Box<dyn Error>> {
        if self.offline {
            return Err(format!("{} is not available in offline mode", what).into());
        }
        Ok(())
    }
}

/// Turns the store's recorded error into a command error.
pub(crate) fn store_failure<R>(state: &StoreState<R>) -> Box<dyn Error> {
    state
        .error
        .clone()
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
        .into()
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints one record per line followed by the total.
pub(crate) fn print_list<T: Display + Serialize>(
    items: &[T],
    format: OutputFormat,
    noun: &str,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => print_json(items)?,
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No {} found.", noun);
                return Ok(());
            }
            for item in items {
                println!("{}", item);
            }
            println!("\nTotal: {} {}", items.len(), noun);
        }
    }
    Ok(())
}

pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Reads one line from stdin after showing `label`.
pub(crate) fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Uses the flag value when given, otherwise asks for it.
pub(crate) fn value_or_prompt(value: &Option<String>, label: &str) -> io::Result<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => prompt(label),
    }
}

/// Overwrites a form field when the option was passed. An empty string
/// clears the field.
pub(crate) fn apply(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

/// Loads the hook's list and prints it.
pub(crate) async fn list_records<R>(
    hook: &CrudHook<R>,
    format: OutputFormat,
    noun: &str,
) -> Result<(), Box<dyn Error>>
where
    R: Resource + Display + Serialize,
{
    hook.mount().await;
    let state = hook.state();
    if state.error.is_some() {
        return Err(store_failure(&state));
    }
    print_list(&state.items, format, noun)
}

/// Fills a blank create form through `fill` and saves it under `parent_id`.
pub(crate) async fn create_record<R, M>(
    store: &EntityStore<R>,
    parent_id: Option<&str>,
    fill: impl FnOnce(&mut M),
) -> Result<R, Box<dyn Error>>
where
    R: Resource,
    M: FormModel<Output = R::Input>,
{
    let mut form = Form::<M>::create();
    fill(form.values_mut());
    let created = form
        .submit(|input| async move { store.create(&input, parent_id).await })
        .await?;
    Ok(created)
}

/// Seeds an edit form from the stored record, applies `edit` and saves.
pub(crate) async fn update_record<R, M>(
    hook: &CrudHook<R>,
    id: &str,
    edit: impl FnOnce(&mut M),
) -> Result<R, Box<dyn Error>>
where
    R: Resource,
    M: FormModel<Entity = R>,
    R::Update: From<M::Output>,
{
    let store = hook.store();
    let current = hook
        .select(id)
        .await
        .ok_or_else(|| store_failure(&store.state()))?;

    let mut form = Form::<M>::edit(&current);
    edit(form.values_mut());
    let updated = form
        .submit(|output| async move {
            let update = R::Update::from(output);
            store.update(id, &update).await
        })
        .await?;
    Ok(updated)
}

pub(crate) async fn delete_record<R>(
    hook: &CrudHook<R>,
    id: &str,
    force: bool,
) -> Result<(), Box<dyn Error>>
where
    R: Resource + Display,
{
    let record = hook
        .select(id)
        .await
        .ok_or_else(|| store_failure(&hook.state()))?;
    if !force && !confirm(&format!("Delete {} '{}'?", R::LABEL.to_lowercase(), record))? {
        println!("Cancelled.");
        return Ok(());
    }
    if !hook.handle_delete(id).await {
        return Err(store_failure(&hook.state()));
    }
    Ok(())
}
