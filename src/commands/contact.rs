use clap::{Args, Subcommand};

use petcare::forms::ContactForm;
use petcare::hooks::CrudHook;
use petcare::models::ContactSubmission;
use petcare::ListFilter;

use super::{create_record, list_records, value_or_prompt, App, OutputFormat};

#[derive(Args)]
pub struct ContactCommand {
    #[command(subcommand)]
    pub command: ContactSubcommand,
}

#[derive(Subcommand)]
pub enum ContactSubcommand {
    /// Send a message to the support team
    Send {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        message: Option<String>,

        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },

    /// List submitted messages
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ContactCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let store = app.store::<ContactSubmission>();

        match &self.command {
            ContactSubcommand::Send {
                name,
                email,
                subject,
                message,
                accept_terms,
            } => {
                let values = ContactForm {
                    name: value_or_prompt(name, "Name")?,
                    email: value_or_prompt(email, "Email")?,
                    subject: value_or_prompt(subject, "Subject")?,
                    message: value_or_prompt(message, "Message")?,
                    accept_terms: *accept_terms,
                };
                let sent = create_record::<ContactSubmission, ContactForm>(&store, None, |form| {
                    *form = values
                })
                .await?;
                println!("Reference: {}", sent.id);
                Ok(())
            }

            ContactSubcommand::List { format } => {
                let hook = CrudHook::new(store, ListFilter::all());
                list_records(&hook, *format, "message(s)").await
            }
        }
    }
}
