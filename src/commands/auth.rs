//! Account commands: sign up, sign in and out, email verification and
//! password recovery.

use clap::{Args, Subcommand};

use petcare::forms::{ForgotPasswordForm, Form, LoginForm, RegisterForm, ResetPasswordForm};
use petcare::store::AuthStore;

use super::{print_json, prompt, value_or_prompt, App, OutputFormat};

#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand)]
pub enum AuthSubcommand {
    /// Create an account
    Register {
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Sign in with email and password
    Login {
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Show the signed-in user's profile
    Me {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Exchange the refresh token for a new session
    Refresh,
    /// Confirm an email address with the token from the verification email
    VerifyEmail { token: String },
    /// Ask for a password reset link
    ForgotPassword {
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Set a new password with the token from the reset link
    ResetPassword { token: String },
}

impl AuthCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let auth = app.auth()?;

        match &self.command {
            AuthSubcommand::Register { email } => {
                let mut form = Form::<RegisterForm>::create();
                form.set_values(RegisterForm {
                    email: value_or_prompt(email, "Email")?,
                    password: prompt("Password")?,
                    confirm_password: prompt("Confirm password")?,
                });
                let auth = &auth;
                let user = form
                    .submit(|credentials| async move { auth.register(&credentials).await })
                    .await?;
                println!("Account created for {}", user.email);
                Ok(())
            }

            AuthSubcommand::Login { email } => login(&auth, email).await,

            AuthSubcommand::Logout => {
                if !auth.is_authenticated() {
                    println!("Not logged in.");
                    return Ok(());
                }
                auth.logout().await;
                Ok(())
            }

            AuthSubcommand::Status => {
                if !auth.is_authenticated() {
                    println!("Not logged in.");
                    println!("Run `petcare auth login` to sign in.");
                    return Ok(());
                }
                match auth.user() {
                    Some(user) => println!("Logged in as {}", user.email),
                    None => println!("Logged in."),
                }
                println!("Server: {}", app.config().api_url.value);
                Ok(())
            }

            AuthSubcommand::Me { format } => {
                let user = auth.get_user_data().await?;
                match format {
                    OutputFormat::Json => print_json(&user)?,
                    OutputFormat::Text => print!("{}", user),
                }
                Ok(())
            }

            AuthSubcommand::Refresh => {
                if auth.refresh_tokens().await {
                    println!("Session refreshed.");
                    Ok(())
                } else {
                    Err("Could not refresh the session. Please log in again.".into())
                }
            }

            AuthSubcommand::VerifyEmail { token } => {
                auth.verify_email(token.trim()).await?;
                Ok(())
            }

            AuthSubcommand::ForgotPassword { email } => {
                let mut form = Form::<ForgotPasswordForm>::create();
                form.set_values(ForgotPasswordForm {
                    email: value_or_prompt(email, "Email")?,
                });
                let auth = &auth;
                form.submit(|email| async move { auth.request_password_reset(&email).await })
                    .await?;
                Ok(())
            }

            AuthSubcommand::ResetPassword { token } => {
                let mut form = Form::<ResetPasswordForm>::create();
                form.set_values(ResetPasswordForm {
                    token: token.clone(),
                    password: prompt("New password")?,
                    confirm_password: prompt("Confirm new password")?,
                });
                let auth = &auth;
                form.submit(|request| async move {
                    auth.reset_password(&request.token, &request.new_password)
                        .await
                })
                .await?;
                println!("You can now log in with the new password.");
                Ok(())
            }
        }
    }
}

/// Signs in, then loads the profile so `status` can show who is signed in.
async fn login(auth: &AuthStore, email: &Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut form = Form::<LoginForm>::create();
    form.set_values(LoginForm {
        email: value_or_prompt(email, "Email")?,
        password: prompt("Password")?,
    });

    form.submit(|credentials| async move { auth.login(&credentials).await })
        .await?;

    if let Err(e) = auth.get_user_data().await {
        tracing::warn!(error = %e, "signed in but could not load the profile");
    }
    Ok(())
}
