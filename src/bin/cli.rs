use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use gatekeep::modules::applications::service::{bootstrap_application, get_applications};
use gatekeep::modules::roles::service::describe_registry;
use gatekeep::modules::users::service::UserService;
use gatekeep::state::init_app_state;
use gatekeep_models::{ApplicationId, CreateUserDto};
use validator::Validate;

#[derive(Parser)]
#[command(name = "gatekeep-cli")]
#[command(about = "Gatekeep CLI - Administrative tools for Gatekeep", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an application with its SUPER_ADMIN and APPLICATION_USER roles
    BootstrapApplication {
        /// Application name
        name: String,
    },
    /// List every application
    ListApplications,
    /// Register a user (the password is always prompted)
    RegisterUser {
        #[arg(short = 'a', long)]
        application_id: ApplicationId,

        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Register the application's super admin
        #[arg(long)]
        initial_user: bool,
    },
    /// Print the permission registry
    Permissions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let state = init_app_state().await?;

    match cli.command {
        Commands::BootstrapApplication { name } => {
            let provisioned =
                bootstrap_application(state.repository.as_ref(), &state.registry, &name)
                    .await
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
            println!("✅ Application created: {}", provisioned.application.id);
            println!("   Name: {}", provisioned.application.name);
            for role in [&provisioned.super_admin_role, &provisioned.application_user_role] {
                println!("   Role {} ({}): {}", role.name, role.id, role.permissions.join(", "));
            }
        }
        Commands::ListApplications => {
            let applications = get_applications(state.repository.as_ref())
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            if applications.is_empty() {
                println!("No applications");
            }
            for application in applications {
                println!("{}  {}", application.id, application.name);
            }
        }
        Commands::RegisterUser {
            application_id,
            name,
            email,
            initial_user,
        } => {
            let name = match name {
                Some(name) => name,
                None => Input::new()
                    .with_prompt("Name")
                    .interact_text()
                    .context("Failed to read name")?,
            };
            let email = match email {
                Some(email) => email,
                None => Input::new()
                    .with_prompt("Email address")
                    .interact_text()
                    .context("Failed to read email")?,
            };
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact()
                .context("Failed to read password")?;

            let dto = CreateUserDto {
                name,
                email,
                password,
                application_id,
                initial_user,
            };
            dto.validate()?;

            let user = UserService::register(state.repository.as_ref(), state.credentials.as_ref(), dto)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            println!("\n✅ User registered: {}", user.id);
            println!("   Email: {}", user.email);
        }
        Commands::Permissions => {
            let registry = describe_registry(&state.registry);
            println!("Registry version {}", registry.version);
            for permission in registry.permissions {
                let marker = if registry.default_permissions.contains(&permission) {
                    " (default)"
                } else {
                    ""
                };
                println!("  {}{}", permission, marker);
            }
        }
    }

    Ok(())
}
