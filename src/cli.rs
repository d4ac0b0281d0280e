use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "verge")]
#[command(about = "Sign in. Filter. Assign. - Role and menu access companion for the Verge billing backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Dry-run mode: show what would change without making changes")]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    Login {
        #[arg(long, help = "Phone number to sign in with")]
        phone: Option<String>,
    },

    Logout,

    Whoami,

    Menu {
        #[arg(long = "as", value_name = "ROLE", help = "Preview the menu for an explicit role set instead of the current session")]
        as_roles: Vec<String>,
    },

    Permissions {
        role: String,
    },

    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    Audit {
        #[arg(long, help = "Filter by target user id")]
        user: Option<String>,

        #[arg(long, help = "Show last N entries")]
        last: Option<usize>,
    },

    Tui,

    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    List,

    Show {
        id: String,
    },

    Roles {
        id: String,

        #[arg(long, value_name = "ROLE", help = "Add a role to the pending set")]
        add: Vec<String>,

        #[arg(long, value_name = "ROLE", help = "Remove a role from the pending set")]
        remove: Vec<String>,

        #[arg(long, help = "Pick the role set interactively")]
        interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Init,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { phone } => crate::account::login(phone).await,
        Commands::Logout => crate::account::logout().await,
        Commands::Whoami => crate::account::whoami().await,
        Commands::Menu { as_roles } => crate::menu::show_menu(as_roles).await,
        Commands::Permissions { role } => crate::roles::show_permissions(role).await,
        Commands::Users { action } => match action {
            UsersAction::List => crate::users::list_users().await,
            UsersAction::Show { id } => crate::users::show_user(id).await,
            UsersAction::Roles { id, add, remove, interactive } => {
                crate::users::edit_roles(id, add, remove, interactive, cli.dry_run).await
            }
        },
        Commands::Audit { user, last } => crate::audit::show_audit(user, last).await,
        Commands::Tui => crate::tui::run_dashboard().await,
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) => crate::config::show_config().await,
            Some(ConfigAction::Init) => crate::config::init_config().await,
            None => crate::config::show_config().await,
        },
    }
}
