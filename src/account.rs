use anyhow::Result;
use dialoguer::{Input, Password};

use crate::api::{Backend, HttpBackend};
use crate::audit::{AuditAction, AuditLogger};
use crate::config::Config;
use crate::session::SessionStore;

pub async fn login(phone: Option<String>) -> Result<()> {
    let config = Config::load()?;

    let phone_number = match phone {
        Some(value) => value,
        None => Input::<String>::new()
            .with_prompt("Phone number")
            .interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    if phone_number.trim().is_empty() || password.is_empty() {
        anyhow::bail!("Phone number and password are required");
    }

    let backend = HttpBackend::new(&config)?;
    let logger = AuditLogger::new()?;

    match backend.sign_in(&phone_number, &password).await {
        Ok(user) => {
            let mut session = SessionStore::new(config.session_path);
            session.update_current_user(Some(user.clone()))?;

            logger.log(
                AuditAction::Login,
                Some(user.id.clone()),
                user.role.clone(),
                true,
                None,
            )?;

            println!("✓ Signed in as {} {}", user.first_name, user.last_name);
            if user.role.is_empty() {
                println!("  No roles assigned; only public menu entries will be visible");
            } else {
                println!("  Roles: {}", user.role.join(", "));
            }
            Ok(())
        }
        Err(err) => {
            logger.log(
                AuditAction::Login,
                None,
                Vec::new(),
                false,
                Some(err.to_string()),
            )?;
            Err(err.into())
        }
    }
}

pub async fn logout() -> Result<()> {
    let config = Config::load()?;
    let mut session = SessionStore::new(config.session_path);
    session.load()?;

    let user_id = match session.current_user() {
        Some(user) => user.id.clone(),
        None => {
            println!("Not signed in");
            return Ok(());
        }
    };

    session.update_current_user(None)?;
    AuditLogger::new()?.log(AuditAction::Logout, Some(user_id), Vec::new(), true, None)?;

    println!("✓ Signed out");
    Ok(())
}

pub async fn whoami() -> Result<()> {
    let config = Config::load()?;
    let mut session = SessionStore::new(config.session_path);
    session.load()?;

    match session.current_user() {
        None => {
            println!("Not signed in");
            println!("Sign in with: verge login");
        }
        Some(user) => {
            println!("{} {}", user.first_name, user.last_name);
            println!("  ID:    {}", user.id);
            if let Some(ref email) = user.email {
                println!("  Email: {}", email);
            }
            if let Some(ref phone) = user.phone_number {
                println!("  Phone: {}", phone);
            }
            if user.role.is_empty() {
                println!("  Roles: none");
            } else {
                println!("  Roles: {}", user.role.join(", "));
            }
        }
    }

    Ok(())
}
