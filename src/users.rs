use anyhow::Result;
use dialoguer::{Confirm, MultiSelect};

use crate::api::{Backend, HttpBackend};
use crate::audit::{AuditAction, AuditLogger};
use crate::config::Config;
use crate::editor::{EditorState, RoleEditor};
use crate::roles::{self, Role, KNOWN_ROLES};

pub async fn list_users() -> Result<()> {
    let config = Config::load()?;
    let backend = HttpBackend::new(&config)?;

    let users = backend.list_users().await?;

    if users.is_empty() {
        println!("No users found");
        return Ok(());
    }

    println!("Users:");
    for user in users {
        let roles = user
            .roles
            .filter(|r| !r.is_empty())
            .map(|r| r.join(", "))
            .unwrap_or_else(|| "no roles assigned".to_string());

        println!(
            "  {} - {} {} ({})",
            user.id, user.first_name, user.last_name, roles
        );
    }

    Ok(())
}

pub async fn show_user(id: String) -> Result<()> {
    let config = Config::load()?;
    let backend = HttpBackend::new(&config)?;

    let user = backend.fetch_user(&id).await?;

    println!("{} {}", user.first_name, user.last_name);
    println!("  ID:    {}", user.id);
    if let Some(ref email) = user.email {
        println!("  Email: {}", email);
    }
    if let Some(ref phone) = user.phone_number {
        println!("  Phone: {}", phone);
    }

    let assigned = user.role.unwrap_or_default();
    if assigned.is_empty() {
        println!("  Roles: none");
        return Ok(());
    }
    println!("  Roles: {}", assigned.join(", "));

    println!();
    println!("Nominal grants (advisory; the backend is authoritative):");
    for label in &assigned {
        let role = Role::from(label.as_str());
        let grants = roles::permissions_for(&role);
        if grants.is_empty() {
            println!("  {}: (no entries in the permission table)", role);
            continue;
        }
        for (resource, actions) in grants {
            let actions: Vec<&str> = actions.iter().map(|a| a.as_str()).collect();
            println!("  {}: {} {}", role, resource, actions.join(", "));
        }
    }

    Ok(())
}

pub async fn edit_roles(
    id: String,
    add: Vec<String>,
    remove: Vec<String>,
    interactive: bool,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load()?;
    let backend = HttpBackend::new(&config)?;

    let user = backend.fetch_user(&id).await?;
    let persisted: Vec<Role> = user
        .role
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(Role::from)
        .collect();

    let mut editor = RoleEditor::new(user.id.clone());
    editor.begin(persisted);

    println!(
        "Editing roles for {} {} (user {})",
        user.first_name, user.last_name, user.id
    );
    print_pending(&editor);

    for label in add {
        let role = Role::from(label.as_str());
        if let Role::Unknown(name) = &role {
            println!("⚠️  '{}' is not a known role; assigning it anyway", name);
        }
        if !editor.add_role(role.clone()) {
            println!("  '{}' is already assigned", role);
        }
    }

    for label in remove {
        let role = Role::from(label.as_str());
        if !editor.remove_role(&role) {
            println!("  '{}' was not assigned; nothing to remove", role);
        }
    }

    if interactive {
        select_roles(&mut editor)?;
    }

    print_pending(&editor);

    let payload: Vec<String> = editor
        .pending()
        .iter()
        .map(|role| role.as_str().to_string())
        .collect();

    if dry_run {
        println!("🔍 DRY RUN: would send to {}/assign-roles:", config.api_url.trim_end_matches('/'));
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "userId": editor.user_id(),
                "role": payload,
            }))?
        );
        return Ok(());
    }

    if !Confirm::new()
        .with_prompt(format!(
            "Replace the stored role set for user {}?",
            editor.user_id()
        ))
        .default(false)
        .interact()?
    {
        anyhow::bail!("Aborted by user");
    }

    let logger = AuditLogger::new()?;
    let outcome = editor.submit(&backend).await.clone();

    match outcome {
        EditorState::Success => {
            logger.log(
                AuditAction::Assign,
                Some(editor.user_id().to_string()),
                payload,
                true,
                None,
            )?;
            editor.acknowledge();
            println!("✅ Roles assigned successfully");
            Ok(())
        }
        EditorState::Failed(message) => {
            logger.log(
                AuditAction::Assign,
                Some(editor.user_id().to_string()),
                payload,
                false,
                Some(message.clone()),
            )?;
            editor.acknowledge();
            anyhow::bail!("Failed to assign roles: {}", message)
        }
        other => anyhow::bail!("Unexpected editor state after submit: {:?}", other),
    }
}

fn select_roles(editor: &mut RoleEditor) -> Result<()> {
    let mut choices: Vec<Role> = KNOWN_ROLES.to_vec();
    for role in editor.pending() {
        if !choices.contains(role) {
            choices.push(role.clone());
        }
    }

    let labels: Vec<&str> = choices.iter().map(|role| role.as_str()).collect();
    let defaults: Vec<bool> = choices
        .iter()
        .map(|role| editor.pending().contains(role))
        .collect();

    let picked = MultiSelect::new()
        .with_prompt("Select roles (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    let selected: Vec<Role> = picked.into_iter().map(|i| choices[i].clone()).collect();

    for role in &choices {
        if !selected.contains(role) {
            editor.remove_role(role);
        }
    }
    for role in selected {
        editor.add_role(role);
    }

    Ok(())
}

fn print_pending(editor: &RoleEditor) {
    if editor.pending().is_empty() {
        println!("  Pending roles: (none)");
    } else {
        let labels: Vec<&str> = editor.pending().iter().map(|role| role.as_str()).collect();
        println!("  Pending roles: {}", labels.join(", "));
    }
}
