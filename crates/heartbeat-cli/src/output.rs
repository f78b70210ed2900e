//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use heartbeat_core::{Task, User};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning to stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print the fields of a user record.
pub fn user(user: &User) {
    field("User ID", &user.id.to_string());
    field("Username", &user.username);
    field("Score", &user.score.to_string());
    if let Some(code) = &user.invitation_code {
        field("Invitation code", code);
    }
    match &user.partner {
        Some(partner) => field("Partner", &partner.username),
        None => field("Partner", "none"),
    }
}

/// Print a task as a single summary line.
pub fn task_line(task: &Task) {
    let marker = if task.is_active {
        "[active]".green()
    } else {
        "[done]".dimmed()
    };
    match &task.description {
        Some(description) => println!(
            "{:>4} {} {} {}",
            task.id.to_string().bold(),
            marker,
            task.title,
            format!("- {}", description).dimmed()
        ),
        None => println!("{:>4} {} {}", task.id.to_string().bold(), marker, task.title),
    }
}

/// Print all fields of a task.
pub fn task(task: &Task) {
    field("ID", &task.id.to_string());
    field("Title", &task.title);
    field("Description", task.description.as_deref().unwrap_or(""));
    field("Active", if task.is_active { "yes" } else { "no" });
    field("Creator", &task.creator.username);
}
