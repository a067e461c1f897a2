//! Subcommand handlers
//!
//! One handler per CLI subcommand: gather the inputs, call the client,
//! print the result. No retry or conversion logic lives here.

use crate::output;
use crate::Commands;
use anyhow::{bail, Context, Result};
use jiratools_api::{IssueUpdate, JiraClient, NewIssue};
use std::fs;
use std::path::Path;

pub async fn run(client: &JiraClient, command: Commands) -> Result<()> {
    match command {
        Commands::Create {
            summary,
            description,
            description_file,
            issue_type,
            priority,
            assignee,
            parent,
            labels,
            project,
        } => {
            let mut issue = NewIssue::new(summary);
            issue.description = text_or_file(description, description_file.as_deref())?;
            issue.issue_type = issue_type;
            issue.priority = Some(priority);
            issue.assignee = assignee;
            issue.parent = parent;
            issue.labels = labels;
            issue.project = project;

            let created = client.create_issue(&issue).await?;
            println!("✅ Created issue: {}", created.key);
            println!("🔗 URL: {}", client.config().browse_url(&created.key));
        }

        Commands::Update {
            key,
            summary,
            description,
            description_file,
            priority,
            assignee,
            labels,
        } => {
            let update = IssueUpdate {
                summary,
                description: text_or_file(description, description_file.as_deref())?,
                priority,
                assignee,
                labels,
            };
            client.update_issue(&key, &update).await?;
            println!("✅ Updated issue: {key}");
            println!("🔗 URL: {}", client.config().browse_url(&key));
        }

        Commands::Get { key, json } => {
            let raw = client.get_issue_raw(&key, &[]).await?;
            let issue = serde_json::from_value(raw.clone())?;
            output::print_issue_details(&issue);
            if json {
                println!("\n📊 JSON OUTPUT");
                println!("{}", "-".repeat(40));
                println!("{}", serde_json::to_string_pretty(&raw)?);
            }
            println!("\n🔗 URL: {}", client.config().browse_url(&key));
        }

        Commands::Search {
            jql,
            max_results,
            json,
        } => {
            let result = client.search_issues(&jql, max_results, None).await?;
            if result.issues.is_empty() {
                println!("No issues found");
            } else if json {
                println!("{}", serde_json::to_string_pretty(&result.issues)?);
            } else {
                output::print_search_table(&result.issues);
                println!("\nFound {} issues", result.issues.len());
            }
        }

        Commands::Transition { key, status } => {
            let reached = client.transition_issue(&key, &status).await?;
            println!("✅ Transitioned {key} to {reached}");
            println!("🔗 URL: {}", client.config().browse_url(&key));
        }

        Commands::Assign { key, email } => {
            client.assign_issue(&key, &email).await?;
            println!("✅ Assigned {key} to {email}");
            println!("🔗 URL: {}", client.config().browse_url(&key));
        }

        Commands::Link {
            from_key,
            to_key,
            link_type,
            epic,
        } => {
            let label = if epic {
                client.link_to_epic(&from_key, &to_key).await?;
                "epic".to_string()
            } else {
                client.link_issues(&from_key, &to_key, &link_type).await?;
                link_type
            };
            println!("✅ Linked {from_key} to {to_key} ({label})");
        }

        Commands::Comment {
            key,
            comment,
            comment_file,
        } => {
            let Some(text) = text_or_file(comment, comment_file.as_deref())? else {
                bail!("no comment text given (pass text or --comment-file)");
            };
            client.add_comment(&key, &text).await?;
            println!("✅ Added comment to {key}");
            println!("🔗 URL: {}", client.config().browse_url(&key));
        }

        Commands::Attach { key, file } => {
            client.add_attachment(&key, &file).await?;
            println!("✅ Added attachment to {key}");
            println!("🔗 URL: {}", client.config().browse_url(&key));
        }

        Commands::MyIssues { email } => {
            let result = client.my_issues(email.as_deref()).await?;
            if result.issues.is_empty() {
                println!("No issues assigned");
            } else {
                let who = email.as_deref().unwrap_or("me");
                println!("\n📋 Issues assigned to {who}:\n");
                output::print_assigned_table(&result.issues);
                println!("\nTotal: {} issues", result.issues.len());
            }
        }

        Commands::Recent { days, project } => {
            let result = client.recent_issues(days, project.as_deref()).await?;
            if result.issues.is_empty() {
                println!("No recent issues found");
            } else {
                println!("\n📅 Issues updated in last {days} days:\n");
                output::print_recent_table(&result.issues);
                println!("\nTotal: {} issues", result.issues.len());
            }
        }

        Commands::Info {
            project,
            priorities,
            statuses,
            types,
        } => {
            info(client, project.as_deref(), priorities, statuses, types).await?;
        }
    }

    Ok(())
}

async fn info(
    client: &JiraClient,
    project: Option<&str>,
    priorities: bool,
    statuses: bool,
    types: bool,
) -> Result<()> {
    if priorities {
        println!("\n📊 Available Priorities:");
        for priority in client.get_priorities().await? {
            println!("  • {}", priority.name);
        }
    }

    if statuses {
        let label = project.unwrap_or("default project");
        println!("\n📊 Available Statuses for {label}:");
        for group in client.get_statuses(project).await? {
            println!("\n  {}:", group.name);
            for status in &group.statuses {
                println!("    • {}", status.name);
            }
        }
    }

    if types {
        let label = project.unwrap_or("default project");
        println!("\n📊 Available Issue Types for {label}:");
        for issue_type in client.get_issue_types(project).await? {
            println!("  • {}", issue_type.name);
        }
    }

    if !priorities && !statuses && !types {
        let info = client.get_project(project).await?;
        println!("\n📁 Project: {} - {}", info.key, info.name);
        println!(
            "Description: {}",
            info.description.as_deref().unwrap_or("No description")
        );
        println!(
            "Lead: {}",
            info.lead
                .and_then(|lead| lead.display_name)
                .unwrap_or_else(|| "Unknown".to_string())
        );
    }

    Ok(())
}

/// Inline text wins over a file path; neither is fine for optional fields.
fn text_or_file(text: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (text, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Some(content))
        }
        (None, None) => Ok(None),
    }
}
