mod api;
mod cli;
mod config;
mod models;
mod resolve;
mod translate;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use api::{HttpTaskApi, TaskBackend};
use cli::{Cli, Commands};
use config::Config;
use models::{Language, Task, TaskDraft};
use resolve::resolve_task;
use translate::{HfTranslator, Translator};
use ui::{run_tui, App};

fn main() -> Result<()> {
    let cli = Cli::parse();
    // stderr logging would tear the alternate screen, so the TUI runs silent
    if !matches!(cli.command, Some(Commands::Tui) | None) {
        env_logger::init();
    }
    let config = Config::from_env();
    let api: Arc<dyn TaskBackend> = Arc::new(HttpTaskApi::new(&config.api_url));
    let translator: Arc<dyn Translator> =
        Arc::new(HfTranslator::new(&config.hf_api_url, &config.hf_api_key));

    match cli.command {
        Some(Commands::List) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let tasks = api.list_tasks().await?;
                print_tasks(&tasks);
                Ok::<(), anyhow::Error>(())
            })?;
        }
        Some(Commands::Add {
            name,
            owner,
            description,
            completed,
        }) => {
            let draft = TaskDraft {
                name,
                description,
                is_completed: completed,
                owner,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let tasks = api::submit_draft(api.as_ref(), None, &draft).await?;
                println!("Task '{}' added", draft.name);
                print_tasks(&tasks);
                Ok::<(), anyhow::Error>(())
            })?;
        }
        Some(Commands::Edit {
            name,
            rename,
            owner,
            description,
        }) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let tasks = api.list_tasks().await?;
                let Some(task) = resolve_task(&tasks, &name) else {
                    println!("Task '{}' not found", name);
                    return Ok(());
                };
                let mut draft = TaskDraft::from(task);
                if let Some(rename) = rename {
                    draft.name = rename;
                }
                if let Some(owner) = owner {
                    draft.owner = owner;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
                let id = task.id.clone();
                let tasks = api::submit_draft(api.as_ref(), Some(&id), &draft).await?;
                println!("Task '{}' updated", draft.name);
                print_tasks(&tasks);
                Ok::<(), anyhow::Error>(())
            })?;
        }
        Some(Commands::Done { name }) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let tasks = api.list_tasks().await?;
                let Some(task) = resolve_task(&tasks, &name) else {
                    println!("Task '{}' not found", name);
                    return Ok(());
                };
                let mut draft = TaskDraft::from(task);
                draft.is_completed = !draft.is_completed;
                let id = task.id.clone();
                api::submit_draft(api.as_ref(), Some(&id), &draft).await?;
                let state = if draft.is_completed {
                    "complete"
                } else {
                    "open"
                };
                println!("Task '{}' marked {}", draft.name, state);
                Ok::<(), anyhow::Error>(())
            })?;
        }
        Some(Commands::Del { name }) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let tasks = api.list_tasks().await?;
                let Some(task) = resolve_task(&tasks, &name) else {
                    println!("Task '{}' not found", name);
                    return Ok(());
                };
                let task_name = task.name.clone();
                let id = task.id.clone();
                let tasks = api::delete_and_refresh(api.as_ref(), &id).await?;
                println!("Task '{}' deleted", task_name);
                print_tasks(&tasks);
                Ok::<(), anyhow::Error>(())
            })?;
        }
        Some(Commands::Owner { owner }) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                match api.find_by_owner(&owner).await? {
                    Some(task) => print_tasks(std::slice::from_ref(&task)),
                    None => println!("No task found for owner '{}'", owner),
                }
                Ok::<(), anyhow::Error>(())
            })?;
        }
        Some(Commands::Translate { name, lang }) => {
            let Some(lang) = Language::from_code(&lang) else {
                println!("Unsupported language: {} (expected en, es, fr or de)", lang);
                return Ok(());
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let tasks = api.list_tasks().await?;
                let Some(task) = resolve_task(&tasks, &name) else {
                    println!("Task '{}' not found", name);
                    return Ok(());
                };
                let translated = translator.translate(&task.description, lang).await;
                println!("{}", translated);
                Ok::<(), anyhow::Error>(())
            })?;
        }
        Some(Commands::Completions { shell }) => {
            use clap_complete::{generate, Shell};
            let shell = shell.to_lowercase();
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "elvish" => Shell::Elvish,
                "powershell" => Shell::PowerShell,
                _ => {
                    println!("Unsupported shell: {}", shell);
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "lingodo", &mut std::io::stdout());
        }
        Some(Commands::Tui) | None => {
            let rt = tokio::runtime::Runtime::new()?;
            let app = App::new(api, translator, rt.handle().clone());
            run_tui(app)?;
        }
    }

    Ok(())
}

fn print_tasks(tasks: &[Task]) {
    println!("Tasks:");
    println!("------");
    for task in tasks {
        let status = if task.is_completed { "x" } else { " " };
        println!(
            "[{}] {} | Owner: {} | {}",
            status, task.name, task.owner, task.description
        );
    }
}
