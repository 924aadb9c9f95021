use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all tasks
    List,
    /// Create a new task
    Add {
        #[arg(value_name = "NAME")]
        name: String,
        /// Who the task belongs to
        #[arg(short, long)]
        owner: String,
        /// What needs doing
        #[arg(short, long)]
        description: String,
        /// Create the task already marked complete
        #[arg(long)]
        completed: bool,
    },
    /// Edit an existing task; omitted fields keep their value
    Edit {
        #[arg(value_name = "NAME")]
        name: String,
        /// New task name
        #[arg(long, value_name = "NEW_NAME")]
        rename: Option<String>,
        #[arg(short, long)]
        owner: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Toggle a task's completion flag
    Done {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Delete a task
    Del {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Show the first task belonging to an owner
    Owner {
        #[arg(value_name = "OWNER")]
        owner: String,
    },
    /// Translate a task's description
    Translate {
        #[arg(value_name = "NAME")]
        name: String,
        /// Target language code: en, es, fr or de
        #[arg(short, long, default_value = "es")]
        lang: String,
    },
    /// Launch TUI interface
    Tui,
    /// Generate shell completion scripts
    Completions {
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}
