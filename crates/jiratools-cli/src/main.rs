//! jira-tools CLI
//!
//! The `jira` binary: command line interface for JIRA Cloud issue
//! operations. Markdown descriptions and comments are converted to ADF
//! before submission; results render as tables or JSON.

use clap::{Parser, Subcommand};
use jiratools_api::JiraClient;
use std::path::PathBuf;

mod commands;
mod output;

#[derive(Parser, Debug)]
#[command(name = "jira")]
#[command(about = "JIRA command line tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new issue
    Create {
        /// Issue summary
        summary: String,
        /// Issue description (Markdown)
        #[arg(short, long)]
        description: Option<String>,
        /// Read the description from a file
        #[arg(short = 'f', long)]
        description_file: Option<PathBuf>,
        /// Issue type
        #[arg(short = 't', long = "type", default_value = "Story")]
        issue_type: String,
        /// Priority
        #[arg(short, long, default_value = "Medium")]
        priority: String,
        /// Assignee email
        #[arg(short, long)]
        assignee: Option<String>,
        /// Parent issue key (for subtasks and epic children)
        #[arg(long)]
        parent: Option<String>,
        /// Labels to add
        #[arg(short, long, num_args = 1..)]
        labels: Vec<String>,
        /// Project key (defaults to JIRA_PROJECT_KEY)
        #[arg(long)]
        project: Option<String>,
    },

    /// Update an existing issue
    Update {
        /// Issue key
        key: String,
        /// New summary
        #[arg(short, long)]
        summary: Option<String>,
        /// New description (Markdown)
        #[arg(short, long)]
        description: Option<String>,
        /// Read the new description from a file
        #[arg(short = 'f', long)]
        description_file: Option<PathBuf>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// New assignee email
        #[arg(short, long)]
        assignee: Option<String>,
        /// New labels (replaces the whole set)
        #[arg(short, long, num_args = 1..)]
        labels: Option<Vec<String>>,
    },

    /// Get issue details
    Get {
        /// Issue key
        key: String,
        /// Also print the raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Search issues with JQL
    Search {
        /// JQL query
        jql: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 50)]
        max_results: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change issue status
    Transition {
        /// Issue key
        key: String,
        /// Target status name
        status: String,
    },

    /// Assign issue to a user
    Assign {
        /// Issue key
        key: String,
        /// Assignee email
        email: String,
    },

    /// Link two issues
    Link {
        /// Source issue key
        from_key: String,
        /// Target issue key
        to_key: String,
        /// Link type
        #[arg(short = 't', long = "type", default_value = "Relates")]
        link_type: String,
        /// Link as epic child
        #[arg(long)]
        epic: bool,
    },

    /// Add a comment to an issue
    Comment {
        /// Issue key
        key: String,
        /// Comment text (Markdown)
        comment: Option<String>,
        /// Read the comment from a file
        #[arg(short = 'f', long)]
        comment_file: Option<PathBuf>,
    },

    /// Add an attachment to an issue
    Attach {
        /// Issue key
        key: String,
        /// File to attach
        file: PathBuf,
    },

    /// Get my assigned issues
    MyIssues {
        /// User email (defaults to the configured account)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Get recently updated issues
    Recent {
        /// Days back
        #[arg(short, long, default_value_t = 7)]
        days: u32,
        /// Project key
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Get project and system information
    Info {
        /// Project key
        #[arg(short, long)]
        project: Option<String>,
        /// Show priorities
        #[arg(long)]
        priorities: bool,
        /// Show statuses
        #[arg(long)]
        statuses: bool,
        /// Show issue types
        #[arg(long)]
        types: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(cli).await {
        eprintln!("\u{274c} Error: {error:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = JiraClient::from_env()?;
    commands::run(&client, cli.command).await
}
