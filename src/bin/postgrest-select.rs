//! postgrest-select: inspect PostgREST select queries from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Parse and print the node tree
//! postgrest-select parse '*,team:members(user:users(id,email))'
//!
//! # Compute the response shape against a catalog
//! postgrest-select project --schema schema.json --table workspaces '*,team:members(*)'
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use postgrest_select::parser::Parser as QueryParser;
use postgrest_select::prelude::*;

#[derive(Parser)]
#[command(name = "postgrest-select")]
#[command(version)]
#[command(about = "Parse PostgREST select queries and compute their response shape", long_about = None)]
#[command(after_help = "EXAMPLES:
    postgrest-select parse '*,author:users(name)'
    postgrest-select explain 'owner:users!owner_fkey(id,email)'
    postgrest-select project -s schema.toml -t posts '*,author:users(name)' --format json")]
struct Cli {
    /// Config file (defaults to ./postgrest-select.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Maximum nesting of embedded resources
    #[arg(long, global = true, env = "POSTGREST_SELECT_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum TreeFormat {
    /// Canonical compact query text
    Query,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeFormat {
    /// TypeScript type literal
    Ts,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and print it back
    Parse {
        query: String,
        #[arg(short, long, value_enum, default_value = "query")]
        format: TreeFormat,
    },
    /// Parse a query and describe every node
    Explain { query: String },
    /// Compute the response shape of a query against a schema catalog
    Project {
        query: String,
        /// Table the query selects from
        #[arg(short, long)]
        table: String,
        /// Catalog file (.json or .toml)
        #[arg(short, long)]
        schema: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "ts")]
        format: ShapeFormat,
    },
    /// Show the syntax reference
    Syntax,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load()?,
    };
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    let parser = QueryParser::new(config.parser_options());

    match &cli.command {
        Commands::Parse { query, format } => {
            let nodes = parser.parse_query(query)?;
            match format {
                TreeFormat::Query => println!("{}", to_query(&nodes)),
                TreeFormat::Json => println!("{}", serde_json::to_string_pretty(&nodes)?),
            }
        }
        Commands::Explain { query } => explain_query(&parser, query)?,
        Commands::Project {
            query,
            table,
            schema,
            format,
        } => {
            let path = schema
                .as_ref()
                .or(config.schema.as_ref())
                .context("no schema given: pass --schema or set `schema` in the config file")?;
            let catalog = SchemaCatalog::load_from_file(path)?;
            let nodes = parser.parse_query(query)?;
            let shape = Projector::new(&catalog)
                .with_max_depth(config.max_depth)
                .project(table, &nodes)?;
            match format {
                ShapeFormat::Ts => println!("{:#}", shape),
                ShapeFormat::Json => println!("{}", serde_json::to_string_pretty(&shape)?),
            }
        }
        Commands::Syntax => show_syntax(),
    }
    Ok(())
}

fn explain_query(parser: &QueryParser, query: &str) -> Result<(), ParseError> {
    println!("{} {}", "Query:".dimmed(), query.trim().yellow());
    println!();

    let nodes = parser.parse_query(query)?;
    println!("{}", "Parsed Structure:".green().bold());
    for node in &nodes {
        explain_node(node, 1);
    }
    println!();
    println!("{} {}", "Canonical:".green().bold(), to_query(&nodes).white());
    Ok(())
}

fn explain_node(node: &Node, level: usize) {
    let pad = "  ".repeat(level);
    let field = match node {
        Node::Wildcard => {
            println!("{}• {} {}", pad, "*".cyan().bold(), "(all columns)".dimmed());
            return;
        }
        Node::Field(field) => field,
    };

    let mut line = format!("{}• {}", pad, field.name.white().bold());
    if field.is_renamed() {
        line.push_str(&format!(" {} {}", "←".dimmed(), field.source_column.cyan()));
    }
    if let Some(hint) = &field.hint {
        line.push_str(&format!(" {}", format!("via {}", hint).magenta()));
    }
    if field.is_embedded() {
        line.push_str(&format!(" {}", "(embedded)".dimmed()));
    }
    println!("{}", line);

    for child in field.children.iter().flatten() {
        explain_node(child, level + 1);
    }
}

fn show_syntax() {
    println!("{}", "Select Syntax Reference".cyan().bold());
    println!();

    let forms = [
        ("*", "Wildcard", "Every column of the table"),
        ("col", "Column", "One column, keyed by its name"),
        ("alias:col", "Rename", "One column under another key"),
        ("rel(...)", "Embed", "Fields of a related table"),
        ("alias:rel(...)", "Renamed embed", "Related fields under another key"),
        ("alias:rel!fk(...)", "Hinted embed", "Follow the foreign key named fk"),
        (",", "Separator", "Between sibling fields"),
    ];

    println!(
        "{:20} {:15} {}",
        "Form".white().bold(),
        "Name".white().bold(),
        "Meaning".white().bold()
    );
    println!("{}", "─".repeat(70).dimmed());

    for (form, name, meaning) in forms {
        println!("{:20} {:15} {}", form.cyan().bold(), name.yellow(), meaning.white());
    }
}
