//! ragula CLI - Manage and query Ragula collections.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ragula::models::{CreateLinkPayload, QueryPayload, UpdateCollectionPayload};
use ragula::{RagulaClient, UploadRequest, DEFAULT_BASE_URL};

/// CLI tool for the Ragula document retrieval API.
#[derive(Parser)]
#[command(name = "ragula")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ragula host; `/api` is appended when missing.
    #[arg(long, env = "RAGULA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// API token sent as a bearer credential.
    #[arg(long, env = "RAGULA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage collections.
    #[command(subcommand)]
    Collections(CollectionCommands),

    /// Manage folders in a collection.
    #[command(subcommand)]
    Folders(FolderCommands),

    /// Manage files in a collection.
    #[command(subcommand)]
    Files(FileCommands),

    /// Manage links in a collection.
    #[command(subcommand)]
    Links(LinkCommands),

    /// Query a collection and print ranked results.
    Query {
        collection: String,
        query: String,

        /// Maximum number of results.
        #[arg(long)]
        top_k: Option<u32>,

        /// Only search these folders.
        #[arg(long = "folder")]
        folders: Vec<String>,

        /// Only search these file types.
        #[arg(long = "file-type")]
        file_types: Vec<String>,
    },

    /// Ask a question about a collection.
    Ask { collection: String, question: String },
}

#[derive(Subcommand)]
enum CollectionCommands {
    /// List collections.
    List,
    /// Create a collection.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a collection.
    Get { collection: String },
    /// Update a collection's name or description.
    Update {
        collection: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description.
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete a collection.
    Delete { collection: String },
    /// Show processing status of a collection.
    Status { collection: String },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// List folders.
    List {
        collection: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Create a folder.
    Create {
        collection: String,
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Delete a folder.
    Delete { collection: String, folder: String },
}

#[derive(Subcommand)]
enum FileCommands {
    /// List files.
    List {
        collection: String,
        #[arg(long)]
        folder: Option<String>,
    },
    /// Upload files (supports glob patterns like *.pdf).
    Upload {
        collection: String,
        #[arg(required = true)]
        patterns: Vec<String>,
        /// Destination folder ID.
        #[arg(long)]
        folder: Option<String>,
    },
    /// Delete a file.
    Delete { collection: String, file: String },
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Add a web link.
    Create {
        collection: String,
        name: String,
        url: String,
        #[arg(long)]
        folder: Option<String>,
    },
    /// Delete a link.
    Delete { collection: String, link: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = RagulaClient::new(&cli.base_url, cli.api_key);

    match cli.command {
        Commands::Collections(command) => run_collections(&client, command).await?,
        Commands::Folders(command) => run_folders(&client, command).await?,
        Commands::Files(command) => run_files(&client, command).await?,
        Commands::Links(command) => run_links(&client, command).await?,

        Commands::Query {
            collection,
            query,
            top_k,
            folders,
            file_types,
        } => {
            let mut payload = QueryPayload::new(query)
                .folder_ids(folders)
                .file_types(file_types);
            payload.top_k = top_k;

            let response = client
                .query()
                .query_collection_with(&collection, &payload)
                .await
                .with_context(|| format!("Failed to query collection: {}", collection))?;
            print_json(&response)?;
        }

        Commands::Ask {
            collection,
            question,
        } => {
            let response = client
                .query()
                .ask_question(&collection, &question)
                .await
                .with_context(|| format!("Failed to ask collection: {}", collection))?;
            println!("{}", response.answer);
        }
    }

    Ok(())
}

async fn run_collections(client: &RagulaClient, command: CollectionCommands) -> Result<()> {
    let collections = client.collections();

    match command {
        CollectionCommands::List => {
            let list = collections.list().await.context("Failed to list collections")?;
            if list.is_empty() {
                println!("No collections found.");
            } else {
                println!("{:<36} {:<30} {}", "ID", "NAME", "DESCRIPTION");
                println!("{}", "-".repeat(90));
                for collection in list {
                    println!("{}", collection);
                }
            }
        }
        CollectionCommands::Create { name, description } => {
            let collection = collections
                .create(&name, description.as_deref())
                .await
                .with_context(|| format!("Failed to create collection: {}", name))?;
            print_json(&collection)?;
        }
        CollectionCommands::Get { collection } => {
            let details = collections
                .get(&collection)
                .await
                .with_context(|| format!("Failed to get collection: {}", collection))?;
            print_json(&details)?;
        }
        CollectionCommands::Update {
            collection,
            name,
            description,
            clear_description,
        } => {
            let mut payload = UpdateCollectionPayload::default();
            if let Some(name) = name {
                payload = payload.name(name);
            }
            if let Some(description) = description {
                payload = payload.description(description);
            }
            if clear_description {
                payload = payload.clear_description();
            }

            let updated = collections
                .update(&collection, &payload)
                .await
                .with_context(|| format!("Failed to update collection: {}", collection))?;
            print_json(&updated)?;
        }
        CollectionCommands::Delete { collection } => {
            collections
                .delete(&collection)
                .await
                .with_context(|| format!("Failed to delete collection: {}", collection))?;
            println!("Deleted {}", collection);
        }
        CollectionCommands::Status { collection } => {
            let status = collections
                .status(&collection)
                .await
                .with_context(|| format!("Failed to get status of collection: {}", collection))?;
            print_json(&status)?;
        }
    }

    Ok(())
}

async fn run_folders(client: &RagulaClient, command: FolderCommands) -> Result<()> {
    let folders = client.folders();

    match command {
        FolderCommands::List { collection, parent } => {
            let list = folders
                .list(&collection, parent.as_deref())
                .await
                .with_context(|| format!("Failed to list folders in collection: {}", collection))?;
            if list.is_empty() {
                println!("No folders found.");
            } else {
                println!("{:<36} {:<36} {}", "ID", "PARENT", "NAME");
                println!("{}", "-".repeat(90));
                for folder in list {
                    println!("{}", folder);
                }
            }
        }
        FolderCommands::Create {
            collection,
            name,
            parent,
        } => {
            let folder = folders
                .create(&collection, &name, parent.as_deref())
                .await
                .with_context(|| format!("Failed to create folder: {}", name))?;
            print_json(&folder)?;
        }
        FolderCommands::Delete { collection, folder } => {
            folders
                .delete(&collection, &folder)
                .await
                .with_context(|| format!("Failed to delete folder: {}", folder))?;
            println!("Deleted {}", folder);
        }
    }

    Ok(())
}

async fn run_files(client: &RagulaClient, command: FileCommands) -> Result<()> {
    let files = client.files();

    match command {
        FileCommands::List { collection, folder } => {
            let list = files
                .list(&collection, folder.as_deref())
                .await
                .with_context(|| format!("Failed to list files in collection: {}", collection))?;
            if list.is_empty() {
                println!("No files found.");
            } else {
                println!("{:<36} {:>10} {:<30} {}", "ID", "SIZE", "TYPE", "NAME");
                println!("{}", "-".repeat(100));
                for file in list {
                    println!("{}", file);
                }
            }
        }
        FileCommands::Upload {
            collection,
            patterns,
            folder,
        } => {
            let paths = expand_patterns(&patterns)?;
            if paths.is_empty() {
                anyhow::bail!("No files to upload");
            }

            println!("Uploading {} file(s) to {}...", paths.len(), collection);

            for (idx, path) in paths.iter().enumerate() {
                let filename = path.file_name().unwrap_or_default().to_string_lossy();
                print!("[{}/{}] Uploading {}... ", idx + 1, paths.len(), filename);

                let mut request = UploadRequest::from_path(path);
                request.folder_id = folder.clone();

                match files.upload(&collection, &request).await {
                    Ok(file) => println!("OK ({})", file.id),
                    Err(e) => {
                        println!("FAILED");
                        eprintln!("  Error: {}", e);
                    }
                }
            }

            println!("Done.");
        }
        FileCommands::Delete { collection, file } => {
            files
                .delete(&collection, &file)
                .await
                .with_context(|| format!("Failed to delete file: {}", file))?;
            println!("Deleted {}", file);
        }
    }

    Ok(())
}

async fn run_links(client: &RagulaClient, command: LinkCommands) -> Result<()> {
    let links = client.links();

    match command {
        LinkCommands::Create {
            collection,
            name,
            url,
            folder,
        } => {
            let payload = CreateLinkPayload {
                name,
                url,
                folder_id: folder,
            };
            let link = links
                .create(&collection, &payload)
                .await
                .with_context(|| format!("Failed to create link: {}", payload.url))?;
            print_json(&link)?;
        }
        LinkCommands::Delete { collection, link } => {
            links
                .delete(&collection, &link)
                .await
                .with_context(|| format!("Failed to delete link: {}", link))?;
            println!("Deleted {}", link);
        }
    }

    Ok(())
}

/// Expand glob patterns into a sorted, de-duplicated list of files.
///
/// A pattern that matches nothing is tried as a literal path.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let matches: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();

        if !matches.is_empty() {
            paths.extend(matches);
            continue;
        }

        let literal = PathBuf::from(pattern);
        if literal.is_file() {
            paths.push(literal);
        } else {
            warn!(%pattern, "no files matched pattern");
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
