//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the dtrack binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::pagination::{PageOptions, SortOptions};

/// Dependency-Track API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "dtrack", about = "Dependency-Track API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Dependency-Track server URL.
    #[arg(long, global = true, env = "DTRACK_API_URL")]
    pub api_url: Option<String>,

    /// Dependency-Track API key.
    #[arg(long, global = true, env = "DTRACK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by UUID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity UUID.
        uuid: String,
    },

    /// List entities with optional sorting and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Project UUID (required for components and findings).
        #[arg(long)]
        project: Option<String>,

        /// Page number (1-indexed).
        #[arg(long, conflicts_with = "all")]
        page: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        size: Option<u32>,

        /// Field to sort on.
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending instead of ascending.
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Fetch every page instead of a single one.
        #[arg(long)]
        all: bool,
    },

    /// Delete an entity.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// The entity UUID.
        uuid: String,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A portfolio project.
    #[value(alias = "projects")]
    Project,
    /// A project component.
    #[value(alias = "components")]
    Component,
    /// A vulnerability finding.
    #[value(alias = "findings")]
    Finding,
}

/// Build page options from `--page` / `--size`.
pub fn page_options(page: Option<u32>, size: Option<u32>) -> PageOptions {
    PageOptions::new(page.unwrap_or(1), size.unwrap_or(0))
}

/// Build sort options from `--sort` / `--desc`.
pub fn sort_options(sort: Option<String>, desc: bool) -> SortOptions {
    match sort {
        Some(field) if desc => SortOptions::desc(field),
        Some(field) => SortOptions::asc(field),
        None => SortOptions::default(),
    }
}
