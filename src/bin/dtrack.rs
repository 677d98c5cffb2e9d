//! Dependency-Track CLI binary.
//!
//! A command-line interface for interacting with the Dependency-Track API.

use clap::Parser;
use dtrack::cli::{page_options, sort_options, Cli, Command, Entity};
use dtrack::output::PrettyPrint;
use dtrack::{
    Component, Delete, DtrackClient, DtrackError, Finding, Get, List, Page, Project,
    DEFAULT_PAGE_SIZE,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set DTRACK_API_URL and DTRACK_API_KEY, or pass --api-url/--api-key");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> dtrack::Result<DtrackClient> {
    let api_url = cli
        .api_url
        .as_deref()
        .ok_or_else(|| DtrackError::ConfigMissing("DTRACK_API_URL".to_string()))?;
    let api_key = cli
        .api_key
        .as_deref()
        .ok_or_else(|| DtrackError::ConfigMissing("DTRACK_API_KEY".to_string()))?;
    DtrackClient::new(api_key, api_url)
}

async fn run(client: &DtrackClient, cli: Cli) -> dtrack::Result<()> {
    match cli.command {
        Command::Get { entity, uuid } => handle_get(client, entity, uuid, cli.json).await,
        Command::List {
            entity,
            project,
            page,
            size,
            sort,
            desc,
            all,
        } => {
            let args = ListArgs {
                project,
                page: page_options(page, size),
                sort: sort_options(sort, desc),
                all,
            };
            handle_list(client, entity, args, cli.json).await
        }
        Command::Delete { entity, uuid } => handle_delete(client, entity, uuid).await,
    }
}

struct ListArgs {
    project: Option<String>,
    page: dtrack::PageOptions,
    sort: dtrack::SortOptions,
    all: bool,
}

impl ListArgs {
    fn require_project(&self, what: &str) -> dtrack::Result<String> {
        self.project.clone().ok_or_else(|| {
            DtrackError::Validation(format!("--project is required for listing {what}"))
        })
    }

    fn page_size_for_all(&self) -> u32 {
        if self.page.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page.page_size
        }
    }
}

async fn handle_get(
    client: &DtrackClient,
    entity: Entity,
    uuid: String,
    json: bool,
) -> dtrack::Result<()> {
    match entity {
        Entity::Project => {
            let project = Project::get(client, uuid).await?;
            output_single(&project, json)?;
        }
        Entity::Component => {
            let component = Component::get(client, uuid).await?;
            output_single(&component, json)?;
        }
        Entity::Finding => {
            eprintln!("Hint: Use 'dtrack list findings --project <uuid>'");
            return Err(DtrackError::Validation(
                "findings can only be listed per project".to_string(),
            ));
        }
    }
    Ok(())
}

async fn handle_list(
    client: &DtrackClient,
    entity: Entity,
    args: ListArgs,
    json: bool,
) -> dtrack::Result<()> {
    let cancel = tokio_util::sync::CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = list_entities(client, entity, &args, json, &cancel).await;
    ctrl_c.abort();
    result
}

async fn list_entities(
    client: &DtrackClient,
    entity: Entity,
    args: &ListArgs,
    json: bool,
    cancel: &tokio_util::sync::CancellationToken,
) -> dtrack::Result<()> {
    match entity {
        Entity::Project => {
            let query = Default::default();
            if args.all {
                let projects = Project::list_all_with(
                    client,
                    &query,
                    &args.sort,
                    args.page_size_for_all(),
                    cancel,
                )
                .await?;
                output_all(&projects, json, |x| ProjectRow::from(x))
            } else {
                let page = Project::list_page(client, &query, args.page, &args.sort).await?;
                output_page(&page, args.page.page_number, json, |x| ProjectRow::from(x))
            }
        }
        Entity::Component => {
            let query = (args.require_project("components")?, Default::default());
            if args.all {
                let components = Component::list_all_with(
                    client,
                    &query,
                    &args.sort,
                    args.page_size_for_all(),
                    cancel,
                )
                .await?;
                output_all(&components, json, |x| ComponentRow::from(x))
            } else {
                let page = Component::list_page(client, &query, args.page, &args.sort).await?;
                output_page(&page, args.page.page_number, json, |x| ComponentRow::from(x))
            }
        }
        Entity::Finding => {
            let query = (args.require_project("findings")?, Default::default());
            if args.all {
                let findings = Finding::list_all_with(
                    client,
                    &query,
                    &args.sort,
                    args.page_size_for_all(),
                    cancel,
                )
                .await?;
                output_all(&findings, json, |x| FindingRow::from(x))
            } else {
                let page = Finding::list_page(client, &query, args.page, &args.sort).await?;
                output_page(&page, args.page.page_number, json, |x| FindingRow::from(x))
            }
        }
    }
}

async fn handle_delete(client: &DtrackClient, entity: Entity, uuid: String) -> dtrack::Result<()> {
    match entity {
        Entity::Project => Project::delete(client, uuid.clone()).await?,
        Entity::Component => Component::delete(client, uuid.clone()).await?,
        Entity::Finding => {
            return Err(DtrackError::Validation(
                "findings cannot be deleted; suppress them in Dependency-Track instead".to_string(),
            ));
        }
    }
    eprintln!("Deleted {uuid}");
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> dtrack::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, page_number: u32, json: bool, to_row: F) -> dtrack::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\nPage {} ({} total items)", page_number, page.total_count);
    }
    Ok(())
}

fn output_all<T, R, F>(items: &[T], json: bool, to_row: F) -> dtrack::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} items", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProjectRow {
    uuid: String,
    name: String,
    version: String,
    vulns: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            uuid: p.uuid.clone(),
            name: p.name.clone(),
            version: p.version.clone().unwrap_or_default(),
            vulns: p
                .metrics
                .as_ref()
                .map(|m| m.vulnerabilities.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ComponentRow {
    uuid: String,
    component: String,
    license: String,
}

impl From<&Component> for ComponentRow {
    fn from(c: &Component) -> Self {
        Self {
            uuid: c.uuid.clone(),
            component: c.coordinates(),
            license: c.license.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "vulnerability")]
    vuln_id: String,
    severity: String,
    component: String,
    suppressed: String,
}

impl From<&Finding> for FindingRow {
    fn from(f: &Finding) -> Self {
        Self {
            vuln_id: f.vulnerability.vuln_id.clone(),
            severity: format!("{:?}", f.severity()),
            component: match f.component.version {
                Some(ref v) => format!("{}@{}", f.component.name, v),
                None => f.component.name.clone(),
            },
            suppressed: if f.is_suppressed() { "yes" } else { "" }.to_string(),
        }
    }
}
