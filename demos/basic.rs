//! Basic example demonstrating the Dependency-Track API client.
//!
//! Run with:
//! ```
//! DTRACK_API_URL=https://dtrack.example.com DTRACK_API_KEY=your-key cargo run --example basic
//! ```

use dtrack::{
    fetch_all, get_components, ComponentFilterOptions, DtrackClient, Finding,
    FindingFilterOptions, Get, List, PageOptions, Project, ProjectFilterOptions, SortOptions,
};

#[tokio::main]
async fn main() -> dtrack::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Dependency-Track client...");
    let client = DtrackClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // List first page of active projects, sorted by name
    println!("\n--- Listing Projects (first page) ---");
    let filter = ProjectFilterOptions {
        exclude_inactive: Some(true),
        ..Default::default()
    };
    let projects_page = Project::list_page(
        &client,
        &filter,
        PageOptions::new(1, 10),
        &SortOptions::asc("name"),
    )
    .await?;
    println!(
        "Showing {} of {} projects",
        projects_page.len(),
        projects_page.total_count
    );

    for project in &projects_page {
        println!(
            "  - {} {} ({})",
            project.name,
            project.version.as_deref().unwrap_or("-"),
            project.uuid
        );
    }

    let Some(first_project) = projects_page.items.first() else {
        println!("\nNo projects found");
        return Ok(());
    };

    // Get a specific project (using the first one from the list)
    println!("\n--- Getting Project Details ---");
    let project = Project::get(&client, first_project.uuid.clone()).await?;
    println!("Project: {}", project.name);
    println!("  UUID: {}", project.uuid);
    println!("  Classifier: {}", project.classifier.as_deref().unwrap_or("unknown"));
    println!("  Tags: {}", project.tag_names().join(", "));
    println!("  Vulnerabilities: {}", project.vulnerability_count());

    // Every component of the project
    println!("\n--- Components ---");
    let components = get_components(&client, &project.uuid, ComponentFilterOptions::default()).await?;
    println!("Found {} components", components.len());

    for component in components.iter().take(5) {
        let license = component.license.as_deref().unwrap_or("unknown license");
        println!("  - {} ({})", component.coordinates(), license);
    }

    // Every finding, walking the pages with the generic combinator
    println!("\n--- Findings ---");
    let query = (project.uuid.clone(), FindingFilterOptions::default());
    let sort = SortOptions::default();
    let mut findings = fetch_all(|page| Finding::list_page(&client, &query, page, &sort)).await?;
    findings.sort_by_key(|f| f.severity());
    println!("Found {} findings", findings.len());

    for finding in findings.iter().take(5) {
        println!(
            "  - {:?} {} in {}",
            finding.severity(),
            finding.vulnerability.vuln_id,
            finding.component.name
        );
    }

    println!("\nDone!");
    Ok(())
}
