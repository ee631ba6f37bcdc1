use super::open;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = open(false)?;
    let dash = app.dashboard();
    if json {
        println!("{}", serde_json::to_string_pretty(&dash)?);
        return Ok(());
    }

    println!("Projects: {}", dash.project_count);
    println!(
        "Active:   {}",
        dash.active_project.as_deref().unwrap_or("(none)")
    );
    println!("Labels:   {}", dash.label_count);
    for count in &dash.label_counts {
        println!("  {} {:<10} {}", count.emoji, count.text, count.count);
    }
    if !dash.recent_projects.is_empty() {
        println!("Recent:");
        for project in &dash.recent_projects {
            println!("  {}  {}  {}", project.id, project.name, project.created);
        }
    }
    Ok(())
}
