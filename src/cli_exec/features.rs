use tfmon::forms::{FeatureDraft, join_tags, parse_tags, submit_feature, toggle_feature};

use super::*;

pub(super) fn handle_features_command(
    rt: &Runtime,
    panel: &Panel,
    command: FeatureCommands,
) -> Result<()> {
    let client = &panel.client;
    match command {
        FeatureCommands::List { json } => {
            let features = rt.block_on(client.list::<Feature>())?;
            if json {
                print_json(&features, "feature list")?;
            } else if features.is_empty() {
                println!("No features.");
            } else {
                for f in &features {
                    println!(
                        "{}  {:<8} {:<32} {}",
                        f.id.short(),
                        f.state_label(),
                        f.name,
                        join_tags(&f.tags)
                    );
                }
            }
        }
        FeatureCommands::Show { id, json } => {
            let f = rt.block_on(client.get::<Feature>(&RecordId::new(id)))?;
            if json {
                print_json(&f, "feature")?;
            } else {
                println!("id: {}", f.id);
                println!("name: {}", f.name);
                println!("state: {}", f.state_label());
                println!("tags: {}", join_tags(&f.tags));
                println!("source:");
                println!("{}", f.source);
            }
        }
        FeatureCommands::Add {
            name,
            source,
            source_file,
            tags,
            disabled,
            json,
        } => {
            let source = match (source, source_file) {
                (Some(source), _) => source,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("read {}", path.display()))?,
                (None, None) => anyhow::bail!("one of --source or --source-file is required"),
            };
            let draft = FeatureDraft {
                name,
                source,
                tags: parse_tags(&tags),
                disabled,
            };
            let id = rt.block_on(submit_feature(client, &draft, None))?;
            if json {
                print_json(&serde_json::json!({ "id": id }), "feature add")?;
            } else {
                println!("{}", id);
            }
        }
        FeatureCommands::Toggle { id } => {
            let f = rt.block_on(client.get::<Feature>(&RecordId::new(id)))?;
            let disabled = rt.block_on(toggle_feature(client, &f))?;
            println!(
                "{} {}",
                f.name,
                if disabled { "disabled" } else { "enabled" }
            );
        }
        FeatureCommands::Delete { id } => {
            let id = RecordId::new(id);
            rt.block_on(client.delete::<Feature>(&id))?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

pub(super) fn handle_foreign_resources_command(
    rt: &Runtime,
    panel: &Panel,
    command: ForeignResourceCommands,
) -> Result<()> {
    match command {
        ForeignResourceCommands::List { exceptions, json } => {
            let mut resources = rt.block_on(panel.client.list::<ForeignResource>())?;
            if exceptions {
                resources.retain(|r| r.is_exception);
            }
            if json {
                print_json(&resources, "foreign resource list")?;
            } else if resources.is_empty() {
                println!("No foreign resources.");
            } else {
                for r in &resources {
                    println!(
                        "{}  {:<20} {:<32} {}{}",
                        r.id.short(),
                        r.date_time,
                        r.resource_type,
                        r.resource_id,
                        if r.is_exception { " (exception)" } else { "" }
                    );
                }
            }
        }
    }
    Ok(())
}
