use tfmon::model::LogKind;

use super::*;

pub(super) fn handle_logs_command(rt: &Runtime, panel: &Panel, command: LogCommands) -> Result<()> {
    let client = &panel.client;
    match command {
        LogCommands::List { json } => {
            let mut entries = rt.block_on(client.list::<LogEntry>())?;
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            if json {
                print_json(&entries, "log list")?;
            } else if entries.is_empty() {
                println!("No log entries.");
            } else {
                for e in &entries {
                    println!(
                        "{}  {:<20} {:<12} {:<28} {}",
                        e.id.short(),
                        e.date_time,
                        e.kind.label(),
                        e.compliance_change_label(),
                        e.details
                    );
                }
            }
        }
        LogCommands::Show { id, json } => {
            let entry = rt.block_on(client.get::<LogEntry>(&RecordId::new(id)))?;
            if json {
                print_json(&entry, "log entry")?;
            } else {
                print_details(&entry);
            }
        }
        LogCommands::Delete { id } => {
            let id = RecordId::new(id);
            rt.block_on(client.delete::<LogEntry>(&id))?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

fn print_details(e: &LogEntry) {
    println!("id: {}", e.id);
    println!("kind: {}", e.kind.label());
    println!("time: {}", e.date_time);
    if !e.details.is_empty() {
        println!("tfstate: {}", e.details);
    }
    println!("result: {}", e.compliance_change_label());
    if e.kind == LogKind::Tfstate {
        println!("lines changed: {}", e.lines_changed_label());
    }
    if let Some(features) = &e.compliance_features {
        println!("features:");
        for (name, passed) in features {
            println!("  {} {}", if *passed { "ok  " } else { "FAIL" }, name);
        }
    }
    if let Some(fails) = &e.compliance_fail_messages {
        for (name, messages) in fails {
            for m in messages {
                println!("  {}: {}", name, m);
            }
        }
    }
}
