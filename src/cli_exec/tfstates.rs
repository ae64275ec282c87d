use tfmon::forms::{TfStateDraft, join_tags, parse_tags, submit_tfstate};
use tfmon::sync::{Poller, SharedRecords, TfStateValidation, trigger, wait_until_settled};

use super::*;

pub(super) fn handle_tfstates_command(
    rt: &Runtime,
    panel: &Panel,
    command: TfStateCommands,
) -> Result<()> {
    let client = &panel.client;
    match command {
        TfStateCommands::List { account, json } => {
            let mut states = rt.block_on(client.list::<TfState>())?;
            if let Some(account) = account.as_deref() {
                states.retain(|s| s.account == account);
            }
            if json {
                print_json(&states, "tfstate list")?;
            } else if states.is_empty() {
                println!("No tfstates.");
            } else {
                for s in &states {
                    println!("{}", summary_line(s));
                }
            }
        }
        TfStateCommands::Show { id, json } => {
            let state = rt.block_on(client.get::<TfState>(&RecordId::new(id)))?;
            if json {
                print_json(&state, "tfstate")?;
            } else {
                print_details(&state);
            }
        }
        TfStateCommands::Add {
            account,
            bucket,
            path,
            tags,
            json,
        } => {
            let draft = TfStateDraft {
                account,
                bucket,
                path,
                tags: parse_tags(&tags),
            };
            let id = rt.block_on(submit_tfstate(client, &draft, None))?;
            if json {
                print_json(&serde_json::json!({ "id": id }), "tfstate add")?;
            } else {
                println!("{}", id);
            }
        }
        TfStateCommands::Edit {
            id,
            account,
            bucket,
            path,
            tags,
        } => {
            let id = RecordId::new(id);
            let current = rt.block_on(client.get::<TfState>(&id))?;
            let mut draft = TfStateDraft::from_record(&current);
            if let Some(account) = account {
                draft.account = account;
            }
            if let Some(bucket) = bucket {
                draft.bucket = bucket;
            }
            if let Some(path) = path {
                draft.path = path;
            }
            if let Some(tags) = tags {
                draft.tags = parse_tags(&tags);
            }
            rt.block_on(submit_tfstate(client, &draft, Some(&id)))?;
            println!("Updated {}", id);
        }
        TfStateCommands::Delete { id } => {
            let id = RecordId::new(id);
            rt.block_on(client.delete::<TfState>(&id))?;
            println!("Deleted {}", id);
        }
        TfStateCommands::Validate {
            id,
            wait,
            timeout_secs,
            json,
        } => {
            let id = RecordId::new(id);
            let timeout = Duration::from_secs(timeout_secs);
            match rt.block_on(validate(panel, &id, wait, timeout))? {
                Some(state) if json => print_json(&state, "tfstate")?,
                Some(state) => print_details(&state),
                None if json => {
                    print_json(&serde_json::json!({ "id": id, "requested": true }), "validate")?
                }
                None => println!("Validation requested for {}", id),
            }
        }
    }
    Ok(())
}

/// Triggers validation through the same state machine the dashboard uses and,
/// with `wait`, polls until the server clears the pending flag.
async fn validate(
    panel: &Panel,
    id: &RecordId,
    wait: bool,
    timeout: Duration,
) -> Result<Option<TfState>> {
    let client = &panel.client;
    let records = SharedRecords::<TfState>::new();
    let current = client.get::<TfState>(id).await?;
    records.lock().replace_all(vec![current]);

    trigger(&records, &TfStateValidation::new(client.clone()), id).await?;
    if !wait {
        return Ok(None);
    }

    let poller = Poller::new(client.clone(), records.clone()).start(panel.config.poll_interval());
    let settled = wait_until_settled(&records, id, timeout).await;
    poller.stop().await;
    let tracked = settled.with_context(|| {
        format!(
            "validation of {} did not finish within {}s",
            id,
            timeout.as_secs()
        )
    })?;
    Ok(Some(tracked.record))
}

fn summary_line(s: &TfState) -> String {
    let pending = if s.force_validation {
        " (validating)"
    } else {
        ""
    };
    format!(
        "{}  {:<16} {:<48} {}{}",
        s.id.short(),
        s.account,
        s.location(),
        s.compliance_result.label(),
        pending
    )
}

fn print_details(s: &TfState) {
    println!("id: {}", s.id);
    println!("account: {}", s.account);
    println!("location: {}", s.location());
    println!("tags: {}", join_tags(&s.tags));
    println!("last_update: {}", s.last_update_label());
    println!("validating: {}", s.force_validation);
    println!("compliance: {}", s.compliance_result.label());
    for line in s.compliance_result.detail_lines() {
        println!("  {}", line);
    }
}
