use tfmon::session::AuthState;

use super::*;

pub(super) fn handle_config_command(panel: &Panel, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => {
            let cfg = &panel.config;
            let logged_in = panel.session.auth_state() == AuthState::Authenticated;
            if json {
                print_json(
                    &serde_json::json!({
                        "config_dir": panel.store.root(),
                        "base_url": cfg.base_url,
                        "poll_interval_ms": cfg.poll_interval_ms,
                        "request_timeout_secs": cfg.request_timeout_secs,
                        "logged_in": logged_in,
                    }),
                    "config",
                )?;
            } else {
                println!("config_dir: {}", panel.store.root().display());
                println!("base_url: {}", cfg.base_url);
                println!("poll_interval_ms: {}", cfg.poll_interval_ms);
                println!("request_timeout_secs: {}", cfg.request_timeout_secs);
                println!("logged_in: {}", logged_in);
            }
        }
        ConfigCommands::Set {
            base_url,
            poll_interval_ms,
            request_timeout_secs,
        } => {
            if base_url.is_none() && poll_interval_ms.is_none() && request_timeout_secs.is_none() {
                anyhow::bail!(
                    "nothing to change (use --base-url, --poll-interval-ms or --request-timeout-secs)"
                );
            }
            // Re-read so a process-local `--url` override is not persisted.
            let mut cfg = panel.store.read_config()?;
            if let Some(url) = base_url {
                cfg.base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(ms) = poll_interval_ms {
                cfg.poll_interval_ms = ms;
            }
            if let Some(secs) = request_timeout_secs {
                cfg.request_timeout_secs = secs;
            }
            panel.store.write_config(&cfg)?;
            println!("Updated {}", panel.store.config_path().display());
        }
    }
    Ok(())
}
