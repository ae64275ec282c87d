use std::io::BufRead;

use serde::de::IgnoredAny;
use tracing::warn;

use super::*;

pub(super) fn handle_login_command(rt: &Runtime, panel: &Panel, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(p) => p,
        None => read_password()?,
    };
    rt.block_on(panel.gateway().login(&args.username, &password))?;
    println!("Logged in to {} as {}", panel.config.base_url, args.username);
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Revokes the token server-side, then forgets it locally either way.
pub(super) fn handle_logout_command(rt: &Runtime, panel: &Panel) -> Result<()> {
    if panel.session.active().is_none() {
        println!("Not logged in");
        return Ok(());
    }
    if let Err(err) = rt.block_on(panel.gateway().delete::<IgnoredAny>("/session"))
        && !err.is_session_reset()
    {
        warn!(error = %err, "revoke session token");
    }
    panel.session.logout()?;
    println!("Logged out");
    Ok(())
}
