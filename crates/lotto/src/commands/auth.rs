//! Auth command handlers.

use tabled::Tabled;

use lotto_core::{DeviceSession, Platform, SessionUser};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "")]
    current: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    user_agent: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Last used")]
    last_used: String,
}

fn device_row(d: &DeviceSession, current: Option<&str>) -> DeviceRow {
    DeviceRow {
        current: if current == Some(d.id.as_str()) { "*".into() } else { String::new() },
        id: d.id.clone(),
        user_agent: d.user_agent.clone().unwrap_or_default(),
        ip: d.ip.clone().unwrap_or_default(),
        last_used: d.last_used_at.clone().unwrap_or_default(),
    }
}

fn user_detail(u: &SessionUser) -> String {
    output::detail_lines(&[
        ("Name", u.display_name()),
        ("Phone", u.phone.clone()),
        ("Role", u.role.clone()),
        ("Approved", output::status_text(if u.is_approved { "yes" } else { "no" }, u.is_approved)),
        (
            "Commission",
            u.commission_pct.map(|c| format!("{c}%")).unwrap_or_default(),
        ),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    mut platform: Platform,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login => {
            let user = platform
                .session()
                .user()
                .ok_or_else(|| CliError::Internal("signed in without a user".into()))?;
            let out = output::render_single(&global.output, user, user_detail, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Logout => {
            platform.disconnect().await?;
            if !global.quiet {
                eprintln!("Signed out");
            }
            Ok(())
        }

        AuthCommand::Devices => {
            let devices = platform.devices().await?;
            let current = platform.session().device_id();
            let out = output::render_list(
                &global.output,
                &devices,
                |d| device_row(d, current),
                |d| d.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::RevokeDevice { device } => {
            if !util::confirm(&format!("Sign out device session '{device}'?"), global.yes)? {
                return Ok(());
            }
            platform.revoke_device(&device).await?;
            if !global.quiet {
                eprintln!("Device session revoked");
            }
            Ok(())
        }
    }
}
