//! Profile command handler.

use lotto_core::{Platform, UserInfo};

use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand};
use crate::error::CliError;
use crate::output;

fn profile_detail(u: &UserInfo) -> String {
    let mut lines = vec![
        ("ID", u.id.clone()),
        ("Name", format!("{} {}", u.first_name, u.last_name).trim().to_owned()),
        ("Phone", u.phone.clone()),
        ("Role", u.role.clone()),
        (
            "Approved",
            output::status_text(if u.is_approved { "yes" } else { "no" }, u.is_approved),
        ),
        (
            "Phone verified",
            output::status_text(if u.is_phone_verified { "yes" } else { "no" }, u.is_phone_verified),
        ),
    ];
    if let Some(ref email) = u.email {
        lines.push(("Email", email.clone()));
    }
    if let Some(pct) = u.commission_pct {
        lines.push(("Commission", format!("{pct}%")));
    }
    if let Some(ref created) = u.created_at {
        lines.push(("Member since", created.clone()));
    }
    output::detail_lines(&lines)
}

pub async fn handle(
    platform: &Platform,
    args: ProfileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Show => {
            let user = platform.profile().await?;
            let out = output::render_single(&global.output, &user, profile_detail, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
