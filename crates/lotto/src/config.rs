//! CLI configuration: thin wrapper around `lotto_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --login-phone, --timeout).

use secrecy::SecretString;

use lotto_core::PlatformConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use lotto_config::{
    Config, Profile, config_path, load_config_or_default, resolve_password, save_config,
    store_keyring_password,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build the `PlatformConfig` for this invocation.
///
/// With a matching profile, flags override its fields. Without one,
/// `--api-url` and `--login-phone` plus `LOTTO_PASSWORD` are enough.
pub fn resolve_platform_config(
    global: &GlobalOpts,
) -> Result<(String, PlatformConfig), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.api_url.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(&cfg),
                name: profile_name,
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(ref phone) = global.login_phone {
        profile.phone.clone_from(phone);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let password: SecretString = resolve_password(&profile, &profile_name)?;
    let config =
        lotto_config::profile_to_platform_config(&profile, password, cfg.defaults.timeout)?;
    tracing::debug!(profile = %profile_name, url = %config.url, "resolved platform config");
    Ok((profile_name, config))
}
