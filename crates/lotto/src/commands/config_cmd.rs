//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

const MASK: &str = "********";

/// Copy of `cfg` safe to print.
fn masked(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
    cfg
}

fn show_yaml(cfg: &Config) -> String {
    serde_yaml::to_string(cfg).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

fn profile_names(cfg: &Config) -> Vec<String> {
    let default = cfg.default_profile.as_deref();
    cfg.profiles
        .keys()
        .map(|name| {
            if Some(name.as_str()) == default {
                format!("{name} *")
            } else {
                name.clone()
            }
        })
        .collect()
}

fn prompt_password(profile_name: &str) -> Result<String, CliError> {
    let password = rpassword::prompt_password(format!("Password for '{profile_name}': "))
        .map_err(util::prompt_err)?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(password)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            util::require_terminal("config init")?;
            let config_path = config::config_path();
            eprintln!("lotto configuration wizard");
            eprintln!("  Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(util::prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default("http://localhost:3000/api/v1/".into())
                .interact_text()
                .map_err(util::prompt_err)?;

            let phone: String = Input::new()
                .with_prompt("Agent phone")
                .interact_text()
                .map_err(util::prompt_err)?;

            let password = prompt_password(&profile_name)?;

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
                "Don't store (use LOTTO_PASSWORD)",
            ];
            let store = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(util::prompt_err)?;

            let plaintext = match store {
                0 => {
                    config::store_keyring_password(&profile_name, &password)?;
                    eprintln!("  Password stored in system keyring");
                    None
                }
                1 => Some(password),
                _ => None,
            };

            let profile = Profile {
                api_url,
                phone,
                password: plaintext,
                ..Profile::default()
            };
            // Validate before writing anything.
            lotto_config::profile_to_platform_config(
                &profile,
                SecretString::from(String::new()),
                cfg.defaults.timeout,
            )?;

            cfg.profiles.insert(profile_name.clone(), profile);
            let has_default = cfg
                .default_profile
                .as_ref()
                .is_some_and(|d| cfg.profiles.contains_key(d));
            if !has_default {
                cfg.default_profile = Some(profile_name.clone());
            }
            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: lotto auth login -p {profile_name}");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = masked(&config::load_config_or_default());
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => show_yaml(&cfg),
                _ => output::render_single(&global.output, &cfg, show_yaml, |_| String::new()),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                if !global.quiet {
                    eprintln!(
                        "No profiles configured. Run `lotto config init` to create one."
                    );
                }
                return Ok(());
            }
            output::print_output(&profile_names(&cfg).join("\n"), global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }
            util::require_terminal("config set-password")?;
            let password = SecretString::from(prompt_password(&profile_name)?);
            config::store_keyring_password(&profile_name, password.expose_secret())?;
            if !global.quiet {
                eprintln!("Password for '{profile_name}' stored in system keyring");
            }
            Ok(())
        }
    }
}
