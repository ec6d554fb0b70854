//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::cli::Invocation;
use crate::config::{Backend, Config, ConfigManager};
use crate::error::{SatchelError, SatchelResult};
use crate::session::NestingPolicy;
use crate::ui::{self, UiContext};

const VALID_KEYS: &[&str] = &[
    "general.verbose",
    "general.log_format",
    "general.audit_log",
    "session.max_lifetime_minutes",
    "session.nesting",
    "session.backend",
    "session.auto_gc",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, inv: &Invocation) -> SatchelResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(&inv.config)?,
        Some(ConfigAction::Path) => println!("{}", inv.manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(&inv.manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            set_value(&inv.manager, &inv.config, &key, &value).await?
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> SatchelResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> SatchelResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> SatchelResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    if let Err(e) = apply(&mut config, key, value) {
        if matches!(e, SatchelError::User(_)) && !VALID_KEYS.contains(&key) {
            ui::step_error_detail(&ctx, "Unknown config key", key);
            ui::remark(&ctx, "Valid keys:");
            for key in VALID_KEYS {
                eprintln!("  {}", key);
            }
        }
        return Err(e);
    }

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one dotted `key = value` assignment to `config`
pub fn apply(config: &mut Config, key: &str, value: &str) -> SatchelResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => {
            config.general.log_format = match value {
                "text" | "json" => value.to_string(),
                _ => {
                    return Err(SatchelError::invalid_argument(format!(
                        "log_format must be text or json, got '{}'",
                        value
                    )))
                }
            }
        }
        ["general", "audit_log"] => config.general.audit_log = parse_bool(value)?,

        ["session", "max_lifetime_minutes"] => {
            let minutes = parse_u32(value)?;
            if minutes == 0 {
                return Err(SatchelError::invalid_argument(
                    "max_lifetime_minutes must be greater than zero",
                ));
            }
            config.session.max_lifetime_minutes = minutes;
        }
        ["session", "nesting"] => {
            config.session.nesting = match value {
                "legacy" => NestingPolicy::Legacy,
                "uniform" => NestingPolicy::Uniform,
                _ => {
                    return Err(SatchelError::invalid_argument(format!(
                        "nesting must be legacy or uniform, got '{}'",
                        value
                    )))
                }
            }
        }
        ["session", "backend"] => {
            config.session.backend = match value {
                "file" => Backend::File,
                "memory" => {
                    return Err(SatchelError::invalid_argument(
                        "the memory backend loses every session when the command exits; \
                         it is only available to library callers",
                    ))
                }
                _ => {
                    return Err(SatchelError::invalid_argument(format!(
                        "backend must be file, got '{}'",
                        value
                    )))
                }
            }
        }
        ["session", "auto_gc"] => config.session.auto_gc = parse_bool(value)?,

        _ => return Err(SatchelError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_bool(value: &str) -> SatchelResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(SatchelError::invalid_argument(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u32(value: &str) -> SatchelResult<u32> {
    value
        .parse()
        .map_err(|_| SatchelError::invalid_argument(format!("Invalid number: {}", value)))
}
