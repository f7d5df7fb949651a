use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use replay_engine::ViewerConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub(crate) const SPEED_ENV_VAR: &str = "ANTS_REPLAY_SPEED";
pub(crate) const SCALE_ENV_VAR: &str = "ANTS_REPLAY_SCALE";
pub(crate) const ASSETS_ENV_VAR: &str = "ANTS_REPLAY_ASSETS";

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Default config with env-var overrides applied.
pub(crate) fn config_from_env() -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.speed = resolve_env_value(SPEED_ENV_VAR, env::var(SPEED_ENV_VAR), config.speed, |speed| {
        speed.is_finite() && *speed > 0.0
    });
    config.scale = resolve_env_value(SCALE_ENV_VAR, env::var(SCALE_ENV_VAR), config.scale, |scale| {
        *scale > 0
    });
    config.asset_dir = match env::var(ASSETS_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Some(PathBuf::from(value)),
        Ok(_) | Err(env::VarError::NotPresent) => config.asset_dir,
        Err(err) => {
            warn!(
                env_var = ASSETS_ENV_VAR,
                error = %err,
                "unable to read assets env var; falling back to config"
            );
            config.asset_dir
        }
    };
    config
}

fn resolve_env_value<T, F>(
    env_var: &'static str,
    raw: Result<String, env::VarError>,
    fallback: T,
    is_valid: F,
) -> T
where
    T: FromStr,
    F: Fn(&T) -> bool,
{
    match raw {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(parsed) if is_valid(&parsed) => parsed,
            _ => {
                warn!(
                    env_var,
                    value = value.as_str(),
                    "invalid env var value; falling back to config"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var,
                error = %err,
                "unable to read env var; falling back to config"
            );
            fallback
        }
    }
}
