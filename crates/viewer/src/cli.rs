use std::path::PathBuf;

use replay_engine::ViewerConfig;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CliCommand {
    Help,
    Run(CliOptions),
}

/// Command-line overrides. Every field left `None` keeps the config value.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CliOptions {
    pub(crate) replay_path: PathBuf,
    pub(crate) scale: Option<u32>,
    pub(crate) speed: Option<f64>,
    pub(crate) max_render_fps: Option<u32>,
    pub(crate) show_grid: bool,
    pub(crate) hide_hud: bool,
    pub(crate) asset_dir: Option<PathBuf>,
}

impl CliOptions {
    pub(crate) fn apply(&self, config: &mut ViewerConfig) {
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(fps) = self.max_render_fps {
            config.max_render_fps = Some(fps);
        }
        if self.show_grid {
            config.show_grid = true;
        }
        if self.hide_hud {
            config.show_hud = false;
        }
        if let Some(dir) = &self.asset_dir {
            config.asset_dir = Some(dir.clone());
        }
    }
}

pub(crate) fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    if args.is_empty() {
        return Err(usage_text());
    }
    if args[0] == "-h" || args[0] == "--help" {
        return Ok(CliCommand::Help);
    }

    let mut options = CliOptions::default();
    let mut replay_path: Option<PathBuf> = None;
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--scale" => {
                let value = flag_value(args, index, "--scale")?;
                let scale = value
                    .parse::<u32>()
                    .map_err(|_| format!("invalid --scale value '{value}' (expected u32)"))?;
                if scale == 0 {
                    return Err("--scale must be at least 1".to_string());
                }
                options.scale = Some(scale);
                index += 2;
            }
            "--speed" => {
                let value = flag_value(args, index, "--speed")?;
                let speed = value
                    .parse::<f64>()
                    .ok()
                    .filter(|speed| speed.is_finite() && *speed > 0.0)
                    .ok_or_else(|| {
                        format!("invalid --speed value '{value}' (expected positive number)")
                    })?;
                options.speed = Some(speed);
                index += 2;
            }
            "--fps" => {
                let value = flag_value(args, index, "--fps")?;
                options.max_render_fps = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| format!("invalid --fps value '{value}' (expected u32)"))?,
                );
                index += 2;
            }
            "--assets" => {
                let value = flag_value(args, index, "--assets")?;
                options.asset_dir = Some(PathBuf::from(value));
                index += 2;
            }
            "--grid" => {
                options.show_grid = true;
                index += 1;
            }
            "--no-hud" => {
                options.hide_hud = true;
                index += 1;
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown argument '{other}'"));
            }
            path => {
                if replay_path.is_some() {
                    return Err(format!("unexpected extra argument '{path}'"));
                }
                replay_path = Some(PathBuf::from(path));
                index += 1;
            }
        }
    }

    options.replay_path = replay_path.ok_or_else(|| "missing replay file path".to_string())?;
    Ok(CliCommand::Run(options))
}

fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str, String> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub(crate) fn usage_text() -> String {
    [
        "viewer - Ants replay visualizer",
        "",
        "Usage:",
        "  viewer <replay.json> [--scale <u32>] [--speed <turns/s>] [--fps <u32>] [--grid] [--no-hud] [--assets <dir>]",
        "",
        "Defaults:",
        "  --scale 10",
        "  --speed 2",
        "  --fps 60 (0 disables the cap)",
        "",
        "Keys: Esc quit, Space pause, +/- speed, G grid, F3 HUD",
    ]
    .join("\n")
}
