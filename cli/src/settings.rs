use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use memorito_session::{EngineConfig, JsonFileScoreService, LeaderboardId, SubmitPolicy};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(version, about = "Flip tiles, find pairs, beat your best", long_about = None)]
pub struct Args {
    /// What log level to use
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// Number of pairs on the board
    #[arg(short, long)]
    pub pairs: Option<u8>,

    /// How long a mismatched pair stays face up, in milliseconds
    #[arg(long, value_name = "MS")]
    pub grace_ms: Option<u64>,

    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Leaderboard to submit to and load the personal best from
    #[arg(long)]
    pub leaderboard: Option<String>,

    /// Which wins get submitted: "always" or "improvements-only"
    #[arg(long)]
    pub submit_policy: Option<SubmitPolicy>,

    /// Play signed out, nothing is recorded
    #[arg(long)]
    pub offline: bool,

    /// Score file, defaults to the user config directory
    #[arg(long, value_name = "FILE")]
    pub scores: Option<PathBuf>,

    /// TOML file with default settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print events and snapshots as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Settings file, same keys as the long flags.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Settings {
    pub pairs: Option<u8>,
    pub grace_ms: Option<u64>,
    pub seed: Option<u64>,
    pub leaderboard: Option<String>,
    pub submit_policy: Option<SubmitPolicy>,
    pub offline: Option<bool>,
    pub scores: Option<PathBuf>,
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

impl Args {
    pub fn settings(&self) -> anyhow::Result<Settings> {
        match &self.config {
            Some(path) => Settings::load(path),
            None => Ok(Settings::default()),
        }
    }

    /// Flags override the settings file, which overrides the defaults.
    pub fn engine_config(&self, settings: &Settings) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            pairs: self.pairs.or(settings.pairs).unwrap_or(defaults.pairs),
            grace_period: self
                .grace_ms
                .or(settings.grace_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.grace_period),
            leaderboard: self
                .leaderboard
                .as_ref()
                .or(settings.leaderboard.as_ref())
                .map(LeaderboardId::new)
                .unwrap_or(defaults.leaderboard),
            submit_policy: self.submit_policy.or(settings.submit_policy).unwrap_or(defaults.submit_policy),
            seed: self.seed.or(settings.seed),
        }
    }

    pub fn offline(&self, settings: &Settings) -> bool {
        self.offline || settings.offline.unwrap_or(false)
    }

    pub fn scores_path(&self, settings: &Settings) -> PathBuf {
        self.scores.clone().or_else(|| settings.scores.clone()).unwrap_or_else(JsonFileScoreService::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("memorito").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let args = parse(&[]);

        let config = args.engine_config(&Settings::default());

        assert_eq!(config, EngineConfig::default());
        assert!(!args.offline(&Settings::default()));
        assert!(!args.json);
    }

    #[test]
    fn flags_win_over_the_settings_file() {
        let settings: Settings = toml::from_str(
            r#"
            pairs = 6
            grace-ms = 400
            leaderboard = "Weekly"
            submit-policy = "always"
            offline = true
            "#,
        )
        .unwrap();
        let args = parse(&["--pairs", "8", "--seed", "42", "--submit-policy", "improvements-only"]);

        let config = args.engine_config(&settings);

        assert_eq!(config.pairs, 8);
        assert_eq!(config.grace_period, Duration::from_millis(400));
        assert_eq!(config.leaderboard.as_str(), "Weekly");
        assert_eq!(config.submit_policy, SubmitPolicy::ImprovementsOnly);
        assert_eq!(config.seed, Some(42));
        assert!(args.offline(&settings));
    }

    #[test]
    fn unknown_settings_are_rejected() {
        assert!(toml::from_str::<Settings>("colour = \"red\"").is_err());
    }

    #[test]
    fn bad_submit_policy_flag_is_a_usage_error() {
        let parsed = Args::try_parse_from(["memorito", "--submit-policy", "sometimes"]);

        assert!(parsed.is_err());
    }

    #[test]
    fn scores_flag_overrides_file() {
        let settings = Settings { scores: Some("from-file.json".into()), ..Default::default() };

        assert_eq!(parse(&["--scores", "flag.json"]).scores_path(&settings), PathBuf::from("flag.json"));
        assert_eq!(parse(&[]).scores_path(&settings), PathBuf::from("from-file.json"));
    }
}
