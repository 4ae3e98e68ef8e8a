use crate::{
    constants::{DEFAULT_SEARCH_WORKERS, DEFAULT_TIE_SWAP_PROBABILITY, MAX_SEARCH_WORKERS},
    error::{Result, SeatingError},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::{Display, EnumString};

/// How the offline demand is seated
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    #[default]
    Greedy,
    /// Hand the whole problem to an exact solver
    Exact,
    /// Greedy first, exact solver only when greedy leaves people unseated
    GreedyExactFallback,
}

/// How the online cost matrix is refreshed after each placement
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UpdateMode {
    /// Only the window around the new group
    #[default]
    Incremental,
    /// The whole grid
    Full,
}

/// メイン設定構造体
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub online: OnlineConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// 乱数シード（未指定なら実行ごとに生成してログに出す）
    pub seed: Option<u64>,
    /// 同点候補に乗り換える確率
    pub tie_swap_probability: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            seed: None,
            tie_swap_probability: DEFAULT_TIE_SWAP_PROBABILITY,
        }
    }
}

impl SolverConfig {
    /// The configured seed, or a fresh random one
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OnlineConfig {
    /// 探索スレッド数
    pub workers: usize,
    pub update: UpdateMode,
}

impl Default for OnlineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_SEARCH_WORKERS,
            update: UpdateMode::default(),
        }
    }
}

impl Config {
    /// 設定ファイルから読み込み
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SeatingError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Like [`Config::load_from_file`], but a missing file gives the defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::warn!(
                "Config file not found: {}, using default settings",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<()> {
        let p = self.solver.tie_swap_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(SeatingError::Config(format!(
                "solver.tie_swap_probability must be between 0 and 1, got {p}"
            )));
        }

        let workers = self.online.workers;
        if !(1..=MAX_SEARCH_WORKERS).contains(&workers) {
            return Err(SeatingError::Config(format!(
                "online.workers must be between 1 and {MAX_SEARCH_WORKERS}, got {workers}"
            )));
        }

        Ok(())
    }
}
