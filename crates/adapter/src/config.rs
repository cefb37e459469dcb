//! Level files.
//!
//! JSON with the same field names as [`LevelConfig`]; every field is optional
//! and falls back to the level defaults.
//!
//! ```json
//! {
//!   "width": 7, "height": 7, "max_moves": 25, "color_count": 5,
//!   "mask_rows": ["0111110", "1111111"],
//!   "goals": [{ "kind": "clear_gem", "color": 2, "amount": 15 }]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use match3_core::{Goal, LevelConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelFile {
    pub width: Option<u8>,
    pub height: Option<u8>,
    pub max_moves: Option<u32>,
    pub target_score: Option<u32>,
    pub points_per_gem: Option<u32>,
    pub color_count: Option<u8>,
    pub mask_rows: Vec<String>,
    pub cart_charge_max: Option<u32>,
    pub cart_charge_start: Option<u32>,
    pub goals: Vec<GoalSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalSpec {
    ClearGem { color: u8, amount: u32 },
    ClearBomb { amount: u32 },
    FillCart { amount: u32 },
}

impl From<GoalSpec> for Goal {
    fn from(g: GoalSpec) -> Self {
        match g {
            GoalSpec::ClearGem { color, amount } => Goal::ClearGem { color, amount },
            GoalSpec::ClearBomb { amount } => Goal::ClearBomb { amount },
            GoalSpec::FillCart { amount } => Goal::FillCart { amount },
        }
    }
}

impl LevelFile {
    pub fn into_config(self) -> LevelConfig {
        let d = LevelConfig::default();
        LevelConfig {
            width: self.width.unwrap_or(d.width),
            height: self.height.unwrap_or(d.height),
            max_moves: self.max_moves.unwrap_or(d.max_moves),
            target_score: self.target_score.unwrap_or(d.target_score),
            points_per_gem: self.points_per_gem.unwrap_or(d.points_per_gem),
            color_count: self.color_count.unwrap_or(d.color_count),
            mask_rows: self.mask_rows,
            cart_charge_max: self.cart_charge_max.unwrap_or(d.cart_charge_max),
            cart_charge_start: self.cart_charge_start.unwrap_or(d.cart_charge_start),
            goals: self.goals.into_iter().map(Goal::from).collect(),
        }
    }
}

/// Parse and validate a level from JSON text.
pub fn parse_level(json: &str) -> anyhow::Result<LevelConfig> {
    let file: LevelFile = serde_json::from_str(json).context("malformed level file")?;
    let config = file.into_config();
    config.validate().context("invalid level")?;
    Ok(config)
}

/// Load and validate a level file.
pub fn load_level(path: impl AsRef<Path>) -> anyhow::Result<LevelConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    parse_level(&text).with_context(|| format!("in level {}", path.display()))
}
