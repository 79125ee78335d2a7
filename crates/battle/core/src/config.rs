use crate::env::MitigationModel;

/// Engine tunables. Every field has a default so partial config files work.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Fixed simulation step in milliseconds.
    pub tick_ms: u32,
    /// Ticks a participant spends in the dying window before removal.
    pub dying_ticks: u32,
    /// Ticks a flee decision is kept before the AI re-evaluates it.
    pub ai_decision_cooldown_ticks: u32,
    /// Ticks a ranged participant keeps moving to its reposition point.
    pub reposition_commit_ticks: u32,
    /// A ranged participant kites once its target is closer than
    /// `attack_range * kite_distance_ratio`.
    pub kite_distance_ratio: f32,
    /// Content errors abort the tick instead of degrading to a no-op.
    pub strict_content: bool,
    pub mitigation: MitigationModel,
}

impl EngineConfig {
    pub const DEFAULT_TICK_MS: u32 = 100;
    pub const DEFAULT_DYING_TICKS: u32 = 5;
    pub const DEFAULT_AI_DECISION_COOLDOWN_TICKS: u32 = 5;
    pub const DEFAULT_REPOSITION_COMMIT_TICKS: u32 = 10;
    pub const DEFAULT_KITE_DISTANCE_RATIO: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            tick_ms: Self::DEFAULT_TICK_MS,
            dying_ticks: Self::DEFAULT_DYING_TICKS,
            ai_decision_cooldown_ticks: Self::DEFAULT_AI_DECISION_COOLDOWN_TICKS,
            reposition_commit_ticks: Self::DEFAULT_REPOSITION_COMMIT_TICKS,
            kite_distance_ratio: Self::DEFAULT_KITE_DISTANCE_RATIO,
            strict_content: cfg!(debug_assertions),
            mitigation: MitigationModel::Identity,
        }
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick_ms as f32 / 1000.0
    }

    /// Whole ticks needed to cover `ms`, rounded up.
    pub fn ticks_for_ms(&self, ms: u32) -> u32 {
        if self.tick_ms == 0 {
            return 0;
        }
        ms.div_ceil(self.tick_ms)
    }

    pub fn with_strict_content(mut self, strict: bool) -> Self {
        self.strict_content = strict;
        self
    }

    pub fn with_dying_ticks(mut self, ticks: u32) -> Self {
        self.dying_ticks = ticks;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_round_up() {
        let config = EngineConfig::new();
        assert_eq!(config.ticks_for_ms(1000), 10);
        assert_eq!(config.ticks_for_ms(1050), 11);
        assert_eq!(config.ticks_for_ms(0), 0);
    }
}
