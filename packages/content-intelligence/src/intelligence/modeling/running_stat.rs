use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AveragingStrategy {
    /// Unweighted running mean: the n-th sample is blended with weight 1/n.
    #[default]
    CumulativeMean,
    /// Exponential moving average. The first sample seeds the value.
    Exponential { alpha: f64 },
}

impl AveragingStrategy {
    /// Accepts `mean` or `ema:<alpha>` with alpha in (0, 1].
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s == "mean" {
            return Some(Self::CumulativeMean);
        }
        let alpha = s.strip_prefix("ema:")?.parse::<f64>().ok()?;
        if alpha > 0.0 && alpha <= 1.0 {
            Some(Self::Exponential { alpha })
        } else {
            None
        }
    }

    fn weight(&self, prior_count: u32) -> f64 {
        match self {
            Self::CumulativeMean => 1.0 / (prior_count as f64 + 1.0),
            Self::Exponential { alpha } => {
                if prior_count == 0 {
                    1.0
                } else {
                    *alpha
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunningStat {
    value: f64,
    count: u32,
    strategy: AveragingStrategy,
}

impl RunningStat {
    pub fn new(strategy: AveragingStrategy) -> Self {
        Self {
            value: 0.0,
            count: 0,
            strategy,
        }
    }

    /// `new = old * (1 - w) + sample * w`, with `w` chosen by the strategy.
    pub fn update(&mut self, sample: f64) -> f64 {
        let weight = self.strategy.weight(self.count);
        self.value = self.value * (1.0 - weight) + sample * weight;
        self.count = self.count.saturating_add(1);
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
