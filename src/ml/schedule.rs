// ============================================================
// Layer 5: Learning-Rate Schedule
// ============================================================
// Exponential decay that only advances when the training
// loss gets worse:
//
//   lr(n) = initial · gammaⁿ
//
// where n counts the epochs whose loss exceeded the loss of
// the epoch before. The first epoch compares against +∞ and
// never decays.

/// `initial · gamma^steps`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecay {
    initial: f64,
    gamma:   f64,
    steps:   u32,
}

impl ExponentialDecay {
    pub fn new(initial: f64, gamma: f64) -> Self {
        Self { initial, gamma, steps: 0 }
    }

    pub fn learning_rate(&self) -> f64 {
        self.initial * self.gamma.powi(self.steps as i32)
    }

    pub fn step(&mut self) {
        self.steps += 1;
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }
}

/// Steps an [`ExponentialDecay`] whenever the observed loss rises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossIncreaseDecay {
    schedule:  ExponentialDecay,
    last_loss: f64,
}

impl LossIncreaseDecay {
    pub fn new(schedule: ExponentialDecay) -> Self {
        Self { schedule, last_loss: f64::INFINITY }
    }

    pub fn learning_rate(&self) -> f64 {
        self.schedule.learning_rate()
    }

    pub fn decays(&self) -> u32 {
        self.schedule.steps()
    }

    /// Record the loss of a finished epoch. Returns true if the
    /// learning rate was decayed.
    pub fn observe(&mut self, loss: f64) -> bool {
        let decayed = loss > self.last_loss;
        if decayed {
            self.schedule.step();
        }
        self.last_loss = loss;
        decayed
    }
}
