//! Read-only input snapshot handed to the controller each tick.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkierKeys {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub boost: bool,
}

/// Keyboard state plus external (touch/gamepad) input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub keys: SkierKeys,
    /// Continuous steer in [-1, 1]; positive turns left.
    pub steer_axis: f32,
    pub jump: bool,
    pub boost: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedInput {
    pub steer: f32,
    pub jump: bool,
    pub boost: bool,
}

impl InputSnapshot {
    #[must_use]
    pub fn steering(steer_axis: f32) -> Self {
        Self {
            steer_axis,
            ..Self::default()
        }
    }

    /// Sums key and axis steering, clamps to [-1, 1], and ORs the buttons.
    #[must_use]
    pub fn resolve(&self) -> ResolvedInput {
        let mut key_steer = 0.0;
        if self.keys.left {
            key_steer += 1.0;
        }
        if self.keys.right {
            key_steer -= 1.0;
        }
        let axis = if self.steer_axis.is_finite() {
            self.steer_axis
        } else {
            log::debug!("non-finite steer axis {} treated as 0", self.steer_axis);
            0.0
        };
        ResolvedInput {
            steer: (key_steer + axis).clamp(-1.0, 1.0),
            jump: self.keys.jump || self.jump,
            boost: self.keys.boost || self.boost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_axis_sum_then_clamp() {
        let mut snap = InputSnapshot::steering(0.6);
        snap.keys.left = true;
        assert_eq!(snap.resolve().steer, 1.0);
        snap.keys.left = false;
        snap.keys.right = true;
        assert!((snap.resolve().steer + 0.4).abs() < 1e-6);
    }

    #[test]
    fn nan_axis_is_neutral() {
        let r = InputSnapshot::steering(f32::NAN).resolve();
        assert_eq!(r.steer, 0.0);
    }

    #[test]
    fn buttons_or_together() {
        let mut snap = InputSnapshot::default();
        snap.keys.boost = true;
        snap.jump = true;
        let r = snap.resolve();
        assert!(r.jump && r.boost);
    }
}
