//! Per-tick debug vectors published for an external visualizer.

use glam::Vec3;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DebugArrow {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Arrow with the unscaled magnitude it was drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DebugVector {
    pub arrow: DebugArrow,
    pub magnitude: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkierTelemetry {
    pub grounded: bool,
    pub ground_normal: DebugArrow,
    pub forward_velocity: DebugArrow,
    /// Wrapped yaw change over the tick, rad/s.
    pub yaw_rate: f32,
    pub drive_force: Option<DebugArrow>,
    pub net_force: DebugVector,
    pub net_torque: DebugVector,
}

pub trait TelemetrySink {
    fn publish(&mut self, frame: &SkierTelemetry);
}

/// Keeps the most recent frame.
#[derive(Debug, Clone, Default)]
pub struct LastFrame {
    pub frame: Option<SkierTelemetry>,
    pub count: usize,
}

impl TelemetrySink for LastFrame {
    fn publish(&mut self, frame: &SkierTelemetry) {
        self.frame = Some(*frame);
        self.count += 1;
    }
}
