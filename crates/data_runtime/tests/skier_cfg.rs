use data_runtime::configs::skier::{LocomotionKind, load_default};

#[test]
fn env_overrides_tuning_and_model() {
    unsafe {
        std::env::set_var("SKIER_FORWARD_FORCE", "12.5");
        std::env::set_var("SKIER_STEER_RATE", "3.0");
        std::env::set_var("SKIER_LOCOMOTION", "torque_upright");
    }
    let cfg = load_default().expect("load");
    assert_eq!(cfg.forward_force, 12.5);
    assert_eq!(cfg.steer_yaw_rate, 3.0);
    assert_eq!(cfg.locomotion, LocomotionKind::TorqueUpright);
    // Untouched keys still come from the shipped file / defaults
    assert_eq!(cfg.probe_count, 6);
}
