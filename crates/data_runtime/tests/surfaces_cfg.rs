use data_runtime::configs::surfaces::{BoundsPolicy, load_default};

#[test]
fn shipped_surfaces_keep_policy_asymmetry() {
    unsafe {
        std::env::set_var("TRAIL_RESOLUTION", "256");
    }
    let cfg = load_default().expect("load");
    assert_eq!(cfg.trail.resolution, 256);
    assert_eq!(cfg.trail.policy, BoundsPolicy::Reject);
    assert_eq!(cfg.deformation.policy, BoundsPolicy::Wrap);
    assert!(cfg.deformation.size > 0.0);
}
