use surface_field::{SurfaceField, SurfaceParams};

fn trail_10() -> SurfaceField {
    SurfaceField::new(SurfaceParams {
        size: 100.0,
        resolution: 10,
        ..SurfaceParams::trail()
    })
    .expect("field")
}

fn fill(f: &mut SurfaceField, v: f32) {
    for y in 0..f.resolution() {
        for x in 0..f.resolution() {
            f.set_texel(x, y, v);
        }
    }
}

#[test]
fn same_point_twice_is_a_no_op() {
    let mut f = trail_10();
    f.update_origin(3.0, 4.0);
    assert!(f.stamp(3.0, 4.0));
    f.update_origin(7.0, 4.0);
    let before = f.texels().to_vec();
    f.update_origin(7.0, 4.0);
    assert_eq!(f.texels(), &before[..]);
}

#[test]
fn teleport_clears_everything() {
    let mut f = trail_10();
    f.update_origin(0.0, 0.0);
    assert!(f.stamp(2.0, 2.0));
    assert!(f.sample_world(2.0, 2.0).expect("in bounds") > 0.0);
    f.update_origin(250.0, 0.0);
    f.update_origin(0.0, 0.0);
    assert!(f.texels().iter().all(|&v| v == f.baseline()));
    assert_eq!(f.sample_world(2.0, 2.0), Some(0.0));
}

#[test]
fn plus_x_move_reclaims_right_column_only() {
    let mut f = trail_10();
    f.update_origin(0.0, 0.0);
    fill(&mut f, 1.0);
    f.update_origin(10.0, 0.0);
    for y in 0..10 {
        assert_eq!(f.texel(9, y), 0.0, "column 9 row {y} should be reclaimed");
        for x in 0..9 {
            assert_eq!(f.texel(x, y), 1.0, "interior ({x},{y}) should survive");
        }
    }
}

#[test]
fn minus_x_move_reclaims_left_columns() {
    let mut f = trail_10();
    f.update_origin(0.0, 0.0);
    fill(&mut f, 1.0);
    f.update_origin(-20.0, 0.0);
    for y in 0..10 {
        assert_eq!(f.texel(0, y), 0.0);
        assert_eq!(f.texel(1, y), 0.0);
        assert_eq!(f.texel(2, y), 1.0);
    }
}

#[test]
fn plus_z_move_reclaims_top_row() {
    let mut f = trail_10();
    f.update_origin(0.0, 0.0);
    fill(&mut f, 1.0);
    f.update_origin(0.0, 10.0);
    for x in 0..10 {
        assert_eq!(f.texel(x, 0), 0.0);
        assert_eq!(f.texel(x, 1), 1.0);
        assert_eq!(f.texel(x, 9), 1.0);
    }
}

#[test]
fn fractional_move_reclaims_ceil_of_offset() {
    let mut f = trail_10();
    f.update_origin(0.0, 0.0);
    fill(&mut f, 1.0);
    // 0.25 texel to the left: one full column is exposed
    f.update_origin(2.5, 0.0);
    for y in 0..10 {
        assert_eq!(f.texel(9, y), 0.0);
        assert!((f.texel(8, y) - 1.0).abs() < 1e-6);
    }
}

#[test]
fn stamp_moves_with_the_world() {
    let mut f = trail_10();
    f.update_origin(0.0, 0.0);
    assert!(f.stamp(5.0, 5.0));
    let before = f.sample_world(5.0, 5.0).expect("in bounds");
    // Move by whole texels so the content shifts exactly.
    f.update_origin(20.0, -10.0);
    let after = f.sample_world(5.0, 5.0).expect("in bounds");
    assert!((before - after).abs() < 1e-6, "before={before} after={after}");
}

#[test]
fn deformation_reclaims_to_its_own_baseline() {
    let mut f = SurfaceField::new(SurfaceParams {
        size: 100.0,
        resolution: 10,
        ..SurfaceParams::deformation()
    })
    .expect("field");
    f.update_origin(0.0, 0.0);
    fill(&mut f, 0.0);
    f.update_origin(10.0, 0.0);
    assert_eq!(f.texel(9, 3), 1.0);
    assert_eq!(f.texel(8, 3), 0.0);
}

#[test]
fn snapped_remainder_carries_into_later_moves() {
    let mut f = trail_10();
    f.update_origin(0.0, 0.0);
    // Each step is 1.00004 texels: snapped to one texel while the remainder
    // stays below the snap tolerance.
    f.update_origin(10.0004, 0.0);
    f.update_origin(20.0008, 0.0);
    fill(&mut f, 1.0);
    // The third step sees 1.00012 texels of accumulated travel, not 1.00004.
    f.update_origin(30.0012, 0.0);
    for y in 0..10 {
        assert_eq!(f.texel(9, y), 0.0);
        assert_eq!(f.texel(8, y), 0.0, "fractional shift reclaims two columns");
        assert!((f.texel(6, y) - 1.0).abs() < 1e-5);
    }
}
