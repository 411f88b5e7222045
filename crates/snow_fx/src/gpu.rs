//! Instance packing and the billboard shader used to draw the pool.

use crate::ParticleField;

/// One point sprite per slot; dead slots upload with `alpha = 0`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub pos: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

impl ParticleField {
    /// Pack every slot into `out` (cleared first) for a vertex-buffer upload.
    pub fn write_instances(&self, out: &mut Vec<ParticleInstance>) {
        out.clear();
        out.extend(
            self.positions()
                .iter()
                .zip(self.sizes())
                .zip(self.colors())
                .zip(self.alphas())
                .map(|(((p, &size), c), &alpha)| ParticleInstance {
                    pos: p.to_array(),
                    size,
                    color: c.to_array(),
                    alpha,
                }),
        );
    }
}

/// Camera-facing quads with a soft round mask. Expects a `Globals` uniform with
/// `view_proj`, `cam_right`, `cam_up` and `size_scale`.
pub const PARTICLE_WGSL: &str = r"
struct Globals {
    view_proj: mat4x4<f32>,
    cam_right: vec4<f32>,
    cam_up: vec4<f32>,
    size_scale: f32,
};
@group(0) @binding(0) var<uniform> globals: Globals;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) alpha: f32,
};

@vertex
fn vs_main(
    @location(0) corner: vec2<f32>,
    @location(1) pos: vec3<f32>,
    @location(2) size: f32,
    @location(3) color: vec3<f32>,
    @location(4) alpha: f32,
) -> VsOut {
    let s = size * globals.size_scale;
    let world = pos + globals.cam_right.xyz * corner.x * s + globals.cam_up.xyz * corner.y * s;
    var out: VsOut;
    out.clip = globals.view_proj * vec4<f32>(world, 1.0);
    out.corner = corner;
    out.color = color;
    out.alpha = alpha;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let d = dot(in.corner, in.corner);
    let mask = smoothstep(0.25, 0.0, d);
    return vec4<f32>(in.color, in.alpha * mask);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParticleParams;
    use glam::Vec3;

    #[test]
    fn instances_cover_every_slot() {
        let mut f = ParticleField::new(ParticleParams {
            max_particles: 8,
            ..ParticleParams::default()
        })
        .expect("pool");
        f.emit(Vec3::ONE, Vec3::Y, 1.0, 0.0, 3);
        let mut out = Vec::new();
        f.write_instances(&mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0].pos, [1.0, 1.0, 1.0]);
        assert_eq!(out[5].alpha, 0.0);
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
    }
}
