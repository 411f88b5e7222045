//! The wrapped canvas itself: recentring, reclaiming edges, stamping.

use crate::brush::Brush;
use crate::mapping::{UvTransform, uv_to_texel};
use crate::params::{OutOfBoundsPolicy, SurfaceKind, SurfaceParams};
use crate::shader::{SurfaceBinding, SurfaceMaterial, SurfaceUniforms};
use crate::SurfaceError;
use glam::Vec2;

/// Origin deltas below this (world units, per axis) do not move the canvas.
const NEGLIGIBLE_DELTA: f32 = 1e-6;
/// Texel offsets within this of an integer are treated as that integer.
const OFFSET_SNAP: f32 = 1e-4;
/// Upper bound on brush dabs per segment.
const MAX_SEGMENT_DABS: usize = 4096;

#[derive(Debug, Clone)]
pub struct SurfaceField {
    params: SurfaceParams,
    origin: Vec2,
    /// Origin the buffer content is currently aligned to. `None` until the
    /// first `update_origin`.
    last_origin: Option<Vec2>,
    texels: Vec<f32>,
    scratch: Vec<f32>,
    dirty: bool,
}

impl SurfaceField {
    pub fn new(params: SurfaceParams) -> Result<Self, SurfaceError> {
        params.validate()?;
        let n = (params.resolution as usize) * (params.resolution as usize);
        Ok(Self {
            params,
            origin: Vec2::ZERO,
            last_origin: None,
            texels: vec![params.baseline; n],
            scratch: vec![params.baseline; n],
            dirty: true,
        })
    }

    #[must_use]
    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }
    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.params.kind
    }
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }
    #[must_use]
    pub fn size(&self) -> f32 {
        self.params.size
    }
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.params.resolution
    }
    #[must_use]
    pub fn baseline(&self) -> f32 {
        self.params.baseline
    }

    #[must_use]
    pub fn transform(&self) -> UvTransform {
        UvTransform {
            origin: self.origin,
            size: self.params.size,
        }
    }

    #[inline]
    #[must_use]
    pub fn world_to_uv(&self, x: f32, z: f32) -> Vec2 {
        self.transform().world_to_uv(x, z)
    }

    /// Recentre the field on `(center_x, center_z)`.
    ///
    /// The first call only records the origin. Later calls shift the content
    /// by the texel equivalent of the delta from the last aligned origin,
    /// wrapping content across edges, then reset the newly exposed strips.
    /// A delta larger than the field size on either axis clears everything.
    pub fn update_origin(&mut self, center_x: f32, center_z: f32) {
        let next = Vec2::new(center_x, center_z);
        self.origin = next;
        let Some(last) = self.last_origin else {
            self.last_origin = Some(next);
            return;
        };
        let delta = next - last;
        if delta.x.abs() < NEGLIGIBLE_DELTA && delta.y.abs() < NEGLIGIBLE_DELTA {
            return;
        }
        let size = self.params.size;
        if delta.x.abs() > size || delta.y.abs() > size {
            log::debug!(
                "{:?} field teleport by ({:.2}, {:.2}); clearing",
                self.params.kind,
                delta.x,
                delta.y
            );
            self.clear();
            self.last_origin = Some(next);
            return;
        }
        let res = self.params.resolution as f32;
        let raw_x = -(delta.x / size) * res;
        let raw_y = (delta.y / size) * res;
        let (offset_x, offset_y) = (snap(raw_x), snap(raw_y));
        if offset_x == 0.0 && offset_y == 0.0 {
            return;
        }
        self.shift(offset_x, offset_y);
        self.clear_newly_exposed(offset_x, offset_y);
        self.dirty = true;
        // Content is aligned to the snapped offset; the remainder carries into
        // the next delta.
        let texel = size / res;
        self.last_origin = Some(Vec2::new(
            if offset_x == raw_x { next.x } else { last.x - offset_x * texel },
            if offset_y == raw_y { next.y } else { last.y + offset_y * texel },
        ));
    }

    /// Reset every texel to the baseline.
    pub fn clear(&mut self) {
        self.texels.fill(self.params.baseline);
        self.dirty = true;
    }

    /// Stamp the brush at a world position. Returns `false` when the stamp was
    /// rejected by the out-of-bounds policy.
    pub fn stamp(&mut self, world_x: f32, world_z: f32) -> bool {
        let uv = self.world_to_uv(world_x, world_z);
        if !uv.is_finite() {
            return false;
        }
        let res = self.params.resolution;
        let radius_px = self.params.brush.radius() / self.params.size * res as f32;
        match self.params.policy {
            OutOfBoundsPolicy::Reject => {
                if uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 {
                    return false;
                }
                let c = uv_to_texel(uv, res);
                self.params.brush.paint(&mut self.texels, res, c, radius_px);
            }
            OutOfBoundsPolicy::Clamp => {
                let c = uv_to_texel(uv.clamp(Vec2::ZERO, Vec2::ONE), res);
                self.params.brush.paint(&mut self.texels, res, c, radius_px);
            }
            OutOfBoundsPolicy::Wrap => {
                let n = res as f32;
                let p = uv_to_texel(uv, res);
                let c = Vec2::new(p.x.rem_euclid(n), p.y.rem_euclid(n));
                // Paint every image the brush can reach so discs straddling an
                // edge continue on the opposite side.
                for oy in [-n, 0.0, n] {
                    for ox in [-n, 0.0, n] {
                        let img = c + Vec2::new(ox, oy);
                        if Brush::touches(img, radius_px, res) {
                            self.params.brush.paint(&mut self.texels, res, img, radius_px);
                        }
                    }
                }
            }
        }
        self.dirty = true;
        true
    }

    /// Stamp a continuous stroke from `(x0, z0)` to `(x1, z1)`. The start point
    /// is assumed to have been stamped already, so dabs cover `(0, 1]`.
    pub fn stamp_segment(&mut self, x0: f32, z0: f32, x1: f32, z1: f32) {
        let a = Vec2::new(x0, z0);
        let b = Vec2::new(x1, z1);
        let len = a.distance(b);
        if !len.is_finite() {
            return;
        }
        let texel = self.params.size / self.params.resolution as f32;
        let spacing = (self.params.brush.radius() * 0.5).max(texel);
        let dabs = ((len / spacing).ceil() as usize).clamp(1, MAX_SEGMENT_DABS);
        for i in 1..=dabs {
            let p = a.lerp(b, i as f32 / dabs as f32);
            self.stamp(p.x, p.y);
        }
    }

    /// Value at texel `(x, y)`; row 0 is the `v = 1` edge.
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> f32 {
        self.texels[self.index(x, y)]
    }

    pub fn set_texel(&mut self, x: u32, y: u32, value: f32) {
        let i = self.index(x, y);
        self.texels[i] = value;
        self.dirty = true;
    }

    /// Nearest-texel lookup at a world position, following the out-of-bounds
    /// policy (`None` for a rejected position).
    #[must_use]
    pub fn sample_world(&self, world_x: f32, world_z: f32) -> Option<f32> {
        let uv = self.world_to_uv(world_x, world_z);
        if !uv.is_finite() {
            return None;
        }
        let uv = match self.params.policy {
            OutOfBoundsPolicy::Reject => {
                if uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 {
                    return None;
                }
                uv
            }
            OutOfBoundsPolicy::Clamp => uv.clamp(Vec2::ZERO, Vec2::ONE),
            OutOfBoundsPolicy::Wrap => uv - uv.floor(),
        };
        let res = self.params.resolution;
        let p = uv_to_texel(uv, res);
        let max = (res - 1) as f32;
        let x = p.x.floor().clamp(0.0, max) as u32;
        let y = p.y.floor().clamp(0.0, max) as u32;
        Some(self.texel(x, y))
    }

    #[must_use]
    pub fn texels(&self) -> &[f32] {
        &self.texels
    }

    /// Single-channel 8-bit copy for texture upload.
    #[must_use]
    pub fn to_r8(&self) -> Vec<u8> {
        self.texels
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }

    /// Returns whether the buffer changed since the last call and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    #[must_use]
    pub fn uniforms(&self) -> SurfaceUniforms {
        SurfaceUniforms {
            origin: self.origin.to_array(),
            size: self.params.size,
            depth: self.params.depth,
        }
    }

    /// Attach this field to a material as a sampled input at bind group `group`.
    pub fn apply_to_material<M: SurfaceMaterial + ?Sized>(&self, material: &mut M, group: u32) {
        material.bind_surface(SurfaceBinding::for_field(self, group));
    }

    /// Push the current origin into a material bound earlier.
    pub fn refresh_material<M: SurfaceMaterial + ?Sized>(&self, material: &mut M) {
        material.update_surface_uniforms(self.params.kind, self.uniforms());
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        let n = self.params.resolution as usize;
        debug_assert!((x as usize) < n && (y as usize) < n);
        y as usize * n + x as usize
    }

    /// Toroidal resample: `new(x, y) = old(x - ox, y - oy)` with wrap-around,
    /// bilinear for fractional offsets and exact for whole-texel ones.
    fn shift(&mut self, ox: f32, oy: f32) {
        let n = self.params.resolution as usize;
        let ni = n as i64;
        self.scratch.copy_from_slice(&self.texels);
        let src = &self.scratch;
        for y in 0..n {
            let sy = y as f32 - oy;
            let y0f = sy.floor();
            let fy = sy - y0f;
            let y0 = (y0f as i64).rem_euclid(ni) as usize;
            let y1 = (y0 + 1) % n;
            for x in 0..n {
                let sx = x as f32 - ox;
                let x0f = sx.floor();
                let fx = sx - x0f;
                let x0 = (x0f as i64).rem_euclid(ni) as usize;
                let x1 = (x0 + 1) % n;
                let top = src[y0 * n + x0] + (src[y0 * n + x1] - src[y0 * n + x0]) * fx;
                let bot = src[y1 * n + x0] + (src[y1 * n + x1] - src[y1 * n + x0]) * fx;
                self.texels[y * n + x] = top + (bot - top) * fy;
            }
        }
    }

    /// Reset the strips uncovered by a shift: `ceil(|offset|)` columns/rows on
    /// the trailing side, clipped to the grid.
    fn clear_newly_exposed(&mut self, ox: f32, oy: f32) {
        let n = self.params.resolution as usize;
        let base = self.params.baseline;
        if ox != 0.0 {
            let w = (ox.abs().ceil() as usize).min(n);
            let cols = if ox > 0.0 { 0..w } else { n - w..n };
            for y in 0..n {
                self.texels[y * n + cols.start..y * n + cols.end].fill(base);
            }
        }
        if oy != 0.0 {
            let h = (oy.abs().ceil() as usize).min(n);
            let rows = if oy > 0.0 { 0..h } else { n - h..n };
            self.texels[rows.start * n..rows.end * n].fill(base);
        }
    }
}

fn snap(offset: f32) -> f32 {
    let r = offset.round();
    if (offset - r).abs() < OFFSET_SNAP { r } else { offset }
}
