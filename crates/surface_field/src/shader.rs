//! Shader contract for binding a field to a material.
//!
//! The renderer owns pipelines and textures; this module only produces the
//! uniform block and WGSL chunks that sample a field with the same UV map the
//! CPU uses for stamping.

use crate::field::SurfaceField;
use crate::mapping::{texel_uv_wgsl, world_to_uv_wgsl};
use crate::params::{OutOfBoundsPolicy, SurfaceKind};

/// Uniform block mirrored by the generated `<prefix>_surface` WGSL struct.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniforms {
    pub origin: [f32; 2],
    pub size: f32,
    pub depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Everything a material needs to sample a field.
///
/// `declarations` goes at module scope; `body` is spliced into the stage named
/// by `stage`. The vertex chunk expects `model: mat4x4<f32>`, `position:
/// vec3<f32>` and a mutable `displaced: vec3<f32>` in scope; the fragment
/// chunk expects `world_pos: vec3<f32>` and a mutable `base_color: vec4<f32>`.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceBinding {
    pub kind: SurfaceKind,
    pub stage: ShaderStage,
    pub group: u32,
    pub uniforms: SurfaceUniforms,
    pub declarations: String,
    pub body: String,
}

impl SurfaceBinding {
    #[must_use]
    pub fn for_field(field: &SurfaceField, group: u32) -> Self {
        let kind = field.kind();
        let p = kind.prefix();
        let declarations = format!(
            "struct {ty} {{\n    origin: vec2<f32>,\n    size: f32,\n    depth: f32,\n}};\n\
             @group({group}) @binding(0) var<uniform> {p}_surface: {ty};\n\
             @group({group}) @binding(1) var {p}_map: texture_2d<f32>;\n\
             @group({group}) @binding(2) var {p}_sampler: sampler;\n",
            ty = struct_name(kind),
        );
        let wrap = |uv: &str| match field.params().policy {
            OutOfBoundsPolicy::Reject => uv.to_string(),
            OutOfBoundsPolicy::Wrap => format!("fract({uv})"),
            OutOfBoundsPolicy::Clamp => format!("clamp({uv}, vec2<f32>(0.0), vec2<f32>(1.0))"),
        };
        let (stage, body) = match kind {
            SurfaceKind::Trail => {
                let uv = world_to_uv_wgsl(
                    "world_pos.xz",
                    &format!("{p}_surface.origin"),
                    &format!("{p}_surface.size"),
                );
                let sample_uv = texel_uv_wgsl(&wrap(&format!("{p}_uv")));
                (
                    ShaderStage::Fragment,
                    format!(
                        "let {p}_uv = {uv};\n\
                         let {p}_value = textureSample({p}_map, {p}_sampler, {sample_uv}).r;\n\
                         base_color = vec4<f32>(mix(base_color.rgb, base_color.rgb * 0.35, {p}_value), base_color.a);\n"
                    ),
                )
            }
            SurfaceKind::Deformation => {
                let uv = world_to_uv_wgsl(
                    &format!("{p}_xz"),
                    &format!("{p}_surface.origin"),
                    &format!("{p}_surface.size"),
                );
                let sample_uv = texel_uv_wgsl(&wrap(&format!("{p}_uv")));
                (
                    ShaderStage::Vertex,
                    format!(
                        "let {p}_xz = model[3].xz + position.xz;\n\
                         let {p}_uv = {uv};\n\
                         let {p}_value = textureSampleLevel({p}_map, {p}_sampler, {sample_uv}, 0.0).r;\n\
                         displaced.y += {p}_value * {p}_surface.depth;\n"
                    ),
                )
            }
        };
        Self {
            kind,
            stage,
            group,
            uniforms: field.uniforms(),
            declarations,
            body,
        }
    }
}

fn struct_name(kind: SurfaceKind) -> &'static str {
    match kind {
        SurfaceKind::Trail => "TrailSurface",
        SurfaceKind::Deformation => "DeformSurface",
    }
}

/// Rendering-side material that can sample surface fields.
pub trait SurfaceMaterial {
    fn bind_surface(&mut self, binding: SurfaceBinding);
    fn update_surface_uniforms(&mut self, kind: SurfaceKind, uniforms: SurfaceUniforms);
}
