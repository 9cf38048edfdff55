//! Raylib-based GPU rendering utilities for the orb: conversions, sphere
//! model upload, LED matrix lookup texture, shader wrapper.
// Unsafe is required for Raylib texture/shader FFI operations in this crate.

use marquee_matrix::{LedMatrix, MatrixMode, OrbConfig};
use raylib::prelude::*;

// Fixed sphere tessellation, matching the original display's 64x64 mesh.
pub const SPHERE_RINGS: i32 = 64;
pub const SPHERE_SLICES: i32 = 64;

/// GLSL orb shader with cached uniform locations. Static display parameters
/// are pushed once per (re)load or config change; only the scroll offset and
/// clock advance per frame.
pub struct OrbShader {
    pub shader: raylib::shaders::WeakShader,
    pub loc_scroll_offset: i32,
    pub loc_reverse: i32,
    pub loc_mode: i32,
    pub loc_band_half: i32,
    pub loc_rows: i32,
    pub loc_cols: i32,
    pub loc_led_pitch: i32,
    pub loc_bulb_inner: i32,
    pub loc_bulb_outer: i32,
    pub loc_dim_color: i32,
    pub loc_bright_color: i32,
    pub loc_background_color: i32,
    pub loc_emissive: i32,
}

impl OrbShader {
    pub fn load(rl: &mut RaylibHandle, thread: &RaylibThread) -> Option<Self> {
        let vs = "assets/shaders/led_orb.vs";
        let fs = "assets/shaders/led_orb.fs";
        Self::load_paths(rl, thread, vs, fs)
    }

    pub fn load_with_base(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        base: &std::path::Path,
    ) -> Option<Self> {
        let vs = base.join("assets/shaders/led_orb.vs");
        let fs = base.join("assets/shaders/led_orb.fs");
        if !vs.exists() || !fs.exists() {
            return None;
        }
        Self::load_paths(
            rl,
            thread,
            &vs.to_string_lossy(),
            &fs.to_string_lossy(),
        )
    }

    fn load_paths(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        vs: &str,
        fs: &str,
    ) -> Option<Self> {
        let shader_strong = rl.load_shader(thread, Some(vs), Some(fs));
        let shader = unsafe { shader_strong.make_weak() };
        let loc_scroll_offset = shader.get_shader_location("scrollOffset");
        let loc_reverse = shader.get_shader_location("reverseScroll");
        let loc_mode = shader.get_shader_location("matrixMode");
        let loc_band_half = shader.get_shader_location("bandHalfHeight");
        let loc_rows = shader.get_shader_location("matrixRows");
        let loc_cols = shader.get_shader_location("matrixCols");
        let loc_led_pitch = shader.get_shader_location("ledPitch");
        let loc_bulb_inner = shader.get_shader_location("bulbInner");
        let loc_bulb_outer = shader.get_shader_location("bulbOuter");
        let loc_dim_color = shader.get_shader_location("dimColor");
        let loc_bright_color = shader.get_shader_location("brightColor");
        let loc_background_color = shader.get_shader_location("backgroundColor");
        let loc_emissive = shader.get_shader_location("emissiveStrength");
        Some(Self {
            shader,
            loc_scroll_offset,
            loc_reverse,
            loc_mode,
            loc_band_half,
            loc_rows,
            loc_cols,
            loc_led_pitch,
            loc_bulb_inner,
            loc_bulb_outer,
            loc_dim_color,
            loc_bright_color,
            loc_background_color,
            loc_emissive,
        })
    }

    /// Push display parameters that only change on config reload or rebuild.
    pub fn set_display_uniforms(&mut self, cfg: &OrbConfig, matrix: &LedMatrix) {
        if self.loc_reverse >= 0 {
            let v: i32 = if cfg.reverse_scroll { 1 } else { 0 };
            self.shader.set_shader_value(self.loc_reverse, v);
        }
        if self.loc_mode >= 0 {
            let v: i32 = match cfg.mode {
                MatrixMode::BandOnly => 0,
                MatrixMode::FullSphere => 1,
            };
            self.shader.set_shader_value(self.loc_mode, v);
        }
        if self.loc_band_half >= 0 {
            self.shader
                .set_shader_value(self.loc_band_half, cfg.band_half_height());
        }
        if self.loc_rows >= 0 {
            self.shader
                .set_shader_value(self.loc_rows, matrix.rows() as f32);
        }
        if self.loc_cols >= 0 {
            self.shader
                .set_shader_value(self.loc_cols, matrix.cols() as f32);
        }
        if self.loc_led_pitch >= 0 {
            let v = [cfg.led_pitch_u, cfg.led_pitch_v];
            self.shader.set_shader_value(self.loc_led_pitch, v);
        }
        if self.loc_bulb_inner >= 0 {
            self.shader.set_shader_value(self.loc_bulb_inner, cfg.bulb_inner);
        }
        if self.loc_bulb_outer >= 0 {
            self.shader.set_shader_value(self.loc_bulb_outer, cfg.bulb_outer);
        }
        if self.loc_dim_color >= 0 {
            self.shader
                .set_shader_value(self.loc_dim_color, cfg.dim_color.to_array());
        }
        if self.loc_bright_color >= 0 {
            self.shader
                .set_shader_value(self.loc_bright_color, cfg.bright_color.to_array());
        }
        if self.loc_background_color >= 0 {
            self.shader.set_shader_value(
                self.loc_background_color,
                cfg.background_color.to_array(),
            );
        }
        if self.loc_emissive >= 0 {
            self.shader
                .set_shader_value(self.loc_emissive, cfg.emissive_strength);
        }
    }

    pub fn update_frame_uniforms(&mut self, scroll_offset: f32) {
        if self.loc_scroll_offset >= 0 {
            self.shader
                .set_shader_value(self.loc_scroll_offset, scroll_offset);
        }
    }
}

/// GPU-resident orb: sphere model with the LED matrix bound as its lookup
/// texture. The texture is replaced (or updated in place when the shape is
/// unchanged) on every matrix rebuild.
pub struct OrbRender {
    pub model: raylib::core::models::Model,
    pub matrix_tex: raylib::core::texture::Texture2D,
    pub tex_cols: i32,
    pub tex_rows: i32,
}

/// Row-major RGBA pixels for the matrix lookup texture: lit cells are white,
/// unlit cells black; the shader thresholds the red channel.
fn matrix_pixels(matrix: &LedMatrix) -> Vec<u8> {
    let mut data = Vec::with_capacity(matrix.rows() * matrix.cols() * 4);
    for &on in matrix.cells() {
        let v = if on { 255 } else { 0 };
        data.extend_from_slice(&[v, v, v, 255]);
    }
    data
}

fn make_matrix_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    matrix: &LedMatrix,
) -> Option<raylib::core::texture::Texture2D> {
    let width = matrix.cols() as i32;
    let height = matrix.rows() as i32;
    let img = raylib::core::texture::Image::gen_image_color(width, height, Color::BLACK);
    let tex = rl.load_texture_from_image(thread, &img).ok()?;
    tex.set_texture_filter(thread, raylib::consts::TextureFilter::TEXTURE_FILTER_POINT);
    tex.set_texture_wrap(thread, raylib::consts::TextureWrap::TEXTURE_WRAP_CLAMP);
    let data = matrix_pixels(matrix);
    unsafe {
        raylib::ffi::UpdateTexture(*tex.as_ref(), data.as_ptr() as *const _);
    }
    Some(tex)
}

/// Create the sphere model, bind the orb shader to its material, and upload
/// the matrix as its lookup texture.
pub fn upload_orb(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    cfg: &OrbConfig,
    matrix: &LedMatrix,
    shader: &OrbShader,
) -> Option<OrbRender> {
    let mesh = raylib::core::models::Mesh::gen_mesh_sphere(
        thread,
        cfg.radius,
        SPHERE_RINGS,
        SPHERE_SLICES,
    );
    let mut model = rl
        .load_model_from_mesh(thread, unsafe { mesh.make_weak() })
        .ok()?;
    let matrix_tex = make_matrix_texture(rl, thread, matrix)?;
    if let Some(mat) = model.materials_mut().get_mut(0) {
        let dest = mat.shader_mut();
        let dest_ptr: *mut raylib::ffi::Shader = dest.as_mut();
        let src_ptr: *const raylib::ffi::Shader = shader.shader.as_ref();
        unsafe { std::ptr::copy_nonoverlapping(src_ptr, dest_ptr, 1) };
        mat.set_material_texture(
            raylib::consts::MaterialMapIndex::MATERIAL_MAP_ALBEDO,
            &matrix_tex,
        );
    }
    Some(OrbRender {
        model,
        matrix_tex,
        tex_cols: matrix.cols() as i32,
        tex_rows: matrix.rows() as i32,
    })
}

/// Push a rebuilt matrix to the GPU. Same shape updates the texture in
/// place; a shape change (pitch or mode changed) recreates it and rebinds
/// the material map.
pub fn update_matrix_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    orb: &mut OrbRender,
    matrix: &LedMatrix,
) {
    let width = matrix.cols() as i32;
    let height = matrix.rows() as i32;
    if orb.tex_cols == width && orb.tex_rows == height {
        let data = matrix_pixels(matrix);
        unsafe {
            raylib::ffi::UpdateTexture(*orb.matrix_tex.as_ref(), data.as_ptr() as *const _);
        }
        return;
    }
    if let Some(tex) = make_matrix_texture(rl, thread, matrix) {
        if let Some(mat) = orb.model.materials_mut().get_mut(0) {
            mat.set_material_texture(
                raylib::consts::MaterialMapIndex::MATERIAL_MAP_ALBEDO,
                &tex,
            );
        }
        orb.matrix_tex = tex;
        orb.tex_cols = width;
        orb.tex_rows = height;
    } else {
        log::warn!("failed to recreate {width}x{height} matrix texture; keeping previous");
    }
}
