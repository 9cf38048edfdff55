use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use raylib::prelude::*;

use marquee_matrix::{
    LedMatrix, OrbConfig, RebuildError, ScrollState, build_matrix, rasterize_message,
};
use marquee_render_raylib::{OrbRender, OrbShader, update_matrix_texture, upload_orb};

use crate::camera::OrbitCamera;
use crate::event::{Event, EventQueue, RebuildCause};

pub struct App {
    pub cfg: OrbConfig,
    /// Retained display snapshot; replaced wholesale on rebuild, never
    /// mutated in place while a frame is in flight.
    pub matrix: LedMatrix,
    pub scroll: ScrollState,
    pub queue: EventQueue,
    pub cam: OrbitCamera,
    pub shader: Option<OrbShader>,
    pub orb: Option<OrbRender>,
    pub spin_angle: f32, // degrees, raylib model-rotation convention
    pub paused: bool,
    pub assets_root: PathBuf,
    config_path: PathBuf,
    config_event_rx: Receiver<()>,
}

impl App {
    pub fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        cfg: OrbConfig,
        assets_root: PathBuf,
        watch_config: bool,
    ) -> Result<Self, RebuildError> {
        // Initial build is fail-fast: a config that cannot produce a matrix
        // is a startup error, not something to limp past.
        let bitmap = rasterize_message(&cfg.text, &cfg)?;
        let matrix = build_matrix(&bitmap, &cfg)?;
        log::info!(
            "initial matrix {}x{} for {:?}",
            matrix.rows(),
            matrix.cols(),
            cfg.text
        );

        let mut shader =
            OrbShader::load_with_base(rl, thread, &assets_root).or_else(|| OrbShader::load(rl, thread));
        let orb = shader
            .as_ref()
            .and_then(|sh| upload_orb(rl, thread, &cfg, &matrix, sh));
        if orb.is_none() {
            log::warn!("no visual output available (shader or model upload failed)");
        }
        if let Some(ref mut sh) = shader {
            sh.set_display_uniforms(&cfg, &matrix);
        }

        let config_path = crate::assets::config_path(&assets_root);
        let (cfg_tx, cfg_rx) = std::sync::mpsc::channel::<()>();
        if watch_config {
            let tx = cfg_tx.clone();
            let path = config_path.clone();
            std::thread::spawn(move || {
                use notify::{EventKind, RecursiveMode, Watcher};
                if let Ok(mut watcher) =
                    notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                        if let Ok(event) = res {
                            match event.kind {
                                EventKind::Modify(_)
                                | EventKind::Create(_)
                                | EventKind::Remove(_)
                                | EventKind::Any => {
                                    let _ = tx.send(());
                                }
                                _ => {}
                            }
                        }
                    })
                {
                    let _ = watcher.watch(path.as_path(), RecursiveMode::NonRecursive);
                    loop {
                        std::thread::sleep(std::time::Duration::from_secs(3600));
                    }
                }
            });
        }

        let scroll = ScrollState::new(cfg.scroll_speed);
        Ok(Self {
            cfg,
            matrix,
            scroll,
            queue: EventQueue::new(),
            cam: OrbitCamera::new(Vector3::zero()),
            shader,
            orb,
            spin_angle: 0.0,
            paused: false,
            assets_root,
            config_path,
            config_event_rx: cfg_rx,
        })
    }

    pub fn step(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, dt: f32) {
        self.queue.emit_now(Event::Tick);

        // Coalesce watcher notifications into a single reload per tick
        if self.config_event_rx.try_iter().last().is_some() {
            self.queue.emit_now(Event::ConfigFileChanged);
        }

        self.handle_input(rl);

        // Drain this tick's events; rebuilds run here, between frames,
        // never mid-frame.
        while let Some(env) = self.queue.pop_ready() {
            match env.kind {
                Event::Tick => {}
                Event::ConfigFileChanged => self.reload_config(),
                Event::RebuildRequested { cause } => self.rebuild(rl, thread, cause),
            }
        }

        if !self.paused {
            self.scroll.advance(dt);
        }
        self.spin_angle = (self.spin_angle + self.cfg.spin_speed.to_degrees() * dt) % 360.0;

        if let Some(ref mut sh) = self.shader {
            sh.update_frame_uniforms(self.scroll.offset());
        }
        self.cam.update(rl);
        self.queue.advance_tick();
    }

    fn handle_input(&mut self, rl: &mut RaylibHandle) {
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            self.paused = !self.paused;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            self.cfg.reverse_scroll = !self.cfg.reverse_scroll;
            if let Some(ref mut sh) = self.shader {
                sh.set_display_uniforms(&self.cfg, &self.matrix);
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT_BRACKET) {
            self.cfg.scroll_speed = (self.cfg.scroll_speed - 0.05).max(0.0);
            self.scroll.set_speed(self.cfg.scroll_speed);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT_BRACKET) {
            self.cfg.scroll_speed += 0.05;
            self.scroll.set_speed(self.cfg.scroll_speed);
        }
    }

    fn reload_config(&mut self) {
        let new_cfg = match OrbConfig::load_from_path(&self.config_path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("config reload failed, keeping current settings: {e}");
                return;
            }
        };
        let cause = rebuild_cause(&self.cfg, &new_cfg);
        self.cfg = new_cfg;
        // Non-rebuild parameters apply immediately.
        self.scroll.set_speed(self.cfg.scroll_speed);
        if let Some(ref mut sh) = self.shader {
            sh.set_display_uniforms(&self.cfg, &self.matrix);
        }
        if let Some(cause) = cause {
            log::info!("config changed ({cause:?}), scheduling rebuild");
            self.queue.emit_now(Event::RebuildRequested { cause });
        }
    }

    /// One synchronous rebuild: rasterize -> matrix -> texture. On failure
    /// the previous matrix and texture stay live and shading continues on
    /// the stale snapshot.
    fn rebuild(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, cause: RebuildCause) {
        let built = rasterize_message(&self.cfg.text, &self.cfg)
            .and_then(|bitmap| build_matrix(&bitmap, &self.cfg));
        match built {
            Ok(matrix) => {
                log::info!(
                    "rebuilt matrix {}x{} ({cause:?})",
                    matrix.rows(),
                    matrix.cols()
                );
                self.matrix = matrix;
                if let Some(ref mut orb) = self.orb {
                    update_matrix_texture(rl, thread, orb, &self.matrix);
                }
                if let Some(ref mut sh) = self.shader {
                    sh.set_display_uniforms(&self.cfg, &self.matrix);
                }
            }
            Err(e) => {
                log::warn!("rebuild failed ({cause:?}), keeping previous matrix: {e}");
            }
        }
    }

    pub fn render(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let camera = self.cam.to_camera3d();
        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::BLACK);

        if let Some(ref orb) = self.orb {
            let mut d3 = d.begin_mode3D(camera);
            d3.draw_model_ex(
                &orb.model,
                Vector3::zero(),
                Vector3::up(),
                self.spin_angle,
                Vector3::one(),
                Color::WHITE,
            );
        } else {
            d.draw_text(
                "no visual output available",
                12,
                64,
                20,
                Color::ORANGE,
            );
        }

        d.draw_text(&self.cfg.text, 12, 12, 20, Color::GRAY);
        d.draw_text(
            &format!(
                "offset {:.3}  speed {:.2}{}",
                self.scroll.offset(),
                self.scroll.speed(),
                if self.paused { "  [paused]" } else { "" }
            ),
            12,
            36,
            10,
            Color::DARKGRAY,
        );
        d.draw_fps(12, 52);
    }
}

/// Which parameters force a matrix rebuild.
fn rebuild_cause(old: &OrbConfig, new: &OrbConfig) -> Option<RebuildCause> {
    let text_changed = old.text != new.text;
    let pitch_changed = old.latitude_pitch != new.latitude_pitch
        || old.longitude_pitch != new.longitude_pitch
        || old.mode != new.mode
        || old.row_band != new.row_band
        || old.canvas_width != new.canvas_width
        || old.canvas_height != new.canvas_height
        || old.glyph_height != new.glyph_height
        || old.gap != new.gap
        || old.coverage_threshold != new.coverage_threshold;
    match (text_changed, pitch_changed) {
        (true, true) => Some(RebuildCause::ConfigReload),
        (true, false) => Some(RebuildCause::MessageChanged),
        (false, true) => Some(RebuildCause::PitchChanged),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_change_triggers_message_rebuild() {
        let old = OrbConfig::default();
        let new = OrbConfig {
            text: "OTHER".to_string(),
            ..OrbConfig::default()
        };
        assert_eq!(rebuild_cause(&old, &new), Some(RebuildCause::MessageChanged));
    }

    #[test]
    fn pitch_change_triggers_pitch_rebuild() {
        let old = OrbConfig::default();
        let new = OrbConfig {
            longitude_pitch: 0.1,
            ..OrbConfig::default()
        };
        assert_eq!(rebuild_cause(&old, &new), Some(RebuildCause::PitchChanged));
    }

    #[test]
    fn combined_change_is_a_full_reload() {
        let old = OrbConfig::default();
        let new = OrbConfig {
            text: "OTHER".to_string(),
            mode: marquee_matrix::MatrixMode::FullSphere,
            ..OrbConfig::default()
        };
        assert_eq!(rebuild_cause(&old, &new), Some(RebuildCause::ConfigReload));
    }

    #[test]
    fn cosmetic_change_needs_no_rebuild() {
        let old = OrbConfig::default();
        let new = OrbConfig {
            scroll_speed: 0.9,
            bright_color: marquee_matrix::Rgb::new(1.0, 0.0, 0.0),
            ..OrbConfig::default()
        };
        assert_eq!(rebuild_cause(&old, &new), None);
    }
}
