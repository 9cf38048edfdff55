use marquee_geom::wrap01;

/// The marquee's horizontal motion: a single scalar offset in `[0, 1)`
/// advanced once per frame and wrapped modulo 1. The reading direction is
/// applied at shading time (`FrameParams::reverse_scroll`), so the stored
/// offset only ever advances.
#[derive(Clone, Copy, Debug)]
pub struct ScrollState {
    offset: f32,
    speed: f32,
}

impl ScrollState {
    pub fn new(speed: f32) -> Self {
        Self { offset: 0.0, speed }
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Advance by `dt` seconds and return the new offset.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.offset = wrap01(self.offset + self.speed * dt);
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_unit_range_over_many_frames() {
        let mut s = ScrollState::new(0.7);
        for i in 0..10_000 {
            // irregular frame times, including long hitches
            let dt = 0.016 + (i % 7) as f32 * 0.013;
            let o = s.advance(dt);
            assert!((0.0..1.0).contains(&o), "offset {o} escaped [0,1)");
        }
    }

    #[test]
    fn offset_equals_speed_times_time_mod_one() {
        let speed = 0.25;
        let mut s = ScrollState::new(speed);
        let mut t = 0.0f32;
        for _ in 0..240 {
            t += 1.0 / 60.0;
            s.advance(1.0 / 60.0);
        }
        let expected = (speed * t).rem_euclid(1.0);
        assert!((s.offset() - expected).abs() < 1e-3, "{} vs {expected}", s.offset());
    }

    #[test]
    fn quarter_turn_advance() {
        let mut s = ScrollState::new(1.0);
        s.advance(0.25);
        assert!((s.offset() - 0.25).abs() < 1e-6);
        s.advance(0.80);
        // wrapped: 1.05 mod 1
        assert!((s.offset() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn zero_dt_is_identity() {
        let mut s = ScrollState::new(0.25);
        s.advance(0.5);
        let before = s.offset();
        s.advance(0.0);
        assert_eq!(s.offset(), before);
    }
}
