use crate::Vec3;

/// A half-line `origin + t * direction` tagged with a shutter time.
///
/// The direction is not required to be unit length; intersection routines
/// report `t` in units of the stored direction. `time` lies in `[0, 1)` and
/// selects where moving geometry sits when the ray is traced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Ray at time 0 that reaches `to` at `t = 1`.
    ///
    /// Moving geometry stores its path this way, so `at(time)` is the
    /// position at that shutter time.
    #[inline]
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from, 0.0)
    }

    /// Secondary ray leaving `origin`, traced at the same shutter time.
    #[inline]
    pub fn spawn(&self, origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, self.time)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}
