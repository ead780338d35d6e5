//! Critically damped spring for one animated scalar.
//!
//! Integration uses the closed-form solution from the current state, so a
//! step is exact for any `dt` and frame-rate jitter never overshoots.

/// Velocity tolerance as a multiple of the position tolerance (per second).
const SETTLE_VELOCITY_FACTOR: f32 = 10.0;

/// One animated scalar value (offset or rotation) with an optional spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: Option<f32>,
    omega: f32,
    epsilon: f32,
}

impl Spring {
    /// Creates a resting value. `stiffness` is for unit mass.
    pub fn new(value: f32, stiffness: f32, epsilon: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: None,
            omega: stiffness.max(f32::EPSILON).sqrt(),
            epsilon,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Writes the value directly and cancels any in-flight animation.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
        self.target = None;
    }

    /// Starts (or redirects) an animation toward `target`.
    pub fn animate_to(&mut self, target: f32, initial_velocity: f32) {
        self.target = Some(target);
        self.velocity = initial_velocity;
    }

    /// Cancels the animation, keeping the current value.
    pub fn stop(&mut self) {
        self.target = None;
        self.velocity = 0.0;
    }

    /// Advances by `dt` seconds. Returns `true` when the spring settled on
    /// this step.
    pub fn step(&mut self, dt: f32) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        if dt <= 0.0 {
            return false;
        }

        let omega = self.omega;
        let c1 = self.value - target;
        let c2 = self.velocity + omega * c1;
        let decay = (-omega * dt).exp();
        let displacement = (c1 + c2 * dt) * decay;
        self.value = target + displacement;
        self.velocity = (c2 - omega * (c1 + c2 * dt)) * decay;

        if displacement.abs() < self.epsilon
            && self.velocity.abs() < self.epsilon * SETTLE_VELOCITY_FACTOR
        {
            self.value = target;
            self.velocity = 0.0;
            self.target = None;
            return true;
        }
        false
    }
}
