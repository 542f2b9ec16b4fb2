//! Per-frame input as sampled by the host

use glam::Vec2;

/// Digital button state at the end of the frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub ended_down: bool,
}

impl ButtonState {
    pub const DOWN: Self = Self { ended_down: true };
    pub const UP: Self = Self { ended_down: false };
}

/// One controller's state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    pub move_up: ButtonState,
    pub move_down: ButtonState,
    pub move_left: ButtonState,
    pub move_right: ButtonState,
    /// Switches the player onto the upper layer
    pub layer_up: ButtonState,
    /// Switches the player onto the lower layer
    pub layer_down: ButtonState,
    /// Thumbstick, each axis in [-1, 1], +y is up
    pub stick: Vec2,
}

impl ControllerInput {
    /// Any d-pad direction held
    pub fn any_digital(&self) -> bool {
        self.move_up.ended_down
            || self.move_down.ended_down
            || self.move_left.ended_down
            || self.move_right.ended_down
    }

    /// Unit-per-axis direction from the d-pad, screen space (+y down)
    pub fn digital_direction(&self) -> Vec2 {
        let axis = |negative: ButtonState, positive: ButtonState| {
            positive.ended_down as i32 as f32 - negative.ended_down as i32 as f32
        };
        Vec2::new(
            axis(self.move_left, self.move_right),
            axis(self.move_up, self.move_down),
        )
    }

    /// Stick direction in screen space (+y down), clamped to [-1, 1]
    pub fn analog_direction(&self) -> Vec2 {
        let stick = self.stick.clamp(Vec2::splat(-1.0), Vec2::ONE);
        Vec2::new(stick.x, -stick.y)
    }

    /// Movement intent for this frame.
    ///
    /// The d-pad wins outright: the stick is only consulted when no
    /// direction button is held.
    pub fn movement_direction(&self) -> Vec2 {
        if self.any_digital() {
            self.digital_direction()
        } else {
            self.analog_direction()
        }
    }
}

/// Everything the host hands the simulation for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Frames per second measured over the previous frame
    pub fps: f32,
    pub controllers: Vec<ControllerInput>,
    /// Pause toggle
    pub pause: bool,
}

impl FrameInput {
    /// Single-controller input at the given frame rate
    pub fn single(fps: f32, controller: ControllerInput) -> Self {
        Self {
            fps,
            controllers: vec![controller],
            pause: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digital_direction() {
        let input = ControllerInput {
            move_right: ButtonState::DOWN,
            move_up: ButtonState::DOWN,
            ..Default::default()
        };
        assert_eq!(input.digital_direction(), Vec2::new(1.0, -1.0));

        let opposed = ControllerInput {
            move_left: ButtonState::DOWN,
            move_right: ButtonState::DOWN,
            ..Default::default()
        };
        assert_eq!(opposed.digital_direction(), Vec2::ZERO);
    }

    #[test]
    fn test_digital_wins_over_analog() {
        let input = ControllerInput {
            move_left: ButtonState::DOWN,
            stick: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        assert_eq!(input.movement_direction(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_analog_used_without_digital() {
        let input = ControllerInput {
            stick: Vec2::new(0.5, 2.0),
            ..Default::default()
        };
        assert_eq!(input.movement_direction(), Vec2::new(0.5, -1.0));
    }
}
