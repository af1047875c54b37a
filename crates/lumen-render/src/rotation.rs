// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The rotating root constant.

/// An angle in degrees that advances by a fixed step and wraps to 0 at 360.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationAngle {
    degrees: f32,
    step: f32,
}

impl RotationAngle {
    /// Degrees at which the angle wraps back to 0.
    pub const FULL_TURN: f32 = 360.0;

    /// Starts at 0 and advances by `step` degrees.
    pub fn new(step: f32) -> Self {
        Self { degrees: 0.0, step }
    }

    /// The current angle, always in `[0, 360)`.
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    /// The bit pattern pushed as the 32-bit root constant.
    pub fn bits(&self) -> u32 {
        self.degrees.to_bits()
    }

    /// Moves one step forward, wrapping to exactly 0 on reaching a full turn.
    pub fn advance(&mut self) {
        self.degrees += self.step;
        if self.degrees >= Self::FULL_TURN {
            self.degrees = 0.0;
        }
    }
}

impl Default for RotationAngle {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_the_step() {
        let mut angle = RotationAngle::new(1.0);
        angle.advance();
        angle.advance();
        assert_eq!(angle.degrees(), 2.0);
        assert_eq!(angle.bits(), 2.0f32.to_bits());
    }

    #[test]
    fn wraps_to_zero_at_a_full_turn() {
        let mut angle = RotationAngle::new(1.0);
        let mut max_seen = 0.0f32;
        for _ in 0..359 {
            angle.advance();
            max_seen = max_seen.max(angle.degrees());
        }
        assert_eq!(angle.degrees(), 359.0);
        angle.advance();
        assert_eq!(angle.degrees(), 0.0);
        assert!(max_seen < RotationAngle::FULL_TURN);
    }

    #[test]
    fn uneven_steps_still_wrap_to_zero() {
        let mut angle = RotationAngle::new(7.0);
        for _ in 0..51 {
            angle.advance();
        }
        assert_eq!(angle.degrees(), 357.0);
        angle.advance();
        assert_eq!(angle.degrees(), 0.0);
        assert_eq!(angle.bits(), 0);
    }
}
