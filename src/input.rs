//! Pointer state and window input translation.
//!
//! The [`Pointer`] is the only state written from outside the frame step. It is
//! owned by the [`Field`](crate::Field) and handed to every particle update, so
//! a simulation can be driven in tests without any live input source.
//!
//! With the `viewer` feature, raw winit events are translated into
//! [`InputAction`]s:
//!
//! | input | action |
//! |-------|--------|
//! | cursor move | pointer set |
//! | `Space`, `S` | [`Command::Scatter`] |
//! | `N`, `Enter`, right mouse button | [`Command::SwitchImage`] |
//! | `Escape` | [`Command::Exit`] |

use glam::Vec2;

/// Shared pointer-influence state read by every particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    position: Option<Vec2>,
    radius: f32,
}

impl Pointer {
    /// Create an unset pointer with the given influence radius.
    pub fn new(radius: f32) -> Self {
        Self {
            position: None,
            radius,
        }
    }

    /// Latest pointer position, `None` until the first pointer event.
    #[inline]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Influence radius in squared-distance units.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Store the latest position. It stays in place until the next event.
    pub fn set(&mut self, x: f32, y: f32) {
        self.position = Some(Vec2::new(x, y));
    }
}

/// External commands applied to a field between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Throw every particle to a random position.
    Scatter,
    /// Advance to the next source image.
    SwitchImage,
    /// Close the viewer.
    Exit,
}

/// Result of translating one window event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// New pointer position in window pixels.
    Pointer(Vec2),
    /// A command to apply before the next frame.
    Command(Command),
}

#[cfg(feature = "viewer")]
mod window_events {
    use super::{Command, InputAction};
    use glam::Vec2;
    use winit::event::{ElementState, MouseButton, WindowEvent};
    use winit::keyboard::{KeyCode, PhysicalKey};

    impl Command {
        /// Map a physical key to a command.
        pub fn from_key(key: KeyCode) -> Option<Self> {
            match key {
                KeyCode::Space | KeyCode::KeyS => Some(Command::Scatter),
                KeyCode::KeyN | KeyCode::Enter | KeyCode::NumpadEnter => Some(Command::SwitchImage),
                KeyCode::Escape => Some(Command::Exit),
                _ => None,
            }
        }
    }

    impl InputAction {
        /// Translate a winit window event. Events with no meaning for the
        /// field (including key repeats) yield `None`.
        pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
            match event {
                WindowEvent::CursorMoved { position, .. } => Some(InputAction::Pointer(
                    Vec2::new(position.x as f32, position.y as f32),
                )),
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed || event.repeat {
                        return None;
                    }
                    match event.physical_key {
                        PhysicalKey::Code(key) => Command::from_key(key).map(InputAction::Command),
                        PhysicalKey::Unidentified(_) => None,
                    }
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Right,
                    ..
                } => Some(InputAction::Command(Command::SwitchImage)),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_starts_unset() {
        let pointer = Pointer::new(20_000.0);
        assert_eq!(pointer.position(), None);
        assert_eq!(pointer.radius(), 20_000.0);
    }

    #[test]
    fn test_pointer_keeps_latest_position() {
        let mut pointer = Pointer::new(1.0);
        pointer.set(3.0, 4.0);
        pointer.set(5.0, 6.0);
        assert_eq!(pointer.position(), Some(Vec2::new(5.0, 6.0)));
    }

    #[cfg(feature = "viewer")]
    #[test]
    fn test_key_commands() {
        use winit::keyboard::KeyCode;

        assert_eq!(Command::from_key(KeyCode::Space), Some(Command::Scatter));
        assert_eq!(Command::from_key(KeyCode::KeyN), Some(Command::SwitchImage));
        assert_eq!(Command::from_key(KeyCode::Escape), Some(Command::Exit));
        assert_eq!(Command::from_key(KeyCode::KeyQ), None);
    }

    #[cfg(feature = "viewer")]
    #[test]
    fn test_cursor_events() {
        use winit::dpi::PhysicalPosition;
        use winit::event::{DeviceId, WindowEvent};

        // SAFETY: the id is only compared, never passed back to the platform.
        let device_id = unsafe { DeviceId::dummy() };

        let moved = WindowEvent::CursorMoved {
            device_id,
            position: PhysicalPosition::new(12.5, 40.0),
        };
        assert_eq!(
            InputAction::from_window_event(&moved),
            Some(InputAction::Pointer(Vec2::new(12.5, 40.0)))
        );

        // Leaving the window keeps the last position.
        let left = WindowEvent::CursorLeft { device_id };
        assert_eq!(InputAction::from_window_event(&left), None);
    }
}
