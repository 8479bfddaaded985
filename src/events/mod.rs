pub mod keyboard;
pub mod window;

pub use keyboard::{CapturedKey, KeyCode, KeyCombination, LOW_LEVEL_DEVICE};
pub use window::{FocusedWindow, WindowEvent};
