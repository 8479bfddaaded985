pub mod key_name_to_evdev_code;
pub mod key_names;

pub use key_name_to_evdev_code::KeyNameToEvdevCode;
pub use key_names::{EvdevKeyNames, KeyNames};
