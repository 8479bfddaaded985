pub mod capture;
pub mod dispatcher;
pub mod executor;
pub mod focus;
pub mod launcher;
pub mod virtual_device;

pub use capture::create_key_source;
pub use dispatcher::{Dispatch, Dispatcher};
pub use executor::ActionExecutor;
pub use focus::{create_focus_provider, FocusWatcher};
pub use launcher::{create_launcher, Launcher};
pub use virtual_device::{KeystrokeInjector, VirtualDevice};
