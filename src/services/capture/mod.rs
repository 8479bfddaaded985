//! Источники захваченных нажатий.
//!
//! Только доставка `CapturedKey` в диспетчер и ответ «поглотить/пропустить».
//! Решения о действиях принимает исключительно резолвер.

mod dry_run;
mod line_source;
mod r#trait;

pub use self::dry_run::DryRunKeySource;
pub use self::line_source::{parse_line, LineKeySource};
pub use self::r#trait::{create_key_source, KeySource};
