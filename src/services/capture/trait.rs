use crate::error::Result;
use crate::rules::RuleSet;
use crate::services::Dispatcher;
use std::sync::Arc;
use tokio::io::BufReader;

/// Trait for key sources that feed captured combinations to the dispatcher
#[async_trait::async_trait]
pub trait KeySource {
    /// Run until the source is exhausted
    async fn run(self: Box<Self>, dispatcher: Arc<Dispatcher>) -> Result<()>;
}

/// Factory function to create an appropriate key source based on the dry_run flag
pub fn create_key_source(rules: &RuleSet, dry_run: bool) -> Box<dyn KeySource + Send> {
    if dry_run {
        Box::new(super::dry_run::DryRunKeySource::from_rules(rules))
    } else {
        Box::new(super::line_source::LineKeySource::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        ))
    }
}
