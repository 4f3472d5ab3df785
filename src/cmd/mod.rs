//! CLI command implementations.
//!
//! Each command takes a resolved [`crate::config::Config`] and owns its
//! own output; `main` only parses arguments and dispatches here.

mod clean;
mod config;
mod run;
mod status;

pub use clean::clean;
pub use config::{config_init, config_show, config_validate};
pub use run::{run, summarize_one};
pub use status::{models, status};

use crate::config::Config;
use crate::source::hosted::{FileTokenSessionProvider, HostedDocsClient, SessionProvider};

/// Build a hosted-document session from the configured credential files.
///
/// Failure is downgraded to `None` with a warning: the batch proceeds
/// and only hosted documents get skipped.
pub(crate) async fn try_hosted_session(config: &Config) -> Option<HostedDocsClient> {
    let provider = FileTokenSessionProvider::new(
        config.hosted_api_base.clone(),
        config.hosted_token_url.clone(),
        config.credentials_file.clone(),
        config.token_file.clone(),
    );
    match provider.session().await {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "Hosted-document session unavailable");
            None
        }
    }
}
