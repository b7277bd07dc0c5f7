//! Command implementations.

pub mod config;
pub mod fewshots;
pub mod transitions;

pub use self::config::execute_config;
pub use self::fewshots::execute_fewshots;
pub use self::transitions::execute_transitions;

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use segue_extractor::{Extractor, ExtractorConfig};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Build an extractor, attaching the configured oracle when enabled.
fn build_extractor(
    extractor_config: ExtractorConfig,
    config: &Config,
    formatter: &Formatter,
) -> Result<Extractor> {
    let use_oracle = extractor_config.use_oracle;
    let model = extractor_config.oracle_model_id.clone();
    let extractor = Extractor::new(extractor_config)?;

    if !use_oracle {
        return Ok(extractor);
    }

    match config.oracle.build_oracle(model.as_deref())? {
        Some(oracle) => Ok(extractor.with_oracle(oracle)),
        None => {
            warn!("Oracle enabled without a provider");
            eprintln!(
                "{}",
                formatter.warning("Oracle enabled but no provider configured; every candidate will be rejected")
            );
            Ok(extractor)
        }
    }
}

/// Write `contents` to `path` and report it.
fn write_output(path: &Path, contents: &str, what: &str, formatter: &Formatter) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    eprintln!("{}", formatter.success(&format!("Wrote {} to {}", what, path.display())));
    Ok(())
}
