//! Transitions command implementation.

use super::{build_extractor, write_output};
use crate::cli::TransitionsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use segue_extractor::{duplicates_txt, transitions_txt, ExtractorConfig, TransitionReport};
use tracing::info;

/// Execute the transitions command.
pub fn execute_transitions(
    args: TransitionsArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<TransitionReport> {
    let extractor_config = apply_overrides(config.extractor.clone(), &args);
    let extractor = build_extractor(extractor_config, config, formatter)?;

    info!("Reading {}", args.file.display());
    let paragraphs = segue_loader::load_file(&args.file)?;
    let report = extractor.extract_transitions(&paragraphs)?;

    println!("{}", formatter.format_transitions(&report)?);

    if let Some(path) = &args.output {
        write_output(path, &transitions_txt(&report.validated), "transitions", formatter)?;
    }
    if let Some(path) = &args.duplicates {
        write_output(path, &duplicates_txt(&report.duplicates), "duplicate report", formatter)?;
    }

    Ok(report)
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(mut config: ExtractorConfig, args: &TransitionsArgs) -> ExtractorConfig {
    if let Some(percent) = args.percent {
        config.sample_percent = percent;
    }
    if args.oracle {
        config.use_oracle = true;
    }
    if args.no_oracle {
        config.use_oracle = false;
    }
    if let Some(model) = &args.model {
        config.oracle_model_id = Some(model.clone());
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> TransitionsArgs {
        TransitionsArgs {
            file: PathBuf::from("doc.txt"),
            percent: None,
            oracle: false,
            no_oracle: false,
            model: None,
            seed: None,
            output: None,
            duplicates: None,
        }
    }

    #[test]
    fn test_no_flags_keep_config() {
        let config = ExtractorConfig {
            sample_percent: 50,
            use_oracle: true,
            ..ExtractorConfig::default()
        };
        let merged = apply_overrides(config, &args());
        assert_eq!(merged.sample_percent, 50);
        assert!(merged.use_oracle);
    }

    #[test]
    fn test_flags_override_config() {
        let config = ExtractorConfig {
            use_oracle: true,
            ..ExtractorConfig::default()
        };
        let merged = apply_overrides(
            config,
            &TransitionsArgs {
                percent: Some(10),
                no_oracle: true,
                model: Some("mistral".to_string()),
                seed: Some(3),
                ..args()
            },
        );
        assert_eq!(merged.sample_percent, 10);
        assert!(!merged.use_oracle);
        assert_eq!(merged.oracle_model_id.as_deref(), Some("mistral"));
        assert_eq!(merged.seed, Some(3));
    }
}
