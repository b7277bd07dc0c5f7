//! Fewshots command implementation.

use super::{build_extractor, write_output};
use crate::cli::FewshotsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use segue_extractor::{fewshots_json, fine_tune_jsonl, ExtractorConfig, TripleReport};
use tracing::info;

/// Execute the fewshots command.
pub fn execute_fewshots(
    args: FewshotsArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<TripleReport> {
    let extractor_config = apply_overrides(config.extractor.clone(), &args);
    let system_instruction = extractor_config.system_instruction.clone();
    let extractor = build_extractor(extractor_config, config, formatter)?;

    info!("Reading {}", args.file.display());
    let paragraphs = segue_loader::load_file(&args.file)?;
    let report = extractor.extract_triples(&paragraphs)?;

    println!("{}", formatter.format_triples(&report)?);

    if let Some(path) = &args.json {
        write_output(path, &fewshots_json(&report.triples)?, "few-shot examples", formatter)?;
    }
    if let Some(path) = &args.jsonl {
        let records = fine_tune_jsonl(&report.triples, Some(system_instruction.as_str()))?;
        write_output(path, &records, "fine-tuning records", formatter)?;
    }

    Ok(report)
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(mut config: ExtractorConfig, args: &FewshotsArgs) -> ExtractorConfig {
    if let Some(variant) = args.variant {
        config.detection_variant = variant.into();
    }
    if let Some(strategy) = args.strategy {
        config.strategy = Some(strategy.into());
    }
    if let Some(cap) = args.usage_cap {
        config.usage_cap = cap;
    }
    if let Some(threshold) = args.threshold {
        config.similarity_threshold = threshold;
    }
    if args.max_triples.is_some() {
        config.max_triples = args.max_triples;
    }
    if args.limit.is_some() {
        config.limit_total = args.limit;
    }
    if args.oracle {
        config.use_oracle = true;
    }
    if let Some(model) = &args.model {
        config.oracle_model_id = Some(model.clone());
    }
    config
}
