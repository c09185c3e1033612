//! `fieldlearn learn` command handler

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use fieldlearn_core::config::FieldLearnConfig;
use fieldlearn_core::types::ExtractionResult;
use fieldlearn_learner::{FieldLearner, LearnerConfig};

use crate::cli::LearnArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `learn` command.
///
/// Reads the events file (one event per line, blank lines skipped), applies
/// flag overrides on top of the `[learner]` config section and renders the
/// learned rules.
///
/// # Errors
///
/// Returns `CliError::Io` if the events file cannot be read,
/// `CliError::Config` if the overrides are invalid and
/// `CliError::Convergence` if the examples are too ambiguous.
pub async fn execute(
    args: LearnArgs,
    config: &FieldLearnConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let events = read_events(&args.events).await?;
    let learner_config = learner_config(&args, config)?;

    let examples: BTreeSet<String> = args.examples.into_iter().collect();
    let counter_examples: BTreeSet<String> = args.counter_examples.into_iter().collect();

    info!(
        path = %args.events.display(),
        events = events.len(),
        examples = examples.len(),
        counter_examples = counter_examples.len(),
        "learning field rules"
    );

    let result = FieldLearner::new(learner_config).learn(&events, &examples, &counter_examples)?;

    let report = LearnReport::new(
        args.events.display().to_string(),
        events.len(),
        &examples,
        &counter_examples,
        result,
    );
    writer.render(&report)?;

    Ok(())
}

/// Read non-empty lines of an events file.
async fn read_events(path: &Path) -> Result<Vec<String>, CliError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_events(&content))
}

fn parse_events(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_owned)
        .collect()
}

/// Build the engine configuration: config file section, then flag overrides.
fn learner_config(args: &LearnArgs, config: &FieldLearnConfig) -> Result<LearnerConfig, CliError> {
    let mut learner_config = LearnerConfig::from_core(&config.learner);
    if args.all_rules {
        learner_config.just_top_rule = false;
    }
    if let Some(n) = args.max_iterations {
        learner_config.max_iterations = n;
    }
    if let Some(n) = args.max_rules {
        learner_config.max_rules = n;
    }
    learner_config.validate()?;
    Ok(learner_config)
}

/// Learned rules report.
#[derive(Debug, Serialize)]
pub struct LearnReport {
    /// Events file path
    pub source: String,
    /// Number of events read
    pub events: usize,
    /// Example values given on the command line
    pub examples: Vec<String>,
    /// Counter-example values given on the command line
    pub counter_examples: Vec<String>,
    /// Learned rules, best first
    pub rules: Vec<RuleReport>,
}

/// One learned rule with the values it extracts.
#[derive(Debug, Serialize)]
pub struct RuleReport {
    pub index: usize,
    pub pattern: String,
    pub values: Vec<String>,
}

impl LearnReport {
    fn new(
        source: String,
        events: usize,
        examples: &BTreeSet<String>,
        counter_examples: &BTreeSet<String>,
        result: ExtractionResult,
    ) -> Self {
        let rules = result
            .patterns
            .iter()
            .enumerate()
            .map(|(index, pattern)| RuleReport {
                index,
                pattern: pattern.clone(),
                values: result
                    .extractions
                    .iter()
                    .filter(|(_, indices)| indices.contains(&index))
                    .map(|(value, _)| value.clone())
                    .collect(),
            })
            .collect();

        Self {
            source,
            events,
            examples: examples.iter().cloned().collect(),
            counter_examples: counter_examples.iter().cloned().collect(),
            rules,
        }
    }
}

impl Render for LearnReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Learned Rules: {} ({} events)",
            self.source.bold(),
            self.events
        )?;
        writeln!(w, "  Examples: {}", self.examples.join(", "))?;
        if !self.counter_examples.is_empty() {
            writeln!(w, "  Counter-examples: {}", self.counter_examples.join(", "))?;
        }
        writeln!(w)?;

        if self.rules.is_empty() {
            writeln!(w, "  {}", "No rule extracts the examples.".yellow())?;
            return Ok(());
        }

        for rule in &self.rules {
            writeln!(w, "  [{}] {}", rule.index, rule.pattern.green().bold())?;
            writeln!(w, "      values: {}", rule.values.join(", "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;

    fn args() -> LearnArgs {
        LearnArgs {
            events: PathBuf::from("events.log"),
            examples: vec!["200".to_owned()],
            counter_examples: Vec::new(),
            all_rules: false,
            max_iterations: None,
            max_rules: None,
        }
    }

    #[test]
    fn test_parse_events_skips_blank_lines() {
        let events = parse_events("a=1\n\n   \nb=2\r\n");
        assert_eq!(events, vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_learner_config_uses_file_section() {
        let mut config = FieldLearnConfig::default();
        config.learner.max_rules = 7;
        let learner_config = learner_config(&args(), &config).unwrap();
        assert_eq!(learner_config.max_rules, 7);
        assert!(learner_config.just_top_rule);
    }

    #[test]
    fn test_learner_config_flags_override_file() {
        let mut a = args();
        a.all_rules = true;
        a.max_iterations = Some(3);
        a.max_rules = Some(10);
        let learner_config = learner_config(&a, &FieldLearnConfig::default()).unwrap();
        assert!(!learner_config.just_top_rule);
        assert_eq!(learner_config.max_iterations, 3);
        assert_eq!(learner_config.max_rules, 10);
    }

    #[test]
    fn test_learner_config_rejects_zero_iterations() {
        let mut a = args();
        a.max_iterations = Some(0);
        let err = learner_config(&a, &FieldLearnConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    fn sample_report() -> LearnReport {
        let result = ExtractionResult {
            patterns: vec![
                r"status=(?P<FIELDNAME>\d+)\s".to_owned(),
                r"=(?P<FIELDNAME>\d+)\s+".to_owned(),
            ],
            extractions: BTreeMap::from([
                ("200".to_owned(), BTreeSet::from([0, 1])),
                ("404".to_owned(), BTreeSet::from([0])),
            ]),
        };
        LearnReport::new(
            "events.log".to_owned(),
            2,
            &BTreeSet::from(["200".to_owned(), "404".to_owned()]),
            &BTreeSet::new(),
            result,
        )
    }

    #[test]
    fn test_report_groups_values_by_rule() {
        let report = sample_report();
        assert_eq!(report.rules.len(), 2);
        assert_eq!(report.rules[0].values, vec!["200", "404"]);
        assert_eq!(report.rules[1].values, vec!["200"]);
    }

    #[test]
    fn test_report_render_text() {
        let mut buffer = Vec::new();
        sample_report()
            .render_text(&mut buffer)
            .expect("rendering should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("events.log"));
        assert!(output.contains("Examples: 200, 404"));
        assert!(output.contains(r"status=(?P<FIELDNAME>\d+)\s"));
        assert!(!output.contains("Counter-examples"));
    }

    #[test]
    fn test_report_render_text_empty() {
        let report = LearnReport::new(
            "events.log".to_owned(),
            0,
            &BTreeSet::from(["x".to_owned()]),
            &BTreeSet::from(["y".to_owned()]),
            ExtractionResult::default(),
        );
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("Counter-examples: y"));
        assert!(output.contains("No rule extracts the examples."));
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(sample_report()).expect("should serialize");
        assert_eq!(json["events"], 2);
        assert_eq!(json["rules"][0]["index"], 0);
        assert_eq!(json["rules"][0]["pattern"], r"status=(?P<FIELDNAME>\d+)\s");
    }
}
