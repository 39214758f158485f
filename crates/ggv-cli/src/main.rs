//! `ggv` - verify critical-pair experiments and compare their warnings

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ggv_core::{
    compare_warnings, read_json, ExperimentInput, Verifier, VerifierConfig, VerifyAnalysis,
    VerifySummary,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// File name of the per-verifier aggregate in the output directory
const SUMMARY_FILE: &str = "_summary.json";

fn cli() -> Command {
    Command::new("ggv")
        .version(ggv_core::VERSION)
        .about("Graph-grammar verifier over critical-pair analyses")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("verify")
                .about("Run a verifier over one or more experiments")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Verifier configuration (.toml, .yaml, .yml or .json)"),
                )
                .arg(
                    Arg::new("experiment")
                        .long("experiment")
                        .short('e')
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(PathBuf))
                        .help("Experiment JSON file, repeatable"),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write one analysis per experiment and a summary here"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print JSON"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare the extra warnings of two analyses")
                .arg(
                    Arg::new("from")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Analysis JSON compared from"),
                )
                .arg(
                    Arg::new("to")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Analysis JSON compared to"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print JSON"),
                ),
        )
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli().get_matches()) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    match matches.subcommand() {
        Some(("verify", args)) => {
            let config = args
                .get_one::<PathBuf>("config")
                .context("missing --config")?;
            let experiments: Vec<&PathBuf> = args
                .get_many::<PathBuf>("experiment")
                .context("missing --experiment")?
                .collect();
            let output_dir = args.get_one::<PathBuf>("output-dir");
            let pretty = args.get_flag("pretty");

            let outcome = verify(config, &experiments)?;
            match output_dir {
                Some(dir) => write_outputs(dir, &outcome, pretty)?,
                None => {
                    for analysis in &outcome.analyses {
                        println!("{}", to_json(analysis, pretty)?);
                    }
                }
            }
            Ok(ExitCode::from(outcome.status()))
        }
        Some(("compare", args)) => {
            let from = args.get_one::<PathBuf>("from").context("missing <from>")?;
            let to = args.get_one::<PathBuf>("to").context("missing <to>")?;
            let pretty = args.get_flag("pretty");

            let from: VerifyAnalysis =
                read_json(from).with_context(|| format!("reading {}", from.display()))?;
            let to: VerifyAnalysis =
                read_json(to).with_context(|| format!("reading {}", to.display()))?;

            println!("{}", to_json(&compare_warnings(&from, &to), pretty)?);
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

/// Analyses of one verifier run plus the experiments that could not be analyzed
struct VerifyOutcome {
    summary: VerifySummary,
    analyses: Vec<VerifyAnalysis>,
    failed: Vec<PathBuf>,
}

impl VerifyOutcome {
    /// 0 when every main requirement held, 1 when one failed, 2 when an
    /// experiment could not be analyzed
    fn status(&self) -> u8 {
        if !self.failed.is_empty() {
            2
        } else if self.analyses.iter().all(VerifyAnalysis::passed) {
            0
        } else {
            1
        }
    }
}

/// Verify every experiment; one experiment failing does not stop the others
fn verify(config: &Path, experiments: &[&PathBuf]) -> Result<VerifyOutcome> {
    let config = VerifierConfig::from_path(config)
        .with_context(|| format!("loading verifier configuration {}", config.display()))?;
    let verifier = Verifier::new(config).context("compiling verifier patterns")?;

    let mut outcome = VerifyOutcome {
        summary: VerifySummary::new(verifier.name()),
        analyses: Vec::new(),
        failed: Vec::new(),
    };

    for path in experiments {
        let analysis = verify_one(&verifier, path).and_then(|analysis| {
            if outcome.summary.experiments.contains_key(&analysis.experiment) {
                bail!("experiment name '{}' is already taken", analysis.experiment);
            }
            Ok(analysis)
        });
        match analysis {
            Ok(analysis) => {
                outcome.summary.add(&analysis);
                outcome.analyses.push(analysis);
            }
            Err(err) => {
                tracing::error!("{}: {:#}", path.display(), err);
                outcome.failed.push((*path).clone());
            }
        }
    }

    tracing::info!(
        "Verifier '{}': {} of {} experiments passed, {} could not be analyzed",
        verifier.name(),
        outcome.summary.passed(),
        outcome.analyses.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}

fn verify_one(verifier: &Verifier, path: &Path) -> Result<VerifyAnalysis> {
    let mut input: ExperimentInput =
        read_json(path).with_context(|| format!("reading experiment {}", path.display()))?;
    if input.name.is_empty() {
        input.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    check_name(&input.name)?;
    Ok(verifier.verify_input(&input)?)
}

/// Experiment names become file names in the output directory
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        bail!("experiment name '{name}' cannot be used as a file name");
    }
    if format!("{name}.json") == SUMMARY_FILE {
        bail!("experiment name '{name}' is reserved");
    }
    Ok(())
}

fn write_outputs(dir: &Path, outcome: &VerifyOutcome, pretty: bool) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    for analysis in &outcome.analyses {
        let path = dir.join(format!("{}.json", analysis.experiment));
        std::fs::write(&path, to_json(analysis, pretty)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let path = dir.join(SUMMARY_FILE);
    std::fs::write(&path, to_json(&outcome.summary, pretty)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {} analyses to {}", outcome.analyses.len(), dir.display());
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
name = "rest"

[[patterns]]
name = "mock"
regex = "mock_.*"
mock = true

[[patterns]]
name = "GET"
regex = ".*"
"#;

    fn experiment(enabled_by_mock: bool) -> String {
        let fetch_row = if enabled_by_mock {
            r#"{"fetch": 1}"#
        } else {
            "{}"
        };
        format!(
            r#"{{
                "grammar": {{"rules": [{{"name": "mock_login"}}, {{"name": "fetch"}}]}},
                "criticalPairs": [
                    {{"type": "PRODUCE_USE_DEPENDENCY", "pairs": {{"mock_login": {fetch_row}, "fetch": {{}}}}}},
                    {{"type": "PRODUCE_FORBID_CONFLICT", "pairs": {{"mock_login": {{}}, "fetch": {{}}}}}}
                ]
            }}"#
        )
    }

    fn setup() -> (TempDir, PathBuf, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("rest.toml");
        std::fs::write(&config, CONFIG).unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, experiment(false)).unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, experiment(true)).unwrap();
        (dir, config, good, bad)
    }

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn verify_names_experiments_after_files() {
        let (_dir, config, good, bad) = setup();
        let outcome = verify(&config, &[&good, &bad]).unwrap();

        let names: Vec<&str> = outcome.analyses.iter().map(|a| a.experiment.as_str()).collect();
        assert_eq!(names, vec!["good", "bad"]);
        assert!(outcome.analyses[0].passed());
        assert!(!outcome.analyses[1].passed());
        assert_eq!(outcome.status(), 1);
    }

    #[test]
    fn unreadable_experiment_does_not_stop_others() {
        let (dir, config, good, _) = setup();
        let missing = dir.path().join("missing.json");
        let outcome = verify(&config, &[&missing, &good]).unwrap();

        assert_eq!(outcome.analyses.len(), 1);
        assert_eq!(outcome.failed, vec![missing]);
        assert_eq!(outcome.status(), 2);
    }

    #[test]
    fn output_dir_gets_analyses_and_summary() {
        let (dir, config, good, bad) = setup();
        let outcome = verify(&config, &[&good, &bad]).unwrap();
        let out = dir.path().join("out");
        write_outputs(&out, &outcome, true).unwrap();

        assert!(out.join("good.json").exists());
        assert!(out.join("bad.json").exists());
        let summary: VerifySummary = read_json(out.join(SUMMARY_FILE)).unwrap();
        assert_eq!(summary.verifier, "rest");
        assert_eq!(summary.passed(), 1);

        let reloaded: VerifyAnalysis = read_json(out.join("good.json")).unwrap();
        assert_eq!(reloaded, outcome.analyses[0]);
    }

    fn write_named(dir: &Path, file: &str, name: &str, enabled_by_mock: bool) -> PathBuf {
        let mut value: serde_json::Value =
            serde_json::from_str(&experiment(enabled_by_mock)).unwrap();
        value["name"] = serde_json::json!(name);
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(file);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn duplicate_names_fail_instead_of_overwriting() {
        let (dir, config, _, _) = setup();
        let first = write_named(&dir.path().join("a"), "x.json", "same", false);
        let second = write_named(&dir.path().join("b"), "x.json", "same", true);

        let outcome = verify(&config, &[&first, &second]).unwrap();
        assert_eq!(outcome.analyses.len(), 1);
        assert!(outcome.analyses[0].passed());
        assert_eq!(outcome.failed, vec![second]);
        assert_eq!(outcome.summary.passed(), 1);
        assert_eq!(outcome.status(), 2);
    }

    #[test]
    fn duplicate_file_stems_fail() {
        let (dir, config, good, _) = setup();
        let other = dir.path().join("nested");
        std::fs::create_dir_all(&other).unwrap();
        let twin = other.join("good.json");
        std::fs::write(&twin, experiment(true)).unwrap();

        let outcome = verify(&config, &[&good, &twin]).unwrap();
        assert_eq!(outcome.analyses.len(), 1);
        assert_eq!(outcome.failed, vec![twin]);
        assert_eq!(outcome.status(), 2);
    }

    #[test]
    fn names_that_leave_the_output_dir_are_rejected() {
        let (dir, config, good, _) = setup();
        let escape = write_named(dir.path(), "escape.json", "../escape", false);
        let summary = write_named(dir.path(), "summary.json", "_summary", false);

        let outcome = verify(&config, &[&escape, &summary, &good]).unwrap();
        assert_eq!(outcome.failed, vec![escape, summary]);
        assert_eq!(outcome.status(), 2);

        let out = dir.path().join("out");
        write_outputs(&out, &outcome, false).unwrap();
        let mut files: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        assert_eq!(files, vec!["_summary.json", "good.json"]);
    }

    #[test]
    fn check_name_accepts_plain_names() {
        assert!(check_name("users-v1").is_ok());
        assert!(check_name("").is_err());
        assert!(check_name("..").is_err());
        assert!(check_name("a\\b").is_err());
    }

    #[test]
    fn verify_args_parse() {
        let matches = cli()
            .try_get_matches_from([
                "ggv", "verify", "--config", "c.toml", "-e", "a.json", "-e", "b.json", "--pretty",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "verify");
        assert_eq!(args.get_many::<PathBuf>("experiment").unwrap().count(), 2);
        assert!(args.get_flag("pretty"));
    }
}
