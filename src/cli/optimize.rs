// src/cli/optimize.rs — `burnish optimize`

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::OptimizeArgs;
use crate::core::types::{EngineEvent, Mode, OptimizeOptions, ParameterOverrides};
use crate::core::Optimizer;
use crate::infra::config::Config;
use crate::rewrite::{CommandRewriter, Rewriter, TimeoutRewriter};
use crate::strategy::registry::StrategyRegistry;

pub async fn run(args: OptimizeArgs, config: &Config) -> anyhow::Result<()> {
    let text = super::read_input(args.file.as_ref())?;
    let mode = Mode::from_str(&args.mode)?;

    let command = CommandRewriter::new(&args.rewrite_cmd)?;
    let rewriter: Arc<dyn Rewriter> = Arc::new(TimeoutRewriter::new(
        Arc::new(command),
        Duration::from_millis(config.engine.rewrite_timeout_ms),
    ));

    let mut engine = Optimizer::new(Arc::new(StrategyRegistry::with_builtins()), rewriter)
        .with_mode(mode)
        .with_status_interval(Duration::from_millis(config.engine.status_interval_ms));

    if !args.quiet {
        engine = engine.with_events(print_progress);
    }

    let parameters = merge_overrides(
        config.modes.get(mode.as_str()).map(Into::into),
        cli_overrides(&args),
    );

    let mut metadata = serde_json::Map::new();
    if args.seo {
        metadata.insert("seo".into(), serde_json::json!(true));
    }

    let options = OptimizeOptions {
        query: args.query.clone(),
        mode: Some(mode),
        parameters: Some(parameters),
        metadata,
    };

    let result = engine.optimize(&text, options).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print!("{}", result.final_text);
    if !args.quiet {
        eprintln!(
            "\n{} iteration(s), {:.3} -> {:.3} ({:+.1}%), stopped: {}, {}ms",
            result.iterations,
            result.initial_quality(),
            result.final_quality(),
            result.percent_improvement,
            result.stop_reason,
            result.processing_time_ms
        );
        for err in &result.metadata.errors {
            eprintln!("warning: {} failed: {}", err.strategy_id, err.message);
        }
    }
    Ok(())
}

fn cli_overrides(args: &OptimizeArgs) -> ParameterOverrides {
    ParameterOverrides {
        max_iterations: args.max_iterations,
        quality_threshold: args.quality,
        convergence_limit: None,
        time_limit_ms: args.time_limit_ms,
        parallel_strategies: args.parallel.then_some(true),
    }
}

/// Layer CLI flags over config-file overrides; flags win.
fn merge_overrides(
    config: Option<ParameterOverrides>,
    flags: ParameterOverrides,
) -> ParameterOverrides {
    let base = config.unwrap_or_default();
    ParameterOverrides {
        max_iterations: flags.max_iterations.or(base.max_iterations),
        quality_threshold: flags.quality_threshold.or(base.quality_threshold),
        convergence_limit: flags.convergence_limit.or(base.convergence_limit),
        time_limit_ms: flags.time_limit_ms.or(base.time_limit_ms),
        parallel_strategies: flags.parallel_strategies.or(base.parallel_strategies),
    }
}

fn print_progress(event: EngineEvent) {
    match event {
        EngineEvent::Status(s) => {
            if let Some(name) = s.current_strategy {
                eprintln!("[{:>3.0}%] {}", s.progress * 100.0, name);
            }
        }
        EngineEvent::StrategyApplied { strategy_name, .. } => {
            eprintln!("  applied: {strategy_name}");
        }
        EngineEvent::IterationComplete {
            iteration,
            improvement,
            quality,
            ..
        } => {
            eprintln!("  iteration {iteration}: quality {quality:.3} ({improvement:+.3})");
        }
        EngineEvent::Complete(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> OptimizeArgs {
        OptimizeArgs {
            file: None,
            rewrite_cmd: "cat".into(),
            mode: "standard".into(),
            query: None,
            max_iterations: Some(2),
            quality: None,
            time_limit_ms: None,
            parallel: false,
            seo: false,
            json: false,
            quiet: true,
        }
    }

    #[test]
    fn test_cli_overrides_only_set_fields() {
        let o = cli_overrides(&args());
        assert_eq!(o.max_iterations, Some(2));
        assert!(o.quality_threshold.is_none());
        assert!(o.parallel_strategies.is_none());
    }

    #[test]
    fn test_flags_win_over_config() {
        let config = ParameterOverrides {
            max_iterations: Some(9),
            time_limit_ms: Some(1000),
            ..Default::default()
        };
        let merged = merge_overrides(Some(config), cli_overrides(&args()));
        assert_eq!(merged.max_iterations, Some(2));
        assert_eq!(merged.time_limit_ms, Some(1000));
    }
}
