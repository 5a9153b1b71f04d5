// src/cli/score.rs — `burnish score`

use crate::cli::ScoreArgs;
use crate::evaluator::HeuristicScorer;

pub fn run(args: ScoreArgs) -> anyhow::Result<()> {
    let text = super::read_input(args.file.as_ref())?;
    let breakdown = HeuristicScorer::new().breakdown(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!("quality            {:.3}", breakdown.composite);
    println!("  coherence        {:.3}  (weight 0.35)", breakdown.coherence);
    println!(
        "  sentence length  {:.3}  (avg {:.1} words, weight 0.25)",
        breakdown.sentence_score, breakdown.avg_sentence_len
    );
    println!("  vocabulary       {:.3}  (weight 0.20)", breakdown.vocabulary);
    println!("  structure        {:.3}  (weight 0.20)", breakdown.structure);
    Ok(())
}
