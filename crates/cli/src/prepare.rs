use anyhow::{Context, Result};
use ingest::{count_file, RecordReader};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;
use transcript::{Language, NegativeSampler, TranscriptBuilder};

use crate::config::PrepareConfig;
use crate::metrics::{RunStats, StatsSnapshot};

/// Convert every record of `input` into one transcript line of `output`.
///
/// With negative sampling on, `input` is read twice: once to count entity
/// types, once to convert.
pub async fn run(
    input: &Path,
    output: &Path,
    language: Language,
    config: &PrepareConfig,
) -> Result<StatsSnapshot> {
    let prompts = language.prompts();

    let table = if config.negative_sampling {
        Some(
            count_file(input, config.top_k)
                .await
                .context("Failed to count entity types")?,
        )
    } else {
        None
    };

    let mut builder = TranscriptBuilder::new(&prompts).on_exhausted(config.on_exhausted);
    if let Some(table) = &table {
        builder = builder.with_negative_sampling(NegativeSampler::new(table, config.negative_probability)?);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut reader = RecordReader::open(input).await?;
    let file = File::create(output)
        .await
        .with_context(|| format!("Failed to create output file: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    let stats = RunStats::new();

    info!(
        input = ?input,
        output = ?output,
        language = %language,
        negative_sampling = config.negative_sampling,
        "Converting records"
    );

    while let Some(record) = reader.next_record().await? {
        let (transcript, outcome) = builder
            .convert_with_outcome(&record, &mut rng)
            .with_context(|| format!("Failed to convert record on line {}", reader.line_no()))?;

        let mut line = transcript.to_json_line()?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;

        stats.record(record.entities.len(), transcript.len(), &outcome);
        if config.progress_every > 0 && stats.records() % config.progress_every == 0 {
            info!(records = stats.records(), "Progress");
        }
    }

    writer.flush().await?;

    let snapshot = stats.snapshot();
    info!(
        records = snapshot.records,
        turns = snapshot.turns,
        negatives_added = snapshot.negatives_added,
        negatives_skipped = snapshot.negatives_skipped,
        negative_rate = snapshot.negative_rate,
        elapsed_ms = snapshot.elapsed_ms,
        "Conversion finished"
    );

    Ok(snapshot)
}
