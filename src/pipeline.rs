//! One batch run: raw skill table -> transferability matrix on disk

use std::time::Instant;

use tracing::{info, info_span};

use crate::{
    aggregate::{aggregate, OccupationDocument},
    config::{PipelineConfig, TfWeighting},
    error::Result,
    input::SkillTable,
    matrix_io::{stage_matrix, stage_table},
    record::SkillRecord,
    similarity::{SimilarityMatrix, SimilarityOptions},
    tagging::AiTagger,
    vectorizer::{
        tfidf::{DefaultTFIDFEngine, SublinearTFIDFEngine},
        token::Tokenizer,
        FittedCorpus, TFIDFVectorizer,
    },
};

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub records: usize,
    pub occupations: usize,
    pub vocabulary: usize,
    /// occupations left out for having no usable token
    pub skipped: usize,
}

/// Documents -> vectors, honoring the configured weighting
pub fn vectorize(docs: &[OccupationDocument], config: &PipelineConfig) -> Result<FittedCorpus> {
    let tokenizer = Tokenizer::new(config.min_token_len).with_stopwords(&config.stopwords);
    match config.tf_weighting {
        TfWeighting::Raw => TFIDFVectorizer::<DefaultTFIDFEngine>::new(tokenizer).fit(docs),
        TfWeighting::Sublinear => TFIDFVectorizer::<SublinearTFIDFEngine>::new(tokenizer).fit(docs),
    }
}

/// Records -> matrix, all in memory
pub fn build_matrix(records: &[SkillRecord], config: &PipelineConfig) -> Result<(SimilarityMatrix, PipelineReport)> {
    let docs = aggregate(records);
    let fitted = vectorize(&docs, config)?;
    let options = SimilarityOptions {
        parallel: config.parallel,
        epsilon: config.epsilon,
    };
    let matrix = SimilarityMatrix::compute(&fitted, &options)?;
    let report = PipelineReport {
        records: records.len(),
        occupations: matrix.len(),
        vocabulary: fitted.vocabulary.len(),
        skipped: docs.len() - fitted.len(),
    };
    Ok((matrix, report))
}

/// Full batch run.
///
/// Every artifact is staged before any is committed, so a failed run
/// leaves the previous matrix and tagged table as they were.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    let _span = info_span!("pipeline", input = %config.input.display()).entered();
    let start = Instant::now();

    let table = SkillTable::read(&config.input)?;
    let records = table.records()?;
    let tagged = match &config.tagged_output {
        Some(_) => Some(AiTagger::new(&config.ai_keywords).tag_table(&table)?),
        None => None,
    };
    let load_done = Instant::now();

    let (matrix, report) = build_matrix(&records, config)?;
    let build_done = Instant::now();

    let staged_matrix = stage_matrix(&config.output, &matrix)?;
    let staged_table = match (&config.tagged_output, &tagged) {
        (Some(path), Some(tagged)) => Some(stage_table(path, tagged)?),
        _ => None,
    };
    if let Some(staged) = staged_table {
        staged.commit()?;
    }
    staged_matrix.commit()?;

    info!(
        records = report.records,
        occupations = report.occupations,
        vocabulary = report.vocabulary,
        skipped = report.skipped,
        load_ms = load_done.duration_since(start).as_secs_f64() * 1000.0,
        build_ms = build_done.duration_since(load_done).as_secs_f64() * 1000.0,
        total_ms = start.elapsed().as_secs_f64() * 1000.0,
        "pipeline finished"
    );
    Ok(report)
}
