//! Ratio-driven summarization: short texts in one call, long texts chunked,
//! summarized chunk by chunk, then optionally re-summarized as a whole.

use serde::Serialize;

use crate::capability::{LengthBounds, SummarizationCapability};
use crate::error::{Result, Stage, WordsmithError};
use crate::text::{DEFAULT_CHUNK_SIZE, chunk_words, word_count};

/// Percentage range accepted for the retention ratio on the command line.
pub const RATIO_PERCENT_RANGE: std::ops::RangeInclusive<u8> = 10..=50;

// (max floor, min floor) per stage, in words
const SHORT_TEXT_FLOORS: (usize, usize) = (100, 50);
const CHUNK_FLOORS: (usize, usize) = (50, 30);
const RECOMBINE_FLOORS: (usize, usize) = (50, 20);

/// Fraction of the original length to keep, in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetRatio(f64);

impl TargetRatio {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(WordsmithError::Validation(format!(
                "Target ratio must be in (0, 1], got {}",
                value
            )))
        }
    }

    /// Ratio from a percentage in `RATIO_PERCENT_RANGE`.
    pub fn from_percent(percent: u8) -> Result<Self> {
        if !RATIO_PERCENT_RANGE.contains(&percent) {
            return Err(WordsmithError::Validation(format!(
                "Summary retention ratio must be between {}% and {}%, got {}%",
                RATIO_PERCENT_RANGE.start(),
                RATIO_PERCENT_RANGE.end(),
                percent
            )));
        }
        Self::new(f64::from(percent) / 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// `floor(words * ratio)`
    fn scale(&self, words: usize) -> usize {
        (words as f64 * self.0).floor() as usize
    }
}

/// Tuning for the orchestrator.
#[derive(Debug, Clone)]
pub struct SummarizerOptions {
    /// Words per chunk on the long-text path
    pub chunk_size: usize,
    /// Texts with at most this many words take the single-call path
    pub short_text_threshold: usize,
    /// Combined chunk summaries need more words than this to be re-summarized
    pub recombine_threshold: usize,
    /// Re-summarize the combined chunk summaries
    pub recombine: bool,
    /// On a failed re-summarization, return the combined summaries instead of an error
    pub keep_combined_on_failure: bool,
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            short_text_threshold: 200,
            recombine_threshold: 50,
            recombine: true,
            keep_combined_on_failure: false,
        }
    }
}

impl SummarizerOptions {
    pub fn with_recombine(mut self, recombine: bool) -> Self {
        self.recombine = recombine;
        self
    }

    pub fn with_keep_combined_on_failure(mut self, keep: bool) -> Self {
        self.keep_combined_on_failure = keep;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPath {
    /// One call on the whole text
    Short,
    /// Chunked, one call per chunk
    Chunked,
}

/// Result of summarizing one chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChunkOutcome {
    Summarized { text: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkSummary {
    pub index: usize,
    pub word_count: usize,
    pub bounds: LengthBounds,
    pub outcome: ChunkOutcome,
}

impl ChunkSummary {
    /// Text contributed to the combined summary; failed chunks leave a marker.
    pub fn text(&self) -> String {
        match &self.outcome {
            ChunkOutcome::Summarized { text } => text.clone(),
            ChunkOutcome::Failed { error } => {
                format!("Error summarizing chunk {}: {}", self.index + 1, error)
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Failed { .. })
    }
}

/// What happened to the combined chunk summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recombination {
    /// Short path; there was nothing to recombine
    NotAttempted,
    /// Turned off by the caller
    Disabled,
    /// Combined summary was already short enough
    Skipped,
    Applied { bounds: LengthBounds },
    /// Re-summarization failed and the combined summaries were returned
    FailedKeptCombined { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub summary: String,
    pub input_words: usize,
    pub path: SummaryPath,
    pub chunks: Vec<ChunkSummary>,
    pub combined_words: Option<usize>,
    pub recombination: Recombination,
}

impl SummaryReport {
    pub fn failed_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_failed()).count()
    }
}

/// Bounds for `words` input words: max scaled by the ratio with a floor, min
/// half of max with its own floor.
fn scaled_bounds(
    words: usize,
    ratio: TargetRatio,
    (max_floor, min_floor): (usize, usize),
) -> LengthBounds {
    let max_words = max_floor.max(ratio.scale(words));
    let min_words = min_floor.max(max_words / 2);
    LengthBounds::new(max_words, min_words)
}

pub fn short_text_bounds(words: usize, ratio: TargetRatio) -> LengthBounds {
    scaled_bounds(words, ratio, SHORT_TEXT_FLOORS)
}

pub fn chunk_bounds(words: usize, ratio: TargetRatio) -> LengthBounds {
    scaled_bounds(words, ratio, CHUNK_FLOORS)
}

/// Recombination bounds; max stays below `combined_words` so the model is
/// never asked for output as long as its input.
pub fn recombine_bounds(combined_words: usize, ratio: TargetRatio) -> LengthBounds {
    let mut bounds = scaled_bounds(combined_words, ratio, RECOMBINE_FLOORS);
    bounds.max_words = bounds.max_words.min(combined_words.saturating_sub(1));
    bounds.min_words = bounds.min_words.min(bounds.max_words);
    bounds
}

/// Summarization orchestrator over an injected capability.
pub struct Summarizer<'a> {
    capability: &'a dyn SummarizationCapability,
    options: SummarizerOptions,
}

impl<'a> Summarizer<'a> {
    pub fn new(capability: &'a dyn SummarizationCapability, options: SummarizerOptions) -> Self {
        Self {
            capability,
            options,
        }
    }

    /// Summarize `text` keeping roughly `ratio` of its length.
    pub async fn summarize(&self, text: &str, ratio: TargetRatio) -> Result<SummaryReport> {
        let input_words = word_count(text);
        if input_words == 0 {
            return Err(WordsmithError::Validation(
                "Please enter text to summarize.".to_string(),
            ));
        }

        log::info!(
            "Input text length: {} words (model: {})",
            input_words,
            self.capability.name()
        );

        if input_words <= self.options.short_text_threshold {
            self.summarize_short(text, input_words, ratio).await
        } else {
            self.summarize_chunked(text, input_words, ratio).await
        }
    }

    async fn summarize_short(
        &self,
        text: &str,
        input_words: usize,
        ratio: TargetRatio,
    ) -> Result<SummaryReport> {
        let bounds = short_text_bounds(input_words, ratio);
        log::debug!(
            "Short text: max_length={}, min_length={}",
            bounds.max_words,
            bounds.min_words
        );

        let summary = self
            .capability
            .summarize(text, bounds)
            .await
            .map_err(|e| WordsmithError::capability(Stage::ShortText, e))?;

        Ok(SummaryReport {
            summary,
            input_words,
            path: SummaryPath::Short,
            chunks: Vec::new(),
            combined_words: None,
            recombination: Recombination::NotAttempted,
        })
    }

    async fn summarize_chunked(
        &self,
        text: &str,
        input_words: usize,
        ratio: TargetRatio,
    ) -> Result<SummaryReport> {
        let chunks = chunk_words(text, self.options.chunk_size);
        log::info!("Number of chunks created: {}", chunks.len());

        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let bounds = chunk_bounds(chunk.word_count, ratio);
            let outcome = match self.capability.summarize(&chunk.text, bounds).await {
                Ok(text) => {
                    log::debug!("Chunk {} summary: {}", chunk.index + 1, text);
                    ChunkOutcome::Summarized { text }
                }
                Err(e) => {
                    log::warn!("Error summarizing chunk {}: {}", chunk.index + 1, e);
                    ChunkOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            summaries.push(ChunkSummary {
                index: chunk.index,
                word_count: chunk.word_count,
                bounds,
                outcome,
            });
        }

        let combined = summaries
            .iter()
            .map(ChunkSummary::text)
            .collect::<Vec<_>>()
            .join(" ");
        let combined_words = word_count(&combined);
        log::info!("Combined summary length: {} words", combined_words);

        let mut report = SummaryReport {
            summary: String::new(),
            input_words,
            path: SummaryPath::Chunked,
            chunks: summaries,
            combined_words: Some(combined_words),
            recombination: Recombination::Skipped,
        };

        if !self.options.recombine {
            log::info!("Re-summarization disabled");
            report.recombination = Recombination::Disabled;
            report.summary = combined;
            return Ok(report);
        }

        if combined_words <= self.options.recombine_threshold {
            log::info!("Skipping re-summarization, combined summary is already concise");
            report.summary = combined;
            return Ok(report);
        }

        let bounds = recombine_bounds(combined_words, ratio);
        log::info!(
            "Re-summarizing combined summary: max_length={}, min_length={}",
            bounds.max_words,
            bounds.min_words
        );

        match self.capability.summarize(&combined, bounds).await {
            Ok(summary) => {
                log::info!("Final summary length: {} words", word_count(&summary));
                report.summary = summary;
                report.recombination = Recombination::Applied { bounds };
                Ok(report)
            }
            Err(e) if self.options.keep_combined_on_failure => {
                log::warn!("Re-summarization failed, keeping combined summary: {}", e);
                report.summary = combined;
                report.recombination = Recombination::FailedKeptCombined {
                    error: e.to_string(),
                };
                Ok(report)
            }
            Err(e) => Err(WordsmithError::capability(Stage::Recombination, e)),
        }
    }
}
