use crate::events::ProgressStatus;
use crate::pipeline::{ItemProcessor, ProcessResult, ProgressNotifier, mirrored_output_path, output_path};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Default read size between `processing` notifications
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "csv", "log", "json", "xml", "html", "css", "js"];

const TOP_WORDS: usize = 10;

/// Counts gathered from one text file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStats {
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
    pub paragraphs: usize,
    pub word_frequency: HashMap<String, usize>,
}

impl TextStats {
    /// Most frequent words, ties broken alphabetically
    pub fn top_words(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut pairs: Vec<(&str, usize)> = self
            .word_frequency
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        pairs.truncate(limit);
        pairs
    }
}

/// Line/word/paragraph analyzer writing a report per input file
pub struct TextProcessor {
    output_dir: PathBuf,
    input_root: Option<PathBuf>,
    chunk_size: usize,
}

impl TextProcessor {
    pub const NAME: &'static str = "text";

    /// Create the processor and its output directory
    pub fn new(output_dir: impl Into<PathBuf>, chunk_size: usize) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;

        Ok(Self {
            output_dir,
            input_root: None,
            chunk_size: chunk_size.max(1),
        })
    }

    /// Mirror each input's directory below `root` inside the output directory
    pub fn with_input_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.input_root = Some(root.into());
        self
    }

    fn report_path(&self, input: &Path) -> PathBuf {
        match &self.input_root {
            Some(root) => mirrored_output_path(&self.output_dir, root, input, "_analysis"),
            None => output_path(&self.output_dir, input, "_analysis"),
        }
    }

    pub fn analyze(content: &str) -> TextStats {
        let mut stats = TextStats {
            characters: content.len(),
            ..Default::default()
        };
        let mut in_paragraph = false;

        for line in content.lines() {
            stats.lines += 1;

            if line.is_empty() {
                if in_paragraph {
                    stats.paragraphs += 1;
                    in_paragraph = false;
                }
                continue;
            }

            in_paragraph = true;
            for word in tokenize(line) {
                stats.words += 1;
                *stats.word_frequency.entry(word.to_lowercase()).or_insert(0) += 1;
            }
        }

        if in_paragraph {
            stats.paragraphs += 1;
        }
        stats
    }

    /// Read in `chunk_size` pieces, publishing progress after each full chunk
    fn read_chunked(&self, path: &Path, progress: &ProgressNotifier<'_>) -> Result<Vec<u8>> {
        let file = File::open(path).with_context(|| format!("Cannot open file: {}", path.display()))?;
        let total = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut content = Vec::with_capacity(total as usize);
        let mut processed = 0u64;

        loop {
            let read = (&mut reader)
                .take(self.chunk_size as u64)
                .read_to_end(&mut content)
                .with_context(|| format!("Read failed: {}", path.display()))?;
            if read == 0 {
                break;
            }

            processed += read as u64;
            if read == self.chunk_size {
                progress.notify_progress(path, processed, total, ProgressStatus::Processing);
            }
        }

        Ok(content)
    }

    fn write_report(&self, output: &Path, stats: &TextStats) -> Result<()> {
        let mut report = String::new();
        writeln!(report, "Text Analysis Report")?;
        writeln!(report, "===================")?;
        writeln!(report)?;
        writeln!(report, "Statistics:")?;
        writeln!(report, "  Lines: {}", stats.lines)?;
        writeln!(report, "  Words: {}", stats.words)?;
        writeln!(report, "  Characters: {}", stats.characters)?;
        writeln!(report, "  Paragraphs: {}", stats.paragraphs)?;
        writeln!(report)?;
        writeln!(report, "Top {TOP_WORDS} Most Frequent Words:")?;
        for (rank, (word, count)) in stats.top_words(TOP_WORDS).into_iter().enumerate() {
            writeln!(report, "  {}. {} ({} times)", rank + 1, word, count)?;
        }

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create report directory {}", parent.display()))?;
        }
        std::fs::write(output, report)
            .with_context(|| format!("Cannot create analysis report: {}", output.display()))
    }
}

impl ItemProcessor for TextProcessor {
    fn process_item(&self, path: &Path, progress: &ProgressNotifier<'_>) -> Result<ProcessResult> {
        let content = self.read_chunked(path, progress)?;
        let text = String::from_utf8_lossy(&content);
        let stats = Self::analyze(&text);

        let output = self.report_path(path);
        self.write_report(&output, &stats)?;

        Ok(ProcessResult::success("Text processing completed")
            .with_metadata("lines", stats.lines)
            .with_metadata("words", stats.words)
            .with_metadata("characters", stats.characters)
            .with_metadata("paragraphs", stats.paragraphs)
            .with_metadata("output_file", output.display()))
    }

    fn can_process(&self, extension: &str) -> bool {
        SUPPORTED_EXTENSIONS.contains(&extension)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !is_word_char(c)).filter(|w| !w.is_empty())
}
