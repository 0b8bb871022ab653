//! MD log ingest.
//!
//! Turns Amber-style `md.out` step reports into an ordered list of
//! `(time, density)` samples.
//!
//! A step block looks like:
//!
//! ```text
//!  NSTEP =     5000   TIME(PS) =    1010.000  TEMP(K) =   300.42  PRESS =   -33.1
//!  ...
//!  EKCMT  =      7046.1221  VIRIAL  =      7250.9434  VOLUME     =    229381.5470
//!                                                     Density    =         1.0155
//! ```
//!
//! Parsing rules:
//! - a TIME line opens a block; the next Density line closes it into a `Sample`
//! - lines that break this pairing are dropped and counted, never misaligned
//! - the first `A V E R A G E` line ends the scan (summary blocks follow it)
//! - a log without the marker yields whatever was collected before EOF

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use regex::Regex;

use crate::domain::{Dataset, LogSummary, Sample};
use crate::error::AppError;

/// Literal marker that starts the averages section of an MD log.
pub const END_MARKER: &str = "A V E R A G E";

/// Result of scanning a single log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub samples: Vec<Sample>,
    pub time_lines: usize,
    pub density_lines: usize,
    /// TIME lines with no Density line before the next TIME line (or EOF).
    pub unpaired_times: usize,
    /// Density lines with no open TIME block.
    pub unpaired_densities: usize,
    pub reached_end_marker: bool,
}

/// Compiled line patterns for MD step reports.
#[derive(Debug, Clone)]
pub struct MdLogParser {
    time_re: Regex,
    density_re: Regex,
}

impl MdLogParser {
    pub fn new() -> Result<Self, AppError> {
        let time_re = Regex::new(r"TIME.*\s(\d+\.\d+)\s+TEMP")
            .map_err(|e| AppError::new(2, format!("Invalid TIME pattern: {e}")))?;
        let density_re = Regex::new(r"Density.*?(\d+\.\d+)")
            .map_err(|e| AppError::new(2, format!("Invalid Density pattern: {e}")))?;
        Ok(Self { time_re, density_re })
    }

    /// Time value reported on a TIME line, if any.
    pub fn match_time(&self, line: &str) -> Option<f64> {
        capture_float(&self.time_re, line)
    }

    /// Density value reported on a Density line, if any.
    pub fn match_density(&self, line: &str) -> Option<f64> {
        capture_float(&self.density_re, line)
    }

    /// Parse an in-memory log.
    pub fn parse_str(&self, text: &str) -> ParsedLog {
        let mut blocks = BlockAssembler::default();
        for line in text.lines() {
            if blocks.feed(self, line) {
                break;
            }
        }
        blocks.finish()
    }

    /// Parse a log from any buffered reader. `source` is only used in errors.
    pub fn parse_reader<R: BufRead>(&self, reader: R, source: &Path) -> Result<ParsedLog, AppError> {
        let mut blocks = BlockAssembler::default();
        for line in reader.lines() {
            let line = line.map_err(|e| AppError::io("read MD log", source, e))?;
            if blocks.feed(self, &line) {
                break;
            }
        }
        Ok(blocks.finish())
    }

    /// Open and parse a log file.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedLog, AppError> {
        let file = File::open(path).map_err(|e| AppError::io("open MD log", path, e))?;
        self.parse_reader(BufReader::new(file), path)
    }
}

fn capture_float(re: &Regex, line: &str) -> Option<f64> {
    let caps = re.captures(line)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

/// Pairs TIME and Density lines into samples as lines stream by.
#[derive(Debug, Default)]
struct BlockAssembler {
    out: ParsedLog,
    pending_time: Option<f64>,
}

impl BlockAssembler {
    /// Consume one line. Returns `true` once the end marker has been seen.
    fn feed(&mut self, parser: &MdLogParser, line: &str) -> bool {
        if let Some(t) = parser.match_time(line) {
            self.out.time_lines += 1;
            if self.pending_time.replace(t).is_some() {
                self.out.unpaired_times += 1;
            }
        }

        if let Some(d) = parser.match_density(line) {
            self.out.density_lines += 1;
            match self.pending_time.take() {
                Some(t) => self.out.samples.push(Sample::new(t, d)),
                None => self.out.unpaired_densities += 1,
            }
        }

        if line.contains(END_MARKER) {
            self.out.reached_end_marker = true;
            return true;
        }
        false
    }

    fn finish(mut self) -> ParsedLog {
        if self.pending_time.take().is_some() {
            self.out.unpaired_times += 1;
        }
        self.out
    }
}

/// Parse every log in argument order and concatenate their samples.
pub fn load_dataset(paths: &[PathBuf]) -> Result<Dataset, AppError> {
    let parser = MdLogParser::new()?;
    let mut dataset = Dataset::default();

    for path in paths {
        let parsed = parser.parse_file(path)?;
        report_log(path, &parsed);

        dataset.logs.push(LogSummary {
            path: path.clone(),
            samples: parsed.samples.len(),
            reached_end_marker: parsed.reached_end_marker,
        });
        dataset.samples.extend(parsed.samples);
    }

    debug!("collected {} samples from {} log(s)", dataset.len(), dataset.logs.len());
    Ok(dataset)
}

fn report_log(path: &Path, parsed: &ParsedLog) {
    info!(
        "{}: {} samples ({} TIME lines, {} Density lines)",
        path.display(),
        parsed.samples.len(),
        parsed.time_lines,
        parsed.density_lines
    );
    if parsed.unpaired_times > 0 || parsed.unpaired_densities > 0 {
        warn!(
            "{}: dropped {} TIME and {} Density lines that did not form complete blocks",
            path.display(),
            parsed.unpaired_times,
            parsed.unpaired_densities
        );
    }
    if !parsed.reached_end_marker {
        warn!(
            "{}: no '{END_MARKER}' section found; using the {} samples read before end of file",
            path.display(),
            parsed.samples.len()
        );
    }
}
