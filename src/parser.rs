//! Parse the CIRA SHIPS developmental data (lsdiag) text files.
//!
//! A file is a series of blocks, one per storm per synoptic time:
//!
//! ```text
//!  ALLI 820602 12   25  173  886 1005 AL011982 HEAD
//!  -12   -6    0    6   12 ...  120 TIME
//!   20   25   25   30   35 ...  9999 VMAX
//!  ...
//!                                     LAST
//! ```
//!
//! Only the analysis column (hour 0) of each parameter line is kept.

use crate::{
    atcf::AtcfId,
    basin::Basin,
    diag::Diag,
    errors::ShipsDataErr,
    observation::Observation,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use std::{
    collections::{BTreeSet, HashSet},
    path::Path,
    str::FromStr,
};

mod schema;
mod summary;

pub use schema::LineSchema;
pub use summary::{BlockError, BlockErrorKind, ParseSummary};

const HEAD: &str = "HEAD";
const TIME: &str = "TIME";
const LAST: &str = "LAST";

/// Largest forecast offset, in hours, accepted on a TIME line.
const MAX_OFFSET_HOURS: i64 = 1000;

/// Array valued parameters, not kept in the archive. PW01 through PW21 are checked separately.
const ARRAY_PARAMETERS: [&str; 9] = [
    "IR00", "IRM1", "IRM3", "IRXX", "PC00", "PCM1", "PCM3", "MTPW", "PSLV",
];

/// The observations parsed from the raw file for one basin.
#[derive(Clone, Debug)]
pub struct ParsedBasin {
    /// The basin of the file.
    pub basin: Basin,
    /// Observations in the order they appear in the file.
    pub observations: Vec<Observation>,
    /// What happened to each block.
    pub summary: ParseSummary,
}

/// Storm id and times of the columns of a block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockHeader {
    /// The storm.
    pub atcf_id: AtcfId,
    /// Time of the analysis.
    pub init_time: NaiveDateTime,
    /// Offset in hours of each column relative to the initial time.
    pub offsets: Vec<i64>,
}

impl BlockHeader {
    /// Absolute time of each column, `None` if any of them is out of range.
    pub fn valid_times(&self) -> Option<Vec<NaiveDateTime>> {
        self.offsets
            .iter()
            .map(|&hours| {
                Duration::try_hours(hours).and_then(|dt| self.init_time.checked_add_signed(dt))
            })
            .collect()
    }

    /// Index of the analysis column.
    pub fn analysis_index(&self) -> Option<usize> {
        self.offsets.iter().position(|&hours| hours == 0)
    }
}

enum BlockOutcome {
    Parsed(Observation),
    Excluded(String),
}

/// Read and parse the raw file for a basin.
pub fn parse_file(basin: Basin, path: &Path) -> Result<ParsedBasin, ShipsDataErr> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        ShipsDataErr::BasinUnavailable(basin, format!("{}: {}", path.display(), err))
    })?;

    info!("Parsing {} raw file {}.", basin.long_name(), path.display());
    parse_basin(basin, &text)
}

/// Parse the raw text for a basin. It is an error if no observations at all can be found.
pub fn parse_basin(basin: Basin, text: &str) -> Result<ParsedBasin, ShipsDataErr> {
    let (observations, summary) = parse_text(text);

    info!("{}: {}", basin, summary);

    if observations.is_empty() {
        let reason = if summary.blocks == 0 {
            "no storm blocks found".to_owned()
        } else {
            format!("none of {} blocks could be used", summary.blocks)
        };
        return Err(ShipsDataErr::BasinUnavailable(basin, reason));
    }

    Ok(ParsedBasin {
        basin,
        observations,
        summary,
    })
}

/// Parse raw text into observations. Malformed blocks are skipped and listed in the summary.
pub fn parse_text(text: &str) -> (Vec<Observation>, ParseSummary) {
    let mut summary = ParseSummary::default();
    let mut observations = vec![];
    let mut seen: HashSet<(AtcfId, NaiveDateTime)> = HashSet::new();

    for block in split_blocks(text, &mut summary) {
        summary.blocks += 1;

        match parse_block(&block, &mut summary.unknown) {
            Ok(BlockOutcome::Parsed(ob)) => {
                if seen.insert((ob.atcf_id.clone(), ob.time)) {
                    summary.parsed += 1;
                    observations.push(ob);
                } else {
                    warn!(
                        "Duplicate block for {} at {} on line {}.",
                        ob.atcf_id, ob.time, block[0].0
                    );
                    summary.duplicates += 1;
                }
            }
            Ok(BlockOutcome::Excluded(id)) => {
                debug!("Excluding {} on line {}.", id, block[0].0);
                summary.excluded += 1;
            }
            Err(err) => {
                warn!("Skipping block: {}", err);
                summary.errors.push(err);
            }
        }
    }

    (observations, summary)
}

/// Break the text into blocks of numbered lines. Each block starts with a HEAD line and runs
/// through the LAST line, the next HEAD line, or the end of the text.
fn split_blocks<'a>(text: &'a str, summary: &mut ParseSummary) -> Vec<Vec<(usize, &'a str)>> {
    let mut blocks = vec![];
    let mut current: Option<Vec<(usize, &str)>> = None;

    for (line_num, line) in text.lines().enumerate().map(|(i, ln)| (i + 1, ln)) {
        let name = match LineSchema::name(line) {
            Some(name) => name,
            None => continue, // blank
        };

        if name == HEAD {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(vec![(line_num, line)]);
        } else if let Some(block) = current.as_mut() {
            if name == LAST {
                blocks.push(std::mem::take(block));
                current = None;
            } else {
                block.push((line_num, line));
            }
        } else {
            warn!("Line {} is outside of a storm block.", line_num);
            summary.errors.push(BlockError {
                line: line_num,
                kind: BlockErrorKind::StrayLine,
            });
        }
    }

    if let Some(block) = current {
        blocks.push(block);
    }

    blocks
}

fn parse_block(
    block: &[(usize, &str)],
    unknown: &mut BTreeSet<String>,
) -> Result<BlockOutcome, BlockError> {
    let (head_line_num, head_line) = block[0];

    let header_err = |msg: String| BlockError {
        line: head_line_num,
        kind: BlockErrorKind::BadHeader(msg),
    };

    let (atcf_id, init_time) = match parse_head_line(head_line) {
        Ok(parts) => parts,
        Err(ShipsDataErr::UnsupportedBasin(_)) => {
            let id = head_line
                .split_whitespace()
                .rev()
                .nth(1)
                .unwrap_or_default()
                .to_owned();
            return Ok(BlockOutcome::Excluded(id));
        }
        Err(ShipsDataErr::GeneralError(msg)) => return Err(header_err(msg)),
        Err(err) => return Err(header_err(err.to_string())),
    };

    let (time_line_num, time_line) = block
        .iter()
        .find(|(_, line)| LineSchema::name(line) == Some(TIME))
        .copied()
        .ok_or(BlockError {
            line: head_line_num,
            kind: BlockErrorKind::MissingTimeLine,
        })?;

    let offsets = parse_time_line(time_line).map_err(|kind| BlockError {
        line: time_line_num,
        kind,
    })?;

    let header = BlockHeader {
        atcf_id,
        init_time,
        offsets,
    };

    let analysis_index = header.analysis_index().ok_or(BlockError {
        line: time_line_num,
        kind: BlockErrorKind::NoAnalysisColumn,
    })?;
    let schema = LineSchema::new(header.offsets.len());

    // The analysis column has offset 0, so it is valid at the initial time.
    let mut ob = Observation::new(header.atcf_id, header.init_time);

    for &(line_num, line) in &block[1..] {
        let name = match LineSchema::name(line) {
            Some(name) => name,
            None => continue,
        };

        let diag = match Diag::from_name(name) {
            Ok(diag) => diag,
            Err(_) if name == TIME || is_array_parameter(name) => continue,
            Err(_) => {
                if unknown.insert(name.to_owned()) {
                    warn!("Unknown parameter {} on line {} is not kept.", name, line_num);
                }
                continue;
            }
        };

        if ob.has_line(diag) {
            debug!("Second {} line on line {}, keeping the first.", diag, line_num);
            continue;
        }

        let value = schema
            .value_at(line, analysis_index)
            .map_err(|kind| BlockError {
                line: line_num,
                kind,
            })?;

        ob.set_raw_value(diag, value);
    }

    if ob.iter().next().is_none() {
        return Err(BlockError {
            line: head_line_num,
            kind: BlockErrorKind::NoParameters,
        });
    }

    Ok(BlockOutcome::Parsed(ob))
}

/// Get the storm and initial time from a HEAD line.
///
/// The date on the line has a 2 digit year, so the year comes from the ATCF id. Storms that
/// last into January of the next year are bumped into the next year.
fn parse_head_line(line: &str) -> Result<(AtcfId, NaiveDateTime), ShipsDataErr> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let bad = |msg: &str| ShipsDataErr::GeneralError(format!("{} in '{}'", msg, line.trim()));

    if tokens.len() < 5 || tokens[tokens.len() - 1] != HEAD {
        return Err(bad("too few fields"));
    }

    let atcf_id = AtcfId::from_str(tokens[tokens.len() - 2])?;

    let yymmdd = tokens[1];
    let hh = tokens[2];
    if yymmdd.len() != 6 || !yymmdd.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad("bad date"));
    }

    let yy: i32 = yymmdd[0..2].parse().map_err(|_| bad("bad year"))?;
    let month: u32 = yymmdd[2..4].parse().map_err(|_| bad("bad month"))?;
    let day: u32 = yymmdd[4..6].parse().map_err(|_| bad("bad day"))?;
    let hour: u32 = hh.parse().map_err(|_| bad("bad hour"))?;

    let mut year = i32::from(atcf_id.year());
    if yy != year % 100 && yy == (year + 1) % 100 {
        year += 1;
    }

    let init_time = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| bad("invalid date"))?;

    Ok((atcf_id, init_time))
}

fn parse_time_line(line: &str) -> Result<Vec<i64>, BlockErrorKind> {
    line.split_whitespace()
        .take_while(|&tok| tok != TIME)
        .map(|tok| {
            tok.parse::<i64>()
                .ok()
                .filter(|hours| hours.abs() <= MAX_OFFSET_HOURS)
                .ok_or_else(|| BlockErrorKind::BadValue {
                    name: TIME.to_owned(),
                    field: tok.to_owned(),
                })
        })
        .collect()
}

fn is_array_parameter(name: &str) -> bool {
    let name = name.to_uppercase();

    if ARRAY_PARAMETERS.contains(&name.as_str()) {
        return true;
    }

    // PW01 through PW21
    name.strip_prefix("PW")
        .filter(|num| num.len() == 2)
        .and_then(|num| num.parse::<u8>().ok())
        .map_or(false, |num| (1..=21).contains(&num))
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
#[cfg(test)]
pub(crate) mod unit {
    use super::*;

    pub(crate) const OFFSETS: [i32; 5] = [-12, -6, 0, 6, 12];

    pub(crate) fn line(vals: &[i32], name: &str) -> String {
        let mut line: String = vals.iter().map(|v| format!("{:>5}", v)).collect();
        line.push(' ');
        line.push_str(name);
        line
    }

    pub(crate) fn head(atcf: &str, yymmdd: &str, hh: &str) -> String {
        format!(" NAME {} {}   25  173  886 1005 {} HEAD", yymmdd, hh, atcf)
    }

    /// A well formed block with the analysis values of VMAX and SHRD in column 3.
    pub(crate) fn block(atcf: &str, yymmdd: &str, hh: &str, vmax: i32, shrd: i32) -> String {
        [
            head(atcf, yymmdd, hh),
            line(&OFFSETS, "TIME"),
            line(&[9999, 9999, vmax, vmax + 5, vmax + 10], "VMAX"),
            line(&[9999, 9999, shrd, 9999, 9999], "SHRD"),
            line(&[1, 2, 3, 4, 5], "IR00"),
            line(&[9999, 9999, 9999, 9999, 9999], "LAT"),
            format!("{:>30}", "LAST"),
        ]
        .join("\n")
            + "\n"
    }

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_head_line() {
        let (id, time) = parse_head_line(&head("AL052019", "190824", "06")).unwrap();
        assert_eq!(id.as_str(), "AL052019");
        assert_eq!(time, dt(2019, 8, 24, 6));

        assert!(parse_head_line(" NAME 190824 06 AL052019").is_err());
        assert!(parse_head_line(&head("AL052019", "19082", "06")).is_err());
        assert!(parse_head_line(&head("AL052019", "191324", "06")).is_err());
        assert!(parse_head_line(&head("AL0519", "190824", "06")).is_err());
    }

    #[test]
    fn test_year_crossing_storm() {
        let (_, time) = parse_head_line(&head("AL302005", "060103", "00")).unwrap();
        assert_eq!(time, dt(2006, 1, 3, 0));

        let (_, time) = parse_head_line(&head("AL301999", "000101", "12")).unwrap();
        assert_eq!(time, dt(2000, 1, 1, 12));
    }

    #[test]
    fn test_block_header_times() {
        let header = BlockHeader {
            atcf_id: AtcfId::from_str("EP012000").unwrap(),
            init_time: dt(2000, 6, 1, 0),
            offsets: vec![-12, -6, 0, 6],
        };

        assert_eq!(header.analysis_index(), Some(2));
        assert_eq!(
            header.valid_times(),
            Some(vec![
                dt(2000, 5, 31, 12),
                dt(2000, 5, 31, 18),
                dt(2000, 6, 1, 0),
                dt(2000, 6, 1, 6)
            ])
        );

        let far_off = BlockHeader {
            offsets: vec![0, i64::MAX],
            ..header
        };
        assert_eq!(far_off.valid_times(), None);
    }

    #[test]
    fn test_parse_single_block() {
        let (obs, summary) = parse_text(&block("AL052019", "190824", "06", 25, 153));

        assert_eq!(summary.blocks, 1);
        assert_eq!(summary.parsed, 1);
        assert!(summary.errors.is_empty());

        let ob = &obs[0];
        assert_eq!(ob.atcf_id.as_str(), "AL052019");
        assert_eq!(ob.time, dt(2019, 8, 24, 6));
        assert_eq!(ob.raw_value(Diag::VMAX), Some(25));
        assert_eq!(ob.raw_value(Diag::SHRD), Some(153));
        assert_eq!(ob.raw_value(Diag::LAT), None);
        assert!(ob.has_line(Diag::LAT));
        assert!(!ob.has_line(Diag::MSLP));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = [
            block("AL052019", "190824", "06", 25, 153),
            block("AL052019", "190824", "12", 30, 160),
            block("EP022019", "190601", "00", 40, 9999),
        ]
        .concat();

        assert_eq!(parse_text(&text), parse_text(&text));
    }

    #[test]
    fn test_unsupported_basin_excluded() {
        let text = [
            block("WP282019", "191001", "00", 100, 50),
            block("AL052019", "190824", "06", 25, 153),
        ]
        .concat();

        let (obs, summary) = parse_text(&text);
        assert_eq!(summary.blocks, 2);
        assert_eq!(summary.excluded, 1);
        assert!(summary.errors.is_empty());
        assert_eq!(obs.len(), 1);
        assert!(obs.iter().all(|ob| !ob.atcf_id.as_str().starts_with("WP")));
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let short_line = [
            head("AL062019", "190825", "00"),
            line(&OFFSETS, "TIME"),
            line(&[1, 2, 3, 4], "VMAX"),
            "LAST".to_owned(),
        ]
        .join("\n")
            + "\n";

        let no_time = [
            head("AL072019", "190825", "00"),
            line(&[1, 2, 3, 4, 5], "VMAX"),
            "LAST".to_owned(),
        ]
        .join("\n")
            + "\n";

        let bad_head = [
            " NAME 19xx24 00 AL082019 HEAD".to_owned(),
            line(&OFFSETS, "TIME"),
            line(&[1, 2, 3, 4, 5], "VMAX"),
            "LAST".to_owned(),
        ]
        .join("\n")
            + "\n";

        let text = [
            block("AL052019", "190824", "06", 25, 153),
            short_line,
            no_time,
            bad_head,
            block("AL052019", "190824", "12", 30, 160),
        ]
        .concat();

        let (obs, summary) = parse_text(&text);
        assert_eq!(summary.blocks, 5);
        assert_eq!(summary.parsed, 2);
        assert_eq!(obs.len(), 2);
        assert_eq!(summary.errors.len(), 3);

        let kinds: Vec<&BlockErrorKind> = summary.errors.iter().map(|e| &e.kind).collect();
        assert!(matches!(kinds[0], BlockErrorKind::FieldCount { .. }));
        assert_eq!(kinds[1], &BlockErrorKind::MissingTimeLine);
        assert!(matches!(kinds[2], BlockErrorKind::BadHeader(_)));

        // Line numbers point at the offending line.
        assert_eq!(summary.errors[0].line, 10);
    }

    #[test]
    fn test_malformed_time_lines_are_skipped() {
        let with_time_line = |atcf: &str, time_line: &str| {
            [
                head(atcf, "190825", "00"),
                time_line.to_owned(),
                line(&[1, 2, 3, 4, 5], "VMAX"),
                "LAST".to_owned(),
            ]
            .join("\n")
                + "\n"
        };

        let text = [
            with_time_line("AL062019", "  -12   -6    0    6 9999999999 TIME"),
            with_time_line("AL072019", "  -12   -6    0   xx   12 TIME"),
            with_time_line("AL082019", &line(&[-12, -6, 6, 12, 18], "TIME")),
            block("AL052019", "190824", "06", 25, 153),
        ]
        .concat();

        let (obs, summary) = parse_text(&text);
        assert_eq!(summary.blocks, 4);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].atcf_id.as_str(), "AL052019");

        let errors: Vec<(usize, BlockErrorKind)> = summary
            .errors
            .iter()
            .map(|err| (err.line, err.kind.clone()))
            .collect();
        assert_eq!(
            errors,
            vec![
                (
                    2,
                    BlockErrorKind::BadValue {
                        name: "TIME".to_owned(),
                        field: "9999999999".to_owned()
                    }
                ),
                (
                    6,
                    BlockErrorKind::BadValue {
                        name: "TIME".to_owned(),
                        field: "xx".to_owned()
                    }
                ),
                (10, BlockErrorKind::NoAnalysisColumn),
            ]
        );
    }

    #[test]
    fn test_unknown_parameters_are_reported() {
        let extra = [
            line(&[1, 2, 3, 4, 5], "RD20"),
            line(&[1, 2, 3, 4, 5], "PW05"),
            line(&[1, 2, 3, 4, 5], "MTPW"),
            line(&[1, 2, 3, 4, 5], "IRM1"),
        ]
        .join("\n");

        let text = [
            // Extra lines go right after the HEAD line.
            block("AL052019", "190824", "06", 25, 153).replacen('\n', &format!("\n{}\n", extra), 1),
            block("AL052019", "190824", "12", 30, 160).replacen('\n', &format!("\n{}\n", extra), 1),
        ]
        .concat();

        let (obs, summary) = parse_text(&text);
        assert_eq!(obs.len(), 2);
        assert!(summary.errors.is_empty());
        assert_eq!(obs[0].raw_value(Diag::VMAX), Some(25));

        let unknown: Vec<&str> = summary.unknown.iter().map(String::as_str).collect();
        assert_eq!(unknown, vec!["RD20"]);
        assert!(summary.to_string().ends_with("unknown parameters: RD20"));
    }

    #[test]
    fn test_array_parameters() {
        for name in &["IR00", "IRM1", "IRM3", "IRXX", "PC00", "PCM1", "PCM3", "MTPW", "PSLV"] {
            assert!(is_array_parameter(name), "{}", name);
        }
        assert!(is_array_parameter("PW01"));
        assert!(is_array_parameter("pw21"));
        assert!(!is_array_parameter("PW22"));
        assert!(!is_array_parameter("PW00"));
        assert!(!is_array_parameter("RD20"));
    }

    #[test]
    fn test_duplicates_keep_first() {
        let text = [
            block("AL052019", "190824", "06", 25, 153),
            block("AL052019", "190824", "06", 99, 99),
        ]
        .concat();

        let (obs, summary) = parse_text(&text);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].raw_value(Diag::VMAX), Some(25));
    }

    #[test]
    fn test_block_without_last_line() {
        let mut text = block("AL052019", "190824", "06", 25, 153);
        text = text.replace("LAST", "");
        text.push_str(&block("AL052019", "190824", "12", 30, 160));

        let (obs, summary) = parse_text(&text);
        assert_eq!(summary.blocks, 2);
        assert_eq!(obs.len(), 2);
    }

    #[test]
    fn test_stray_lines() {
        let text = line(&[1, 2, 3, 4, 5], "VMAX") + "\n" + &block("AL052019", "190824", "06", 25, 153);

        let (obs, summary) = parse_text(&text);
        assert_eq!(obs.len(), 1);
        assert_eq!(summary.errors[0].kind, BlockErrorKind::StrayLine);
        assert_eq!(summary.errors[0].line, 1);
    }

    #[test]
    fn test_basin_unavailable() {
        match parse_basin(Basin::CP, "") {
            Err(ShipsDataErr::BasinUnavailable(Basin::CP, _)) => {}
            other => panic!("Expected basin unavailable, got {:?}", other),
        }

        match parse_basin(Basin::CP, &block("WP012019", "190101", "00", 25, 10)) {
            Err(ShipsDataErr::BasinUnavailable(Basin::CP, _)) => {}
            other => panic!("Expected basin unavailable, got {:?}", other),
        }

        let parsed = parse_basin(Basin::AL, &block("AL052019", "190824", "06", 25, 153))
            .expect("Error parsing basin.");
        assert_eq!(parsed.observations.len(), 1);
    }

    #[test]
    fn test_parse_missing_file() {
        let path = Path::new("unlikely_directory_in_my_project/nothing.dat");
        match parse_file(Basin::EP, path) {
            Err(ShipsDataErr::BasinUnavailable(Basin::EP, _)) => {}
            other => panic!("Expected basin unavailable, got {:?}", other),
        }
    }
}
