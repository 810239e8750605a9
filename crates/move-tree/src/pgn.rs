//! PGN text utilities: lightweight regex-based clock and header extraction.
//!
//! Clock comments are aligned to moves heuristically: each mainline move
//! token takes the nearest following `%clk` comment that appears before the
//! next move token. Comments inside variations never count. Malformed or
//! missing annotations simply produce fewer records.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::game_data::GameMetadata;
use crate::game_state::Side;

static HEADER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\[[^\]\n]*\][ \t]*\r?$").unwrap());

static CLOCK_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^}]*?%clk\s+(\d+:\d{1,2}:\d{1,2}(?:\.\d+)?)[^}]*\}").unwrap()
});

const SAN: &str = r"(?:O-O-O|O-O|0-0-0|0-0|[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=?[QRBN])?)[+#]?[!?]*";

/// Either a move number indicator (`12.` / `12...`) or a single SAN token
static MOVE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(\d+)\s*(\.\.\.|\.)|\b({SAN})")).unwrap());

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap());

/// Clock reading attached to one ply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockAnnotation {
    /// Zero-based ply index in play order
    pub move_index: usize,
    pub side: Side,
    /// Raw clock text, e.g. `0:04:58.3`
    pub time: String,
}

impl ClockAnnotation {
    /// Remaining time in seconds.
    pub fn seconds(&self) -> Option<f64> {
        parse_clock(&self.time)
    }
}

/// Parse `H:MM:SS` with optional fractional seconds into seconds.
pub fn parse_clock(text: &str) -> Option<f64> {
    let mut parts = text.trim().split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// A move token found in the movetext.
#[derive(Debug)]
struct MoveToken {
    offset: usize,
    side: Side,
}

/// A clock comment found in the movetext.
#[derive(Debug)]
struct ClockComment {
    offset: usize,
    time: String,
}

/// Remove header lines, keeping only the movetext.
pub fn strip_headers(pgn: &str) -> String {
    HEADER_LINE_RE.replace_all(pgn, "").into_owned()
}

/// Blank out `;` remarks, `$n` NAGs and parenthesised variations, keeping
/// byte offsets intact so positions still index into the original text.
/// Comments are blanked too unless `keep_comments` is set, in which case only
/// those at the top level survive.
fn mask_non_mainline(text: &str, keep_comments: bool) -> String {
    let mut bytes = text.as_bytes().to_vec();
    let mut depth = 0usize;
    let mut in_comment = false;
    let mut in_remark = false;
    let mut in_nag = false;

    for b in bytes.iter_mut() {
        let c = *b;
        let keep_comment = keep_comments && depth == 0;
        if in_comment {
            in_comment = c != b'}';
            if keep_comment {
                continue;
            }
        } else if in_remark {
            in_remark = c != b'\n';
        } else if in_nag && c.is_ascii_digit() {
            // still inside the NAG
        } else {
            in_nag = false;
            match c {
                b'{' => {
                    in_comment = true;
                    if keep_comment {
                        continue;
                    }
                }
                b';' => in_remark = true,
                b'$' => in_nag = true,
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                _ if depth == 0 => continue,
                _ => {}
            }
        }
        *b = b' ';
    }

    // Only ASCII bytes were written, so the buffer is still valid UTF-8.
    String::from_utf8(bytes).unwrap_or_default()
}

fn find_clock_comments(text: &str) -> Vec<ClockComment> {
    CLOCK_COMMENT_RE
        .captures_iter(&mask_non_mainline(text, true))
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            Some(ClockComment {
                offset: whole.start(),
                time: cap.get(1)?.as_str().to_string(),
            })
        })
        .collect()
}

/// Mainline SAN tokens in play order. Sides alternate from White and are
/// re-synchronised by every move number indicator.
fn find_move_tokens(text: &str) -> Vec<MoveToken> {
    let masked = mask_non_mainline(text, false);
    let mut tokens = Vec::new();
    let mut side = Side::White;

    for cap in MOVE_TOKEN_RE.captures_iter(&masked) {
        if let Some(dots) = cap.get(2) {
            side = if dots.as_str() == "..." { Side::Black } else { Side::White };
        } else if let Some(san) = cap.get(3) {
            tokens.push(MoveToken {
                offset: san.start(),
                side,
            });
            side = side.opposite();
        }
    }

    tokens
}

/// Extract per-ply clock annotations from a PGN string.
pub fn extract_clock_annotations(pgn: &str) -> Vec<ClockAnnotation> {
    let text = strip_headers(pgn);

    let clocks = find_clock_comments(&text);
    if clocks.is_empty() {
        return Vec::new();
    }

    let tokens = find_move_tokens(&text);
    let mut annotations = Vec::new();
    let mut next_clock = 0;

    for (index, token) in tokens.iter().enumerate() {
        let limit = tokens
            .get(index + 1)
            .map(|t| t.offset)
            .unwrap_or(usize::MAX);

        while next_clock < clocks.len() && clocks[next_clock].offset < token.offset {
            next_clock += 1;
        }
        let Some(clock) = clocks.get(next_clock) else {
            break;
        };
        if clock.offset >= limit {
            continue;
        }

        annotations.push(ClockAnnotation {
            move_index: index,
            side: token.side,
            time: clock.time.clone(),
        });
        next_clock += 1;
    }

    annotations
}

/// Read the well-known tag pairs into a [`GameMetadata`].
pub fn parse_metadata(pgn: &str) -> GameMetadata {
    let mut metadata = GameMetadata::default();

    for cap in HEADER_RE.captures_iter(&header_block(pgn)) {
        let value = cap[2].to_string();
        match &cap[1] {
            "White" => metadata.white = value,
            "Black" => metadata.black = value,
            "Result" => metadata.result = value,
            "Date" => metadata.date = Some(value),
            "TimeControl" => metadata.time_control = Some(value),
            "ECO" => metadata.eco = Some(value),
            "Event" => metadata.event = Some(value),
            "Link" => metadata.link = Some(value),
            "FEN" => metadata.start_fen = Some(value),
            _ => {}
        }
    }

    metadata
}

/// Header lines only, so bracketed clock comments in the movetext are not
/// mistaken for tags.
fn header_block(pgn: &str) -> String {
    HEADER_LINE_RE
        .find_iter(pgn)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
