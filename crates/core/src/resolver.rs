//! # Conflict Resolver
//!
//! Turns the blocks of one screen on one date into an [`EffectiveProgram`]:
//! an ordered list of intervals where every scheduled minute has exactly
//! one owning block.
//!
//! ## Algorithm
//!
//! 1. Keep the blocks that apply on the date.
//! 2. Order them by precedence: advertisements first, then effective
//!    priority (descending), start time (ascending), a key derived from
//!    the remaining fields, and finally insertion order.
//! 3. Walk that order; each block claims the minutes no earlier block has
//!    claimed. A block that loses part of its window keeps the pieces on
//!    either side, so it may come out split in two.
//! 4. Sort the claimed pieces by start time.
//!
//! Because the ordering only falls back to insertion order for blocks
//! whose every field is equal, the output does not depend on the order
//! the blocks were supplied in.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::warn;

use crate::models::block::{
    AdvertisementShowMode, BlockType, Priority, ScheduledBlock, ScreenId, ShowMode,
};
use crate::models::program::{ConflictWarning, EffectiveProgram, ProgramInterval};
use crate::models::time::{DayOfWeek, TimeOfDay};

struct Candidate<'a> {
    block: &'a ScheduledBlock,
    order: usize,
}

fn plane_rank(block: &ScheduledBlock) -> u8 {
    match block.block_type {
        BlockType::Advertisement => 0,
        BlockType::Playlist => 1,
    }
}

type ContentKey<'a> = (
    TimeOfDay,
    Option<&'a str>,
    Option<ShowMode>,
    Option<AdvertisementShowMode>,
    Option<NaiveDate>,
    Option<NaiveDate>,
    bool,
    Priority,
);

fn content_key(block: &ScheduledBlock) -> ContentKey<'_> {
    (
        block.end_time,
        block.playlist_id.as_deref(),
        block.show_mode,
        block.advertisement_show_mode,
        block.start_date,
        block.end_date,
        block.is_recurring,
        block.priority,
    )
}

fn precedence(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    plane_rank(a.block)
        .cmp(&plane_rank(b.block))
        .then_with(|| b.block.effective_priority().cmp(&a.block.effective_priority()))
        .then_with(|| a.block.start_time.cmp(&b.block.start_time))
        .then_with(|| content_key(a.block).cmp(&content_key(b.block)))
        .then_with(|| a.order.cmp(&b.order))
}

/// Removes `[claimed_start, claimed_end]` from every piece, keeping what is
/// left on either side.
fn subtract(
    pieces: Vec<(TimeOfDay, TimeOfDay)>,
    claimed_start: TimeOfDay,
    claimed_end: TimeOfDay,
) -> Vec<(TimeOfDay, TimeOfDay)> {
    let mut remaining = Vec::with_capacity(pieces.len() + 1);

    for (start, end) in pieces {
        if end < claimed_start || claimed_end < start {
            remaining.push((start, end));
            continue;
        }
        if start < claimed_start {
            if let Some(before) = claimed_start.pred() {
                remaining.push((start, before));
            }
        }
        if claimed_end < end {
            if let Some(after) = claimed_end.succ() {
                remaining.push((after, end));
            }
        }
    }

    remaining
}

/// Equal footing: same plane and same effective priority, so only the
/// tiebreak decided between them.
fn contested(winner: &ScheduledBlock, loser: &ScheduledBlock) -> bool {
    winner.block_type == loser.block_type
        && winner.effective_priority() == loser.effective_priority()
}

/// Resolves the program of `screen_id` on `date` from `blocks`.
///
/// Blocks for other screens, other weekdays or outside their date bounds
/// are ignored, so the whole working set can be passed in.
pub fn resolve(screen_id: &ScreenId, date: NaiveDate, blocks: &[ScheduledBlock]) -> EffectiveProgram {
    let mut ordered: Vec<Candidate<'_>> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| &block.screen_id == screen_id && block.applies_on(date))
        .map(|(order, block)| Candidate { block, order })
        .collect();
    ordered.sort_by(precedence);

    let mut claimed: Vec<(TimeOfDay, TimeOfDay, &ScheduledBlock)> = Vec::new();
    let mut warnings = Vec::new();
    for candidate in &ordered {
        let mut pieces = vec![(candidate.block.start_time, candidate.block.end_time)];
        // Minutes this candidate lost to each equal-footing winner
        let mut lost: Vec<ConflictWarning> = Vec::new();
        for &(start, end, owner) in &claimed {
            if contested(owner, candidate.block) {
                for &(piece_start, piece_end) in &pieces {
                    let overlap_start = piece_start.max(start);
                    let overlap_end = piece_end.min(end);
                    if overlap_start > overlap_end {
                        continue;
                    }
                    match lost.iter_mut().find(|warning| &warning.winner == owner) {
                        Some(warning) => {
                            warning.overlap_start = warning.overlap_start.min(overlap_start);
                            warning.overlap_end = warning.overlap_end.max(overlap_end);
                        }
                        None => lost.push(ConflictWarning {
                            winner: owner.clone(),
                            loser: candidate.block.clone(),
                            overlap_start,
                            overlap_end,
                        }),
                    }
                }
            }
            pieces = subtract(pieces, start, end);
            if pieces.is_empty() {
                break;
            }
        }
        warnings.extend(lost);
        claimed.extend(
            pieces
                .into_iter()
                .map(|(start, end)| (start, end, candidate.block)),
        );
    }
    claimed.sort_by_key(|&(start, _, _)| start);

    for warning in &warnings {
        warn!(
            "Equal-priority overlap on screen {} at {}: {}-{} kept over {}-{} for {}-{}",
            screen_id,
            date,
            warning.winner.start_time,
            warning.winner.end_time,
            warning.loser.start_time,
            warning.loser.end_time,
            warning.overlap_start,
            warning.overlap_end,
        );
    }

    EffectiveProgram {
        screen_id: screen_id.clone(),
        date,
        day_of_week: DayOfWeek::of(date),
        intervals: claimed
            .into_iter()
            .map(|(start, end, source)| ProgramInterval {
                start,
                end,
                source: source.clone(),
            })
            .collect(),
        warnings,
    }
}

/// Programs for each date of `week`, Monday first.
pub fn resolve_week(
    screen_id: &ScreenId,
    week: &[NaiveDate; 7],
    blocks: &[ScheduledBlock],
) -> Vec<EffectiveProgram> {
    week.iter()
        .map(|&date| resolve(screen_id, date, blocks))
        .collect()
}
