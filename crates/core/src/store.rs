//! # Schedule Store
//!
//! The working set of blocks for the selected screens, plus the state
//! machine that keeps it in step with the remote schedule service.
//!
//! ## States
//!
//! - `Clean`: matches what the server last confirmed.
//! - `Dirty`: local edits not yet saved, the server state is unknown
//!   after a failed save, or screens added to the scope have not been
//!   fetched yet.
//! - `Saving` / `Loading`: a send or fetch is in flight.
//!
//! Mutations return the recomputed programs of whatever they touched, so
//! callers re-render from the return value instead of subscribing to
//! changes.
//!
//! ## Requests
//!
//! Network calls are split into `begin_*` and `complete_*` so the owner
//! can keep editing while a request is outstanding. Sends and fetches
//! exclude each other; a second request of the same kind supersedes the
//! first and the superseded completion is discarded.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use eyre::eyre;
use tracing::{debug, error, info, warn};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::grid::week_of;
use crate::models::block::{
    AdvertisementShowMode, BlockType, DraftBlockTemplate, Priority, ScheduledBlock, ScreenId,
    ShowMode,
};
use crate::models::program::EffectiveProgram;
use crate::models::schedule::ScheduleScope;
use crate::models::sequence::ContentSequences;
use crate::models::time::{DayOfWeek, TimeOfDay};
use crate::resolver;
use crate::service::ScheduleService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Clean,
    Dirty,
    Saving,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Send,
    Fetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    kind: RequestKind,
    generation: u64,
}

/// Whether a completed request was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    Discarded,
}

/// An outstanding save. Hand `scope` and `blocks` to the service, then
/// pass the ticket back to [`ScheduleStore::complete_send`].
#[derive(Debug, Clone)]
pub struct SendTicket {
    generation: u64,
    revision: u64,
    pub scope: ScheduleScope,
    pub blocks: Vec<ScheduledBlock>,
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    pub scope: ScheduleScope,
}

#[derive(Debug)]
pub struct ScheduleStore {
    scope: ScheduleScope,
    week: [NaiveDate; 7],
    blocks: BTreeMap<ScreenId, Vec<ScheduledBlock>>,
    draft: DraftBlockTemplate,
    sequences: ContentSequences,
    revision: u64,
    // None once a failed save leaves the server state unknown
    saved_revision: Option<u64>,
    // Screens joined through `select_scope` whose server blocks are not
    // loaded; saving is refused until a fetch covers them
    unloaded: BTreeSet<ScreenId>,
    next_generation: u64,
    in_flight: Option<InFlight>,
}

fn screen_list<'a>(screen_ids: impl IntoIterator<Item = &'a ScreenId>) -> String {
    screen_ids
        .into_iter()
        .map(ScreenId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ScheduleStore {
    /// An empty, clean store editing `scope` during the week containing
    /// `reference_date`.
    pub fn new(scope: ScheduleScope, reference_date: NaiveDate) -> Self {
        Self {
            scope,
            week: week_of(reference_date),
            blocks: BTreeMap::new(),
            draft: DraftBlockTemplate::default(),
            sequences: ContentSequences::new(),
            revision: 0,
            saved_revision: Some(0),
            unloaded: BTreeSet::new(),
            next_generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> SyncState {
        match self.in_flight {
            Some(InFlight {
                kind: RequestKind::Send,
                ..
            }) => SyncState::Saving,
            Some(InFlight {
                kind: RequestKind::Fetch,
                ..
            }) => SyncState::Loading,
            None if self.saved_revision == Some(self.revision) && self.unloaded.is_empty() => {
                SyncState::Clean
            }
            None => SyncState::Dirty,
        }
    }

    /// True when local edits exist that the server has not confirmed,
    /// including while a request is in flight.
    pub fn has_unsaved_changes(&self) -> bool {
        self.saved_revision != Some(self.revision)
    }

    pub fn scope(&self) -> &ScheduleScope {
        &self.scope
    }

    pub fn week(&self) -> &[NaiveDate; 7] {
        &self.week
    }

    pub fn draft(&self) -> &DraftBlockTemplate {
        &self.draft
    }

    pub fn sequences(&self) -> &ContentSequences {
        &self.sequences
    }

    pub fn blocks_for(&self, screen_id: &ScreenId) -> &[ScheduledBlock] {
        self.blocks.get(screen_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every block in the working set, grouped by screen.
    pub fn blocks(&self) -> impl Iterator<Item = &ScheduledBlock> {
        self.blocks.values().flatten()
    }

    /// True when screens in the scope still need their blocks fetched
    /// before the working set can be saved.
    pub fn needs_fetch(&self) -> bool {
        !self.unloaded.is_empty()
    }

    /// Switches the editing scope. Any in-flight request becomes stale.
    ///
    /// Screens that join the scope must be fetched before the next save.
    /// Dropping a screen is refused while there are unsaved changes.
    pub fn select_scope(&mut self, scope: ScheduleScope) -> ScheduleResult<()> {
        let leaving: Vec<&ScreenId> = self
            .scope
            .screen_ids
            .iter()
            .filter(|screen_id| !scope.contains(screen_id))
            .collect();
        if !leaving.is_empty() && self.has_unsaved_changes() {
            return Err(ScheduleError::Validation(format!(
                "Save or reload before deselecting screens {}",
                screen_list(leaving)
            )));
        }

        let joining: Vec<ScreenId> = scope
            .screen_ids
            .iter()
            .filter(|screen_id| !self.scope.contains(screen_id))
            .cloned()
            .collect();
        info!(
            "Selecting {} screen(s) ({} new), dropping in-flight request: {}",
            scope.screen_ids.len(),
            joining.len(),
            self.in_flight.is_some()
        );

        self.blocks.retain(|screen_id, _| scope.contains(screen_id));
        self.unloaded.retain(|screen_id| scope.contains(screen_id));
        self.unloaded.extend(joining);
        self.scope = scope;
        self.in_flight = None;
        Ok(())
    }

    /// Moves the resolved week to the one containing `date`.
    pub fn set_week(&mut self, date: NaiveDate) -> Vec<EffectiveProgram> {
        self.week = week_of(date);
        self.programs()
    }

    // Draft template ("current pen") settings

    pub fn set_priority(&mut self, priority: u8) -> ScheduleResult<()> {
        self.draft.priority = Priority::new(priority)?;
        Ok(())
    }

    pub fn set_type(&mut self, block_type: BlockType) {
        self.draft.block_type = block_type;
    }

    pub fn set_show_mode(&mut self, show_mode: ShowMode) {
        self.draft.show_mode = show_mode;
    }

    pub fn set_advertisement_show_mode(&mut self, mode: AdvertisementShowMode) {
        self.draft.advertisement_show_mode = mode;
    }

    pub fn set_playlist(&mut self, playlist_id: Option<String>) {
        self.draft.playlist_id = playlist_id;
    }

    pub fn set_recurring(&mut self, is_recurring: bool) {
        self.draft.is_recurring = is_recurring;
    }

    pub fn set_date_range(
        &mut self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ScheduleResult<()> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(ScheduleError::Validation(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }
        self.draft.start_date = start_date;
        self.draft.end_date = end_date;
        Ok(())
    }

    // Working set mutations

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn ensure_selected(&self, screen_id: &ScreenId) -> ScheduleResult<()> {
        if !self.scope.contains(screen_id) {
            return Err(ScheduleError::Validation(format!(
                "Screen {} is not in the selected scope",
                screen_id
            )));
        }
        Ok(())
    }

    /// Validates `block` and adds it to the working set.
    pub fn assign_block(&mut self, block: ScheduledBlock) -> ScheduleResult<Vec<EffectiveProgram>> {
        block.validate()?;
        self.ensure_selected(&block.screen_id)?;

        let screen_id = block.screen_id.clone();
        let day = block.day_of_week;
        debug!(
            "Assigning {:?} block {}-{} to screen {} on {}",
            block.block_type, block.start_time, block.end_time, screen_id, day
        );
        self.blocks.entry(screen_id.clone()).or_default().push(block);
        self.touch();

        Ok(vec![self.program_for(&screen_id, day)])
    }

    /// Assigns a block built from the draft template.
    pub fn assign(
        &mut self,
        screen_id: ScreenId,
        day: DayOfWeek,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> ScheduleResult<Vec<EffectiveProgram>> {
        let block = self.draft.assign(screen_id, day, start, end)?;
        self.assign_block(block)
    }

    /// Assigns the draft to every selected screen. Nothing is inserted
    /// unless every block validates.
    pub fn assign_selected(
        &mut self,
        day: DayOfWeek,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> ScheduleResult<Vec<EffectiveProgram>> {
        let blocks = self
            .scope
            .screen_ids
            .iter()
            .map(|screen_id| self.draft.assign(screen_id.clone(), day, start, end))
            .collect::<ScheduleResult<Vec<_>>>()?;

        if blocks.is_empty() {
            return Ok(Vec::new());
        }

        let mut screens = Vec::with_capacity(blocks.len());
        for block in blocks {
            let screen_id = block.screen_id.clone();
            self.blocks.entry(screen_id.clone()).or_default().push(block);
            screens.push(screen_id);
        }
        self.touch();
        debug!("Assigned {} block(s) on {} {}-{}", screens.len(), day, start, end);

        Ok(screens
            .iter()
            .map(|screen_id| self.program_for(screen_id, day))
            .collect())
    }

    /// Removes every block of `screen_ids` and returns their (now empty)
    /// week programs.
    pub fn clear_all_slots(&mut self, screen_ids: &[ScreenId]) -> Vec<EffectiveProgram> {
        let removed: usize = screen_ids
            .iter()
            .filter_map(|screen_id| self.blocks.remove(screen_id))
            .map(|blocks| blocks.len())
            .sum();
        self.touch();
        debug!(
            "Cleared {} block(s) from {} screen(s)",
            removed,
            screen_ids.len()
        );

        screen_ids
            .iter()
            .flat_map(|screen_id| {
                resolver::resolve_week(screen_id, &self.week, self.blocks_for(screen_id))
            })
            .collect()
    }

    pub fn set_sequence(&mut self, container_id: impl Into<String>, items: Vec<String>) {
        self.sequences.set(container_id, items);
    }

    /// Moves `item_id` to `new_index` within a content sequence.
    pub fn reorder(
        &mut self,
        container_id: &str,
        item_id: &str,
        new_index: usize,
    ) -> ScheduleResult<Vec<String>> {
        let items = self.sequences.reorder(container_id, item_id, new_index)?;
        debug!("Moved {} to index {} in {}", item_id, new_index, container_id);
        Ok(items.to_vec())
    }

    // Queries

    pub fn program_for(&self, screen_id: &ScreenId, day: DayOfWeek) -> EffectiveProgram {
        resolver::resolve(screen_id, self.week[day.index()], self.blocks_for(screen_id))
    }

    /// The resolved week of every selected screen, screen by screen and
    /// Monday first.
    pub fn programs(&self) -> Vec<EffectiveProgram> {
        self.scope
            .screen_ids
            .iter()
            .flat_map(|screen_id| {
                resolver::resolve_week(screen_id, &self.week, self.blocks_for(screen_id))
            })
            .collect()
    }

    // Synchronization

    fn start_request(&mut self, kind: RequestKind) -> ScheduleResult<u64> {
        if let Some(current) = self.in_flight {
            if current.kind != kind {
                return Err(ScheduleError::Busy(match current.kind {
                    RequestKind::Send => "a schedule save is in flight".to_string(),
                    RequestKind::Fetch => "a schedule fetch is in flight".to_string(),
                }));
            }
            debug!("Superseding {:?} request {}", kind, current.generation);
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        self.in_flight = Some(InFlight { kind, generation });
        Ok(generation)
    }

    fn settle(&mut self, kind: RequestKind, generation: u64) -> bool {
        if self.in_flight == Some(InFlight { kind, generation }) {
            self.in_flight = None;
            true
        } else {
            warn!("Discarding stale {:?} completion {}", kind, generation);
            false
        }
    }

    /// Snapshots the working set of the selected screens and marks the
    /// store as saving.
    pub fn begin_send(&mut self) -> ScheduleResult<SendTicket> {
        if self.needs_fetch() {
            return Err(ScheduleError::Validation(format!(
                "Screens {} must be loaded before saving",
                screen_list(&self.unloaded)
            )));
        }
        let generation = self.start_request(RequestKind::Send)?;
        let blocks: Vec<ScheduledBlock> = self
            .scope
            .screen_ids
            .iter()
            .flat_map(|screen_id| self.blocks_for(screen_id).iter().cloned())
            .collect();
        info!(
            "Saving {} block(s) for {} screen(s)",
            blocks.len(),
            self.scope.screen_ids.len()
        );

        Ok(SendTicket {
            generation,
            revision: self.revision,
            scope: self.scope.clone(),
            blocks,
        })
    }

    /// Settles a save. A failure is returned as [`ScheduleError::Sync`]
    /// and leaves every local edit in place.
    pub fn complete_send(
        &mut self,
        ticket: SendTicket,
        result: eyre::Result<()>,
    ) -> ScheduleResult<SyncOutcome> {
        if !self.settle(RequestKind::Send, ticket.generation) {
            return Ok(SyncOutcome::Discarded);
        }

        match result {
            Ok(()) => {
                self.saved_revision = Some(ticket.revision);
                info!("Saved {} block(s)", ticket.blocks.len());
                Ok(SyncOutcome::Applied)
            }
            Err(err) => {
                self.saved_revision = None;
                error!("Failed to save schedule: {}", err);
                Err(ScheduleError::Sync(err))
            }
        }
    }

    pub fn begin_fetch(&mut self) -> ScheduleResult<FetchTicket> {
        let generation = self.start_request(RequestKind::Fetch)?;
        info!(
            "Fetching schedule for {} screen(s)",
            self.scope.screen_ids.len()
        );

        Ok(FetchTicket {
            generation,
            scope: self.scope.clone(),
        })
    }

    /// Settles a fetch, replacing the working set with the server's blocks.
    /// Nothing is replaced unless every returned block validates.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: eyre::Result<Vec<ScheduledBlock>>,
    ) -> ScheduleResult<SyncOutcome> {
        if !self.settle(RequestKind::Fetch, ticket.generation) {
            return Ok(SyncOutcome::Discarded);
        }

        let fetched = result.map_err(|err| {
            error!("Failed to fetch schedule: {}", err);
            ScheduleError::Sync(err)
        })?;

        let mut blocks: BTreeMap<ScreenId, Vec<ScheduledBlock>> = BTreeMap::new();
        for block in fetched {
            block.validate().map_err(|err| {
                ScheduleError::Sync(eyre!("Server returned an invalid block: {}", err))
            })?;
            if !ticket.scope.contains(&block.screen_id) {
                warn!("Ignoring block for unselected screen {}", block.screen_id);
                continue;
            }
            blocks.entry(block.screen_id.clone()).or_default().push(block);
        }

        let count: usize = blocks.values().map(Vec::len).sum();
        self.blocks = blocks;
        self.unloaded.clear();
        self.touch();
        self.saved_revision = Some(self.revision);
        info!("Loaded {} block(s) from server", count);

        Ok(SyncOutcome::Applied)
    }

    /// Saves the selected screens' blocks through `service`.
    pub async fn send_schedule<S>(&mut self, service: &S) -> ScheduleResult<SyncOutcome>
    where
        S: ScheduleService + ?Sized,
    {
        let ticket = self.begin_send()?;
        let result = service
            .put_schedule(&ticket.scope, ticket.blocks.clone())
            .await;
        self.complete_send(ticket, result)
    }

    /// Replaces the working set with the server's canonical blocks.
    pub async fn get_schedule<S>(&mut self, service: &S) -> ScheduleResult<SyncOutcome>
    where
        S: ScheduleService + ?Sized,
    {
        let ticket = self.begin_fetch()?;
        let result = service.get_schedule(&ticket.scope).await;
        self.complete_fetch(ticket, result)
    }
}
