//! View-cell reconciler.
//!
//! [`CellGrid`] keeps the set of rendered participant cells exactly equal to
//! {local} ∪ participants with minimal churn. Structural reconciliation
//! (join/leave) is separated from per-cell control visibility (mute toggles,
//! video buttons): structural changes are rare and expensive, visibility
//! changes are frequent and must not trigger a rebuild.

use std::collections::{HashMap, HashSet};

use huddle_core::{MediaKind, Participant, ParticipantId};

use crate::surface::{CellControl, Surface};

/// Per-cell bookkeeping the reconciler needs for idempotence.
#[derive(Debug, Clone)]
struct CellState {
    /// Cell carries action controls (local participant only).
    has_controls: bool,
    /// A video track is currently bound to the cell's media element.
    video_attached: bool,
}

/// Keyed collection of rendered participant cells.
///
/// Invariant: at most one cell per participant id. Creation is idempotent;
/// removal follows from set difference against the authoritative participant
/// set.
#[derive(Debug, Default)]
pub struct CellGrid {
    cells: HashMap<ParticipantId, CellState>,
}

impl CellGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rendered cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells are rendered.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether a cell exists for the participant.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.cells.contains_key(id)
    }

    /// Whether the participant's cell carries controls.
    pub fn has_controls(&self, id: &ParticipantId) -> bool {
        self.cells.get(id).is_some_and(|c| c.has_controls)
    }

    /// Whether a video track is bound to the participant's cell.
    pub fn video_attached(&self, id: &ParticipantId) -> bool {
        self.cells.get(id).is_some_and(|c| c.video_attached)
    }

    /// Ids of all rendered cells.
    pub fn cell_ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.cells.keys()
    }

    /// Make the rendered cell set exactly {local} ∪ participants.
    ///
    /// Phase 1 ensures a cell per participant (create-if-absent, keyed by
    /// id); phase 2 removes every cell whose id is neither the local
    /// participant's nor in `participants`. Existing cells are not touched,
    /// so repeated passes over an unchanged set are no-ops.
    pub fn reconcile<S: Surface>(
        &mut self,
        surface: &mut S,
        local: &Participant,
        participants: &[Participant],
    ) -> Result<(), S::Error> {
        self.ensure(surface, local, true)?;
        for participant in participants {
            if participant.id != local.id {
                self.ensure(surface, participant, false)?;
            }
        }

        let keep: HashSet<&ParticipantId> = std::iter::once(&local.id)
            .chain(participants.iter().map(|p| &p.id))
            .collect();
        let stale: Vec<ParticipantId> =
            self.cells.keys().filter(|id| !keep.contains(id)).cloned().collect();
        for id in stale {
            surface.remove_cell(&id)?;
            self.cells.remove(&id);
        }

        Ok(())
    }

    /// Create a cell for the participant if none exists.
    ///
    /// Returns whether a cell was created. Control wiring happens only on the
    /// local participant's cell, and only at creation time.
    pub fn ensure<S: Surface>(
        &mut self,
        surface: &mut S,
        participant: &Participant,
        is_local: bool,
    ) -> Result<bool, S::Error> {
        if self.cells.contains_key(&participant.id) {
            return Ok(false);
        }

        surface.create_cell(participant, is_local)?;
        self.cells.insert(
            participant.id.clone(),
            CellState { has_controls: is_local, video_attached: false },
        );

        if is_local {
            surface.set_control_visible(&participant.id, CellControl::HangUp, true)?;
            self.refresh_controls(surface, participant)?;
        }

        Ok(true)
    }

    /// Recompute which controls are shown on the local participant's cell.
    ///
    /// Mute is hidden iff already muted, unmute iff not muted; add-video is
    /// hidden iff a local video track exists, remove-video iff it does not.
    /// A no-op for cells without controls.
    pub fn refresh_controls<S: Surface>(
        &mut self,
        surface: &mut S,
        local: &Participant,
    ) -> Result<(), S::Error> {
        if !self.has_controls(&local.id) {
            return Ok(());
        }

        surface.set_control_visible(&local.id, CellControl::Mute, !local.is_muted)?;
        surface.set_control_visible(&local.id, CellControl::Unmute, local.is_muted)?;
        surface.set_control_visible(&local.id, CellControl::AddVideo, !local.has_video)?;
        surface.set_control_visible(&local.id, CellControl::RemoveVideo, local.has_video)?;
        Ok(())
    }

    /// Bind the participant's video track to their cell and reveal it.
    ///
    /// Idempotent: a track is bound at most once per cell; a second attach
    /// only re-reveals the element. Skipped with a log if no cell exists.
    pub fn attach_video<S: Surface>(
        &mut self,
        surface: &mut S,
        id: &ParticipantId,
    ) -> Result<(), S::Error> {
        let Some(cell) = self.cells.get_mut(id) else {
            tracing::warn!(participant = %id, "video attach for unknown cell skipped");
            return Ok(());
        };

        if !cell.video_attached {
            surface.attach_media(id, MediaKind::Video)?;
            cell.video_attached = true;
        }
        surface.set_media_visible(id, MediaKind::Video, true)
    }

    /// Hide the participant's video element and forget the binding.
    ///
    /// The next attach binds the (new) track again.
    pub fn detach_video<S: Surface>(
        &mut self,
        surface: &mut S,
        id: &ParticipantId,
    ) -> Result<(), S::Error> {
        let Some(cell) = self.cells.get_mut(id) else {
            return Ok(());
        };

        cell.video_attached = false;
        surface.set_media_visible(id, MediaKind::Video, false)
    }

    /// Remove every cell.
    pub fn clear<S: Surface>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        self.cells.clear();
        surface.clear()
    }
}

#[cfg(test)]
mod tests {
    use huddle_harness::RecordingSurface;

    use super::*;

    fn local() -> Participant {
        Participant::new(ParticipantId::new("me"), "Me")
    }

    fn remote(id: &str) -> Participant {
        Participant::new(ParticipantId::new(id), id.to_uppercase())
    }

    #[test]
    fn ensure_is_idempotent() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();

        assert!(grid.ensure(&mut surface, &me, true).unwrap());
        assert!(!grid.ensure(&mut surface, &me, true).unwrap());

        assert_eq!(grid.cell_count(), 1);
        assert_eq!(surface.duplicate_creates(), 0);
    }

    #[test]
    fn reconcile_matches_local_union_participants() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();

        grid.reconcile(&mut surface, &me, &[remote("r1"), remote("r2")]).unwrap();
        assert_eq!(grid.cell_count(), 3);

        // r2 leaves, r3 joins
        grid.reconcile(&mut surface, &me, &[remote("r1"), remote("r3")]).unwrap();

        let mut ids: Vec<String> = grid.cell_ids().map(ToString::to_string).collect();
        ids.sort();
        assert_eq!(ids, ["me", "r1", "r3"]);

        let mut grid_ids: Vec<ParticipantId> = grid.cell_ids().cloned().collect();
        grid_ids.sort();
        assert_eq!(surface.cell_ids(), grid_ids);
    }

    #[test]
    fn local_cell_survives_empty_participant_list() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();

        grid.reconcile(&mut surface, &me, &[remote("r1")]).unwrap();
        grid.reconcile(&mut surface, &me, &[]).unwrap();

        assert!(grid.contains(&me.id));
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn participant_list_including_local_creates_no_duplicate() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();

        // Some platforms include the local user in the participant list.
        grid.reconcile(&mut surface, &me, &[me.clone(), remote("r1")]).unwrap();

        assert_eq!(grid.cell_count(), 2);
        assert_eq!(surface.duplicate_creates(), 0);
        assert!(grid.has_controls(&me.id));
    }

    #[test]
    fn only_local_cell_gets_controls() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();

        grid.reconcile(&mut surface, &me, &[remote("r1")]).unwrap();

        assert!(grid.has_controls(&me.id));
        assert!(!grid.has_controls(&ParticipantId::new("r1")));
        assert!(!surface.cell(&ParticipantId::new("r1")).unwrap().has_controls);
    }

    #[test]
    fn control_visibility_tracks_mute_and_video() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();
        grid.ensure(&mut surface, &me, true).unwrap();

        assert!(surface.control_visible(&me.id, CellControl::Mute));
        assert!(!surface.control_visible(&me.id, CellControl::Unmute));
        assert!(surface.control_visible(&me.id, CellControl::AddVideo));
        assert!(!surface.control_visible(&me.id, CellControl::RemoveVideo));

        let muted_with_video = me.clone().with_muted(true).with_video(true);
        grid.refresh_controls(&mut surface, &muted_with_video).unwrap();

        assert!(!surface.control_visible(&me.id, CellControl::Mute));
        assert!(surface.control_visible(&me.id, CellControl::Unmute));
        assert!(!surface.control_visible(&me.id, CellControl::AddVideo));
        assert!(surface.control_visible(&me.id, CellControl::RemoveVideo));
    }

    #[test]
    fn refresh_controls_on_remote_cell_is_noop() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();
        let r1 = remote("r1");

        grid.reconcile(&mut surface, &me, &[r1.clone()]).unwrap();
        let calls_before = surface.call_count();
        grid.refresh_controls(&mut surface, &r1).unwrap();

        assert_eq!(surface.call_count(), calls_before);
    }

    #[test]
    fn attach_video_is_idempotent() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();
        grid.ensure(&mut surface, &me, true).unwrap();

        grid.attach_video(&mut surface, &me.id).unwrap();
        grid.attach_video(&mut surface, &me.id).unwrap();

        let cell = surface.cell(&me.id).unwrap();
        assert_eq!(cell.video_attach_count, 1);
        assert!(cell.video_visible);
    }

    #[test]
    fn detach_then_attach_binds_again() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();
        grid.ensure(&mut surface, &me, true).unwrap();

        grid.attach_video(&mut surface, &me.id).unwrap();
        grid.detach_video(&mut surface, &me.id).unwrap();
        assert!(!surface.cell(&me.id).unwrap().video_visible);

        grid.attach_video(&mut surface, &me.id).unwrap();
        let cell = surface.cell(&me.id).unwrap();
        assert_eq!(cell.video_attach_count, 2);
        assert!(cell.video_visible);
    }

    #[test]
    fn clear_removes_everything() {
        let mut grid = CellGrid::new();
        let mut surface = RecordingSurface::new();
        let me = local();

        grid.reconcile(&mut surface, &me, &[remote("r1"), remote("r2")]).unwrap();
        grid.clear(&mut surface).unwrap();

        assert!(grid.is_empty());
        assert!(surface.cell_ids().is_empty());
    }
}
