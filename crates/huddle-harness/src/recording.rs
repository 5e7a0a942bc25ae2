//! Recording surface for structural assertions.

use std::collections::{BTreeMap, BTreeSet};

use huddle_client::{CellControl, Surface};
use huddle_core::{MediaKind, Participant, ParticipantId};
use thiserror::Error;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    /// `create_cell` was invoked.
    CreateCell {
        /// Cell id.
        id: ParticipantId,
        /// Whether controls were requested.
        with_controls: bool,
    },
    /// `remove_cell` was invoked.
    RemoveCell {
        /// Cell id.
        id: ParticipantId,
    },
    /// `set_control_visible` was invoked.
    SetControlVisible {
        /// Cell id.
        id: ParticipantId,
        /// Control concerned.
        control: CellControl,
        /// Requested visibility.
        visible: bool,
    },
    /// `attach_media` was invoked.
    AttachMedia {
        /// Cell id.
        id: ParticipantId,
        /// Media kind.
        kind: MediaKind,
    },
    /// `set_media_visible` was invoked.
    SetMediaVisible {
        /// Cell id.
        id: ParticipantId,
        /// Media kind.
        kind: MediaKind,
        /// Requested visibility.
        visible: bool,
    },
    /// `clear` was invoked.
    Clear,
}

/// Rendered state of one cell, as the surface saw it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSnapshot {
    /// Display name passed at creation.
    pub display_name: String,
    /// Whether the cell was created with controls.
    pub has_controls: bool,
    /// Controls currently visible.
    pub visible_controls: BTreeSet<CellControl>,
    /// How many times a video track was attached (idempotence check).
    pub video_attach_count: u32,
    /// Whether the video element is visible.
    pub video_visible: bool,
    /// How many times an audio track was attached.
    pub audio_attach_count: u32,
    /// Whether the audio element is visible.
    pub audio_visible: bool,
}

/// Failure from the recording surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordingError {
    /// Injected by the test.
    #[error("injected surface failure")]
    Injected,

    /// Operation targeted a cell that does not exist.
    #[error("no cell for participant {0}")]
    UnknownCell(ParticipantId),
}

/// Surface implementation that records calls and models cells.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    cells: BTreeMap<ParticipantId, CellSnapshot>,
    duplicate_creates: u32,
    fail_remaining: u32,
}

impl RecordingSurface {
    /// Create an empty recording surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` calls fail with [`RecordingError::Injected`].
    ///
    /// Failing calls are not recorded and do not mutate the cell model.
    pub fn inject_failures(&mut self, n: u32) {
        self.fail_remaining = n;
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// How many `create_cell` calls targeted an existing cell.
    ///
    /// The reconciler guarantees this stays zero.
    pub fn duplicate_creates(&self) -> u32 {
        self.duplicate_creates
    }

    /// Ids of all rendered cells, sorted.
    pub fn cell_ids(&self) -> Vec<ParticipantId> {
        self.cells.keys().cloned().collect()
    }

    /// Snapshot of one cell.
    pub fn cell(&self, id: &ParticipantId) -> Option<&CellSnapshot> {
        self.cells.get(id)
    }

    /// Whether a control is currently visible on the cell.
    ///
    /// `false` for unknown cells.
    pub fn control_visible(&self, id: &ParticipantId, control: CellControl) -> bool {
        self.cells.get(id).is_some_and(|c| c.visible_controls.contains(&control))
    }

    fn take_failure(&mut self) -> Result<(), RecordingError> {
        if self.fail_remaining > 0 {
            self.fail_remaining -= 1;
            return Err(RecordingError::Injected);
        }
        Ok(())
    }
}

impl Surface for RecordingSurface {
    type Error = RecordingError;

    fn create_cell(
        &mut self,
        participant: &Participant,
        with_controls: bool,
    ) -> Result<(), Self::Error> {
        self.take_failure()?;
        self.calls
            .push(SurfaceCall::CreateCell { id: participant.id.clone(), with_controls });

        if self.cells.contains_key(&participant.id) {
            self.duplicate_creates += 1;
            return Ok(());
        }

        self.cells.insert(participant.id.clone(), CellSnapshot {
            display_name: participant.display_name.clone(),
            has_controls: with_controls,
            ..CellSnapshot::default()
        });
        Ok(())
    }

    fn remove_cell(&mut self, id: &ParticipantId) -> Result<(), Self::Error> {
        self.take_failure()?;
        self.calls.push(SurfaceCall::RemoveCell { id: id.clone() });
        self.cells
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RecordingError::UnknownCell(id.clone()))
    }

    fn set_control_visible(
        &mut self,
        id: &ParticipantId,
        control: CellControl,
        visible: bool,
    ) -> Result<(), Self::Error> {
        self.take_failure()?;
        self.calls.push(SurfaceCall::SetControlVisible { id: id.clone(), control, visible });

        let cell =
            self.cells.get_mut(id).ok_or_else(|| RecordingError::UnknownCell(id.clone()))?;
        if visible {
            cell.visible_controls.insert(control);
        } else {
            cell.visible_controls.remove(&control);
        }
        Ok(())
    }

    fn attach_media(&mut self, id: &ParticipantId, kind: MediaKind) -> Result<(), Self::Error> {
        self.take_failure()?;
        self.calls.push(SurfaceCall::AttachMedia { id: id.clone(), kind });

        let cell =
            self.cells.get_mut(id).ok_or_else(|| RecordingError::UnknownCell(id.clone()))?;
        match kind {
            MediaKind::Video => cell.video_attach_count += 1,
            MediaKind::Audio => cell.audio_attach_count += 1,
        }
        Ok(())
    }

    fn set_media_visible(
        &mut self,
        id: &ParticipantId,
        kind: MediaKind,
        visible: bool,
    ) -> Result<(), Self::Error> {
        self.take_failure()?;
        self.calls.push(SurfaceCall::SetMediaVisible { id: id.clone(), kind, visible });

        let cell =
            self.cells.get_mut(id).ok_or_else(|| RecordingError::UnknownCell(id.clone()))?;
        match kind {
            MediaKind::Video => cell.video_visible = visible,
            MediaKind::Audio => cell.audio_visible = visible,
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.take_failure()?;
        self.calls.push(SurfaceCall::Clear);
        self.cells.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut surface = RecordingSurface::new();
        let me = Participant::new(ParticipantId::new("me"), "Me");

        surface.create_cell(&me, true).unwrap();
        surface.set_control_visible(&me.id, CellControl::Mute, true).unwrap();
        surface.clear().unwrap();

        assert!(matches!(surface.calls()[0], SurfaceCall::CreateCell { .. }));
        assert!(matches!(surface.calls()[2], SurfaceCall::Clear));
    }

    #[test]
    fn injected_failures_do_not_mutate() {
        let mut surface = RecordingSurface::new();
        let me = Participant::new(ParticipantId::new("me"), "Me");

        surface.inject_failures(1);
        assert_eq!(surface.create_cell(&me, true), Err(RecordingError::Injected));
        assert!(surface.cell_ids().is_empty());
        assert_eq!(surface.call_count(), 0);

        surface.create_cell(&me, true).unwrap();
        assert_eq!(surface.cell_ids(), vec![me.id]);
    }

    #[test]
    fn unknown_cell_operations_error() {
        let mut surface = RecordingSurface::new();
        let ghost = ParticipantId::new("ghost");

        assert!(matches!(
            surface.set_control_visible(&ghost, CellControl::Mute, true),
            Err(RecordingError::UnknownCell(_))
        ));
        assert!(matches!(
            surface.attach_media(&ghost, MediaKind::Video),
            Err(RecordingError::UnknownCell(_))
        ));
    }
}
