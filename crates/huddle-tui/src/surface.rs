//! Terminal rendering surface.
//!
//! [`TuiSurface`] is the [`Surface`] implementation the coordinator drives:
//! it holds the cell view state the `ui` module renders from. Cells keep
//! platform order (insertion order) so the grid is stable across
//! reconciliation passes.

use std::collections::BTreeSet;

use huddle_client::{CellControl, Surface};
use huddle_core::{MediaKind, Participant, ParticipantId};
use thiserror::Error;

/// Rendered state of one participant cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    /// Participant id keying the cell.
    pub id: ParticipantId,
    /// Name shown in the cell title.
    pub display_name: String,
    /// Avatar reference, if any.
    pub avatar: Option<String>,
    /// Whether this cell carries the local controls.
    pub has_controls: bool,
    /// Controls currently visible.
    pub visible_controls: BTreeSet<CellControl>,
    /// Whether the video element is shown.
    pub video_visible: bool,
}

/// Failure from the terminal surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Operation targeted a cell that does not exist.
    #[error("no cell rendered for participant {0}")]
    UnknownCell(ParticipantId),
}

/// Cell view collection backing the participant grid.
#[derive(Debug, Default)]
pub struct TuiSurface {
    cells: Vec<CellView>,
}

impl TuiSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered cells, in platform order.
    pub fn cells(&self) -> &[CellView] {
        &self.cells
    }

    fn cell_mut(&mut self, id: &ParticipantId) -> Result<&mut CellView, SurfaceError> {
        self.cells
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| SurfaceError::UnknownCell(id.clone()))
    }
}

impl Surface for TuiSurface {
    type Error = SurfaceError;

    fn create_cell(
        &mut self,
        participant: &Participant,
        with_controls: bool,
    ) -> Result<(), Self::Error> {
        if self.cells.iter().any(|c| c.id == participant.id) {
            return Ok(());
        }
        self.cells.push(CellView {
            id: participant.id.clone(),
            display_name: participant.display_name.clone(),
            avatar: participant.avatar.clone(),
            has_controls: with_controls,
            visible_controls: BTreeSet::new(),
            video_visible: false,
        });
        Ok(())
    }

    fn remove_cell(&mut self, id: &ParticipantId) -> Result<(), Self::Error> {
        let before = self.cells.len();
        self.cells.retain(|c| c.id != *id);
        if self.cells.len() == before {
            return Err(SurfaceError::UnknownCell(id.clone()));
        }
        Ok(())
    }

    fn set_control_visible(
        &mut self,
        id: &ParticipantId,
        control: CellControl,
        visible: bool,
    ) -> Result<(), Self::Error> {
        let cell = self.cell_mut(id)?;
        if visible {
            cell.visible_controls.insert(control);
        } else {
            cell.visible_controls.remove(&control);
        }
        Ok(())
    }

    fn attach_media(&mut self, id: &ParticipantId, _kind: MediaKind) -> Result<(), Self::Error> {
        // Binding is implicit in the terminal; only confirm the cell exists.
        // Visibility is what set_media_visible renders.
        self.cell_mut(id).map(|_| ())
    }

    fn set_media_visible(
        &mut self,
        id: &ParticipantId,
        kind: MediaKind,
        visible: bool,
    ) -> Result<(), Self::Error> {
        let cell = self.cell_mut(id)?;
        if kind == MediaKind::Video {
            cell.video_visible = visible;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.cells.clear();
        Ok(())
    }
}
