//! Rendering-surface capability interface.
//!
//! The reconciler decides *what* changes (create this cell, hide that
//! control); a [`Surface`] implementation decides *how* (DOM nodes, ratatui
//! widgets, a recording buffer in tests). No specific rendering technology is
//! mandated.

use huddle_core::{MediaKind, Participant, ParticipantId};

/// Action controls on a participant cell.
///
/// Only the local participant's cell carries controls; remote cells are
/// read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellControl {
    /// End the conference (owner) or leave it (guest).
    HangUp,
    /// Mute the local participant.
    Mute,
    /// Unmute the local participant.
    Unmute,
    /// Publish local video.
    AddVideo,
    /// Retract local video.
    RemoveVideo,
}

impl CellControl {
    /// All controls, in display order.
    pub const ALL: [Self; 5] =
        [Self::HangUp, Self::Mute, Self::Unmute, Self::AddVideo, Self::RemoveVideo];

    /// Label shown on the control.
    pub fn label(self) -> &'static str {
        match self {
            Self::HangUp => "End",
            Self::Mute => "Mute",
            Self::Unmute => "Unmute",
            Self::AddVideo => "Add Video",
            Self::RemoveVideo => "Remove Video",
        }
    }
}

/// Structural operations the synchronizer performs on the rendering surface.
///
/// Implementations are plain executors: the [`CellGrid`](crate::CellGrid)
/// guarantees it never asks for a duplicate cell and never re-attaches an
/// already-attached track, so implementations may treat violations of those
/// guarantees as errors.
pub trait Surface {
    /// Surface-specific failure type.
    type Error: std::error::Error + Send + 'static;

    /// Create a cell for the participant.
    ///
    /// `with_controls` is true only for the local participant's cell; the
    /// surface wires the control affordances there and nowhere else.
    fn create_cell(
        &mut self,
        participant: &Participant,
        with_controls: bool,
    ) -> Result<(), Self::Error>;

    /// Remove the cell with the given id.
    fn remove_cell(&mut self, id: &ParticipantId) -> Result<(), Self::Error>;

    /// Show or hide one control on the given cell.
    fn set_control_visible(
        &mut self,
        id: &ParticipantId,
        control: CellControl,
        visible: bool,
    ) -> Result<(), Self::Error>;

    /// Bind a live media track to the cell's media element.
    fn attach_media(&mut self, id: &ParticipantId, kind: MediaKind) -> Result<(), Self::Error>;

    /// Show or hide the cell's media element.
    fn set_media_visible(
        &mut self,
        id: &ParticipantId,
        kind: MediaKind,
        visible: bool,
    ) -> Result<(), Self::Error>;

    /// Remove every cell.
    fn clear(&mut self) -> Result<(), Self::Error>;
}
