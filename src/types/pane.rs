//! Pane identities and the roles they play in scroll synchronization.

use serde::{Deserialize, Serialize};

/// An independently scrollable region of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneId {
    /// Single wrapper around header and body when the header is not fixed
    Content,
    /// Fixed header, rendered without its own scrollbar
    Header,
    /// Body, owns scrolling when the header is fixed
    Body,
    /// Fixed summary/footer row
    Footer,
}

impl PaneId {
    pub fn as_str(self) -> &'static str {
        match self {
            PaneId::Content => "content",
            PaneId::Header => "header",
            PaneId::Body => "body",
            PaneId::Footer => "footer",
        }
    }
}

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which wheel deltas a pane converts into scroll writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelPolicy {
    /// Pane scrolls natively, wheel input is left to the platform
    #[default]
    Native,
    /// Intercept `deltaX` only
    Horizontal,
    /// Intercept `deltaX` and `deltaY`
    Both,
}

/// How a registered pane participates in synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneRole {
    /// Mirrors the shared horizontal offset
    pub horizontal: bool,
    /// Mirrors the shared vertical offset
    pub vertical: bool,
    pub wheel: WheelPolicy,
}

impl PaneRole {
    /// Natively scrolling pane tracking both axes.
    pub const SCROLL_OWNER: PaneRole = PaneRole {
        horizontal: true,
        vertical: true,
        wheel: WheelPolicy::Native,
    };

    /// Overflow-hidden strip that follows the horizontal offset and turns
    /// horizontal wheel input into scrolling.
    pub const HORIZONTAL_MIRROR: PaneRole = PaneRole {
        horizontal: true,
        vertical: false,
        wheel: WheelPolicy::Horizontal,
    };

    /// Default role for a pane id.
    pub fn for_pane(pane: PaneId) -> Self {
        match pane {
            PaneId::Content | PaneId::Body => Self::SCROLL_OWNER,
            PaneId::Header | PaneId::Footer => Self::HORIZONTAL_MIRROR,
        }
    }

    pub fn tracks_both(&self) -> bool {
        self.horizontal && self.vertical
    }
}
