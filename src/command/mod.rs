//! Reversible edits applied to a [`LayerStack`].
//!
//! Every command captures just enough of the prior state on its first
//! `execute` to make `undo` an exact inverse. Calling `execute` again after an
//! undo replays the edit without recapturing.

mod fill;
mod layer;
mod tile;

pub use fill::{flood_fill, LayerFillCommand};
pub use layer::{
    LayerAddCommand, LayerClearCommand, LayerDeleteCommand, LayerInsertCommand,
    LayerMoveDownCommand, LayerMoveUpCommand, LayerSwapCommand,
};
pub use tile::{TileEraseCommand, TilePaintCommand};

use crate::stack::LayerStack;

/// Any edit the history can record.
#[derive(Debug, Clone)]
pub enum Command {
    /// Paint one cell
    TilePaint(TilePaintCommand),
    /// Erase one cell
    TileErase(TileEraseCommand),
    /// Flood fill a region
    LayerFill(LayerFillCommand),
    /// Append a layer
    LayerAdd(LayerAddCommand),
    /// Insert a layer at an index
    LayerInsert(LayerInsertCommand),
    /// Remove a layer
    LayerDelete(LayerDeleteCommand),
    /// Empty a layer
    LayerClear(LayerClearCommand),
    /// Move a layer toward the bottom
    LayerMoveUp(LayerMoveUpCommand),
    /// Move a layer toward the top
    LayerMoveDown(LayerMoveDownCommand),
    /// Swap two layers
    LayerSwap(LayerSwapCommand),
}

macro_rules! dispatch {
    ($self:expr, $cmd:ident => $body:expr) => {
        match $self {
            Command::TilePaint($cmd) => $body,
            Command::TileErase($cmd) => $body,
            Command::LayerFill($cmd) => $body,
            Command::LayerAdd($cmd) => $body,
            Command::LayerInsert($cmd) => $body,
            Command::LayerDelete($cmd) => $body,
            Command::LayerClear($cmd) => $body,
            Command::LayerMoveUp($cmd) => $body,
            Command::LayerMoveDown($cmd) => $body,
            Command::LayerSwap($cmd) => $body,
        }
    };
}

impl Command {
    /// Applies the edit.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        dispatch!(self, cmd => cmd.execute(stack))
    }

    /// Reverts the last `execute`.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        dispatch!(self, cmd => cmd.undo(stack))
    }

    /// True if `other` is redundant with `self` and should be dropped instead
    /// of executed. Commands of different kinds never match.
    pub fn validate(&self, other: &Command) -> bool {
        match (self, other) {
            (Command::TilePaint(a), Command::TilePaint(b)) => a.validate(b),
            (Command::TileErase(a), Command::TileErase(b)) => a.validate(b),
            (Command::LayerFill(a), Command::LayerFill(b)) => a.validate(b),
            (Command::LayerAdd(a), Command::LayerAdd(b)) => a.validate(b),
            (Command::LayerInsert(a), Command::LayerInsert(b)) => a.validate(b),
            (Command::LayerDelete(a), Command::LayerDelete(b)) => a.validate(b),
            (Command::LayerClear(a), Command::LayerClear(b)) => a.validate(b),
            (Command::LayerMoveUp(a), Command::LayerMoveUp(b)) => a.validate(b),
            (Command::LayerMoveDown(a), Command::LayerMoveDown(b)) => a.validate(b),
            (Command::LayerSwap(a), Command::LayerSwap(b)) => a.validate(b),
            _ => false,
        }
    }

    /// Human readable label, e.g. for an "Undo ..." menu entry.
    pub fn name(&self) -> &'static str {
        match self {
            Command::TilePaint(_) => "Paint Tile",
            Command::TileErase(_) => "Erase Tile",
            Command::LayerFill(_) => "Fill",
            Command::LayerAdd(_) => "Add Layer",
            Command::LayerInsert(_) => "Insert Layer",
            Command::LayerDelete(_) => "Delete Layer",
            Command::LayerClear(_) => "Clear Layer",
            Command::LayerMoveUp(_) => "Move Layer Up",
            Command::LayerMoveDown(_) => "Move Layer Down",
            Command::LayerSwap(_) => "Swap Layers",
        }
    }

    /// True for commands that add, remove or reorder layers.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Command::TilePaint(_) | Command::TileErase(_) | Command::LayerFill(_)
        )
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for Command {
            fn from(cmd: $ty) -> Self {
                Command::$variant(cmd)
            }
        })*
    };
}

impl_from!(
    TilePaint(TilePaintCommand),
    TileErase(TileEraseCommand),
    LayerFill(LayerFillCommand),
    LayerAdd(LayerAddCommand),
    LayerInsert(LayerInsertCommand),
    LayerDelete(LayerDeleteCommand),
    LayerClear(LayerClearCommand),
    LayerMoveUp(LayerMoveUpCommand),
    LayerMoveDown(LayerMoveDownCommand),
    LayerSwap(LayerSwapCommand),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;

    #[test]
    fn no_command_kind_coalesces() {
        let paint: Command = TilePaintCommand::new(0, 0, 0, Tile::default()).into();
        let same = paint.clone();
        let erase: Command = TileEraseCommand::new(0, 0, 0).into();
        let swap: Command = LayerSwapCommand::new(0, 1).into();

        assert!(!paint.validate(&same));
        assert!(!paint.validate(&erase));
        assert!(!swap.validate(&swap.clone()));
    }

    #[test]
    fn names_and_kinds() {
        let add: Command = LayerAddCommand::new("x").into();
        let fill: Command = LayerFillCommand::new(0, 0, 0, Tile::default()).into();
        assert_eq!(add.name(), "Add Layer");
        assert!(add.is_structural());
        assert!(!fill.is_structural());
    }
}
