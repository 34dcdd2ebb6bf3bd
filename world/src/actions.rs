//! Effects fired when the player arrives on an action cell.

use log::{debug, trace};
use scrollmap_core::{Action, CellCoord, Event, LevelId};

use crate::level_index::ActionIndex;

/// Level switch requested by a `new-level` action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LevelTransition {
    pub(crate) level: LevelId,
    pub(crate) start: Option<CellCoord>,
}

/// Executes the action bound to `cell`, if any.
///
/// Gold items are removed from the index before any notification is
/// emitted, so a cell pays out at most once. Level transitions are returned
/// to the caller, which owns the lifecycle.
pub(crate) fn dispatch(
    cell: CellCoord,
    actions: &mut ActionIndex,
    gold: &mut u32,
    out_events: &mut Vec<Event>,
) -> Option<LevelTransition> {
    let action = actions.get(cell)?;
    match action {
        Action::NewLevel { level, .. } => {
            debug!("action cell {cell} requests level {level}");
            Some(LevelTransition {
                level: *level,
                start: action.start(),
            })
        }
        Action::Item {
            add_gold: Some(_), ..
        } => {
            if let Some(Action::Item {
                image,
                add_gold: Some(amount),
                ..
            }) = actions.remove(cell)
            {
                *gold = gold.saturating_add(amount);
                out_events.push(Event::ItemCollected {
                    cell,
                    image,
                    gold: amount,
                    total_gold: *gold,
                });
            }
            None
        }
        Action::Item {
            add_to_inventory, ..
        } => {
            if add_to_inventory.is_some() {
                out_events.push(Event::InventoryItemFound {
                    cell,
                    item: add_to_inventory.clone(),
                });
            }
            None
        }
        Action::Inventory => {
            trace!("inventory action at {cell} ignored");
            None
        }
    }
}
