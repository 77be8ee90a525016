use crate::models::{Program, RecordId};
use clap::ValueEnum;

/// Which neighbour a block trades places with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn offset(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// Swap the `order_index` of `blocks[index]` and its neighbour in `direction`.
///
/// Returns the ids of both blocks, or `None` when the neighbour does not
/// exist (first block moved up, last block moved down). The slice itself is
/// not reordered.
pub fn move_block(
    blocks: &mut [Program],
    index: usize,
    direction: Direction,
) -> Option<(RecordId, RecordId)> {
    if index >= blocks.len() {
        return None;
    }
    let neighbour = index.checked_add_signed(direction.offset())?;
    if neighbour >= blocks.len() {
        return None;
    }

    let a = blocks[index].order_index;
    blocks[index].order_index = blocks[neighbour].order_index;
    blocks[neighbour].order_index = a;

    Some((blocks[index].id.clone(), blocks[neighbour].id.clone()))
}
