use myfit::core::grid::{Direction, move_block};
use myfit::errors::AppError;
use myfit::models::grid::{DEFAULT_HEADER, NEW_COLUMN_LABEL};
use myfit::models::program::{next_order_index, sort_by_order};
use myfit::models::{Grid, RecordId};

mod common;
use common::program;

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[test]
fn default_grid_is_header_plus_blank_row() {
    let grid = Grid::default();
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.width(), 4);
    assert_eq!(grid.header(), DEFAULT_HEADER.map(String::from).as_slice());
    assert!(grid.body()[0].iter().all(String::is_empty));
}

#[test]
fn from_rows_pads_ragged_rows() {
    let grid = Grid::from_rows(rows(&[&["a"], &["b", "c", "d"], &[]]));
    assert!(grid.is_rectangular());
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.rows()[0], vec!["a", "", ""]);
    assert_eq!(grid.rows()[2], vec!["", "", ""]);
}

#[test]
fn from_rows_of_nothing_is_single_blank_cell() {
    let grid = Grid::from_rows(Vec::new());
    assert_eq!(grid.rows(), rows(&[&[""], &[""]]).as_slice());
}

#[test]
fn update_cell_reports_whether_anything_changed() {
    let mut grid = Grid::with_header(&["Exercise", "Sets", "Reps", "Weight"]);

    assert!(grid.update_cell(1, 0, "Squat").unwrap());
    assert_eq!(
        grid.rows(),
        rows(&[&["Exercise", "Sets", "Reps", "Weight"], &["Squat", "", "", ""]]).as_slice()
    );

    assert!(!grid.update_cell(1, 0, "Squat").unwrap());
    // The header is editable too.
    assert!(grid.update_cell(0, 3, "Kg").unwrap());
    assert_eq!(grid.cell(0, 3), Some("Kg"));
}

#[test]
fn update_cell_out_of_range_is_an_error() {
    let mut grid = Grid::default();
    assert!(matches!(
        grid.update_cell(5, 0, "x"),
        Err(AppError::InvalidCell { row: 5, col: 0 })
    ));
    assert!(matches!(
        grid.update_cell(1, 4, "x"),
        Err(AppError::InvalidCell { row: 1, col: 4 })
    ));
}

#[test]
fn add_row_matches_header_width() {
    let mut grid = Grid::default();
    grid.add_column(NEW_COLUMN_LABEL);
    grid.add_row();
    assert_eq!(grid.height(), 3);
    assert_eq!(grid.rows()[2].len(), 5);
}

#[test]
fn delete_row_refuses_header_and_out_of_range() {
    let mut grid = Grid::default();
    assert!(matches!(grid.delete_row(0), Err(AppError::HeaderRowProtected)));
    assert!(matches!(grid.delete_row(2), Err(AppError::InvalidRow(2))));

    let removed = grid.delete_row(1).unwrap();
    assert_eq!(removed.len(), 4);
    assert_eq!(grid.height(), 1);
}

#[test]
fn add_column_then_deleting_every_body_row_keeps_header_width() {
    let mut grid = Grid::default();
    grid.add_row();
    grid.add_row();
    grid.add_column(NEW_COLUMN_LABEL);

    assert_eq!(grid.header().last().map(String::as_str), Some(NEW_COLUMN_LABEL));
    assert!(grid.body().iter().all(|r| r.last().is_some_and(String::is_empty)));

    while grid.height() > 1 {
        grid.delete_row(1).unwrap();
    }
    assert!(grid.is_rectangular());
    assert_eq!(grid.width(), 5);
}

#[test]
fn grid_serializes_as_plain_array_of_arrays() {
    let grid = Grid::from_rows(rows(&[&["A", "B"], &["1", "2"]]));
    let json = serde_json::to_string(&grid).unwrap();
    assert_eq!(json, r#"[["A","B"],["1","2"]]"#);
}

#[test]
fn move_block_swaps_order_and_back() {
    let mut blocks = vec![program(1, 9, "A", 0), program(2, 9, "B", 3)];

    let moved = move_block(&mut blocks, 0, Direction::Down);
    assert_eq!(moved, Some((RecordId::from(1), RecordId::from(2))));
    assert_eq!((blocks[0].order_index, blocks[1].order_index), (3, 0));

    // Once re-sorted, block B sits first; moving the old block back restores both.
    sort_by_order(&mut blocks);
    move_block(&mut blocks, 1, Direction::Up).unwrap();
    sort_by_order(&mut blocks);
    assert_eq!(blocks[0].title, "A");
    assert_eq!((blocks[0].order_index, blocks[1].order_index), (0, 3));
}

#[test]
fn move_block_at_either_end_is_a_no_op() {
    let mut blocks = vec![program(1, 9, "A", 0), program(2, 9, "B", 1)];
    assert_eq!(move_block(&mut blocks, 0, Direction::Up), None);
    assert_eq!(move_block(&mut blocks, 1, Direction::Down), None);
    assert_eq!(move_block(&mut blocks, 7, Direction::Down), None);
    assert_eq!((blocks[0].order_index, blocks[1].order_index), (0, 1));
}

#[test]
fn next_order_index_follows_the_largest() {
    assert_eq!(next_order_index(&[]), 0);
    let blocks = vec![program(1, 9, "A", 4), program(2, 9, "B", 1)];
    assert_eq!(next_order_index(&blocks), 5);
}

#[test]
fn direction_offsets() {
    assert_eq!(Direction::Up.offset(), -1);
    assert_eq!(Direction::Down.offset(), 1);
}

#[test]
fn stored_ragged_grid_is_padded_when_read() {
    let mut grid: Grid = serde_json::from_str(r#"[["Exercise","Sets","Reps"],["Squat"]]"#).unwrap();
    assert!(grid.is_rectangular());
    assert_eq!(grid.rows()[1], vec!["Squat", "", ""]);
    assert!(grid.update_cell(1, 2, "10").unwrap());

    let empty: Grid = serde_json::from_str("[]").unwrap();
    assert_eq!(empty, Grid::from_rows(Vec::new()));
}
