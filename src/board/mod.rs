pub mod coords;
pub mod movegen;
pub mod moves;
pub mod neighbours;
pub mod piece;
pub mod position;
pub mod rules;

pub use coords::{coords_to_index, index_to_coords, index_to_line, Cells, NUM_CELLS, NUM_ROWS};
pub use movegen::{piece_moves, player_moves};
pub use moves::{Move, NO_INDEX};
pub use piece::Player;
pub use position::{Position, PositionRecord, DRAW_HALF_MOVES};
pub use rules::{apply_move, count_pieces, is_move_win, is_position_win, play_move, winning_player};
