pub mod board;
pub mod color;
pub mod error;
pub mod user;

pub use board::{Board, BoardWithLists, Card, List, ListWithCards, NewBoard, NewCard, NewList};
pub use color::BoardColor;
pub use error::KanbanError;
pub use user::{AuthUser, Session};
