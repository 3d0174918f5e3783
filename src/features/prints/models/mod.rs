mod print_comment;
mod print_image;
mod print_item;

pub use print_comment::PrintComment;
pub use print_image::PrintImage;
pub use print_item::{Difficulty, PrintItem, PrintItemSummary, PrintStatus};
