mod print_dto;

pub use print_dto::*;
