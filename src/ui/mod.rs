pub mod board_view;
pub mod form_prompt;
pub mod icons;

pub use board_view::{render_board, terminal_width};
pub use form_prompt::{confirm, prompt_job_fields};
