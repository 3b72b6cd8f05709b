pub mod text;

pub use text::{display_width, group_thousands, marquee_window, strip_markup, truncate_to_width};
