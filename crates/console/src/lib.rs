pub mod columns;
pub mod json;
pub mod sections;
pub mod terminal;

pub use columns::{Cell, ColumnDisplay, DisplaySample, Row, PAD_SIZE};
pub use json::render_json;
pub use sections::{write_attached_devices, write_line_details, write_system_details};
pub use terminal::enable_ansi;
