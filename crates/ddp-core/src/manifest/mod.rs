//! Manifest assembly from per-app catalog listings.

mod assembler;
mod extras;

pub use assembler::{
    BANNER_FILE, DESCRIPTION_FILE, EXTRA_FILE, LOGO_FILE, NAME_FILE, app_id_from_path,
    assemble, assemble_listing, is_recognized_info_file, is_screenshot,
};
pub use extras::{Extras, parse_extra_line, parse_extras, serialize_extras};
