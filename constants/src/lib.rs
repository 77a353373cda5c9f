pub mod assay;
pub mod coordinate_system;
pub mod lithology;
pub mod path;
pub mod render_settings;
