pub mod dialog;
pub mod help;
pub mod preview;
pub mod status_bar;
pub mod tree;
