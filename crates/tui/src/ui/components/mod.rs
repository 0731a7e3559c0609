pub mod hints;
pub mod toast;
