pub mod crypto;
pub mod derive;
