pub mod emi;
pub mod registry;
pub mod router;
