pub mod emi_backend;
