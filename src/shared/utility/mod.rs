pub mod command_registration;
