pub mod appointment_store;
