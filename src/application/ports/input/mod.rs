pub mod appointment_date_port;
