pub mod in_memory_appointment_repository;
pub mod sqlite_appointment_repository;

pub use in_memory_appointment_repository::InMemoryAppointmentRepository;
pub use sqlite_appointment_repository::SqliteAppointmentRepository;
