pub mod employee;
pub mod identity;
pub mod memory;
pub mod records;
pub mod token;

pub use employee::PostgresEmployeeRepository;
pub use identity::PostgresIdentityRepository;
pub use memory::MemoryStore;
pub use records::PostgresRecordsRepository;
pub use token::PostgresSetupTokenRepository;
