pub mod certification_repo;
