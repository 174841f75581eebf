pub mod user_certification;
