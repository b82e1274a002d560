pub mod academy;
pub mod access_code;
pub mod quiz;
