pub mod chunked_upload;
pub mod pastes;
