mod dev_backend;

pub use dev_backend::DevBackend;
pub use focus_client::ApiClient;
