pub mod requests;
pub mod responses;

pub use requests::SynthesizeRequest;
pub use responses::ErrorResponse;
